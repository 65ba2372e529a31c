use wasm_bindgen::JsValue;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A seed for a new session's random number generator.
pub(crate) fn fresh_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default() as u64
    }
}

/// Resolves after `ms` milliseconds using the window's `setTimeout`.
pub(crate) async fn sleep_ms(ms: u32) -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let Some(window) = web_sys::window() else {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("no window"));
            return;
        };
        if let Err(e) =
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
        {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}
