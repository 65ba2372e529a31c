use crate::session::{ActionSet, PrimaryAction};

/// Horizontal travel a swipe needs before it counts, in CSS pixels.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Raw input as reported by the page.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// A key press, named as in `KeyboardEvent.key`.
    Key { key: String },
    /// A tap or click on the card.
    Tap,
    /// A finished touch gesture: end position minus start position.
    Swipe { dx: f64, dy: f64 },
}

#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Submit,
    Advance,
    Flip,
}

pub fn is_horizontal_gesture(dx: f64, dy: f64) -> bool {
    dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD_PX
}

/// Maps an input event to the action it triggers right now, if any.
pub fn interpret(event: &InputEvent, actions: &ActionSet) -> Option<Command> {
    match event {
        InputEvent::Key { key } if key == "Enter" => match actions.primary {
            PrimaryAction::Submit if actions.can_submit => Some(Command::Submit),
            PrimaryAction::Advance if actions.can_advance => Some(Command::Advance),
            _ => None,
        },
        InputEvent::Key { .. } => None,
        InputEvent::Tap => actions.can_flip.then_some(Command::Flip),
        // only a leftward swipe moves on
        InputEvent::Swipe { dx, dy } => {
            (is_horizontal_gesture(*dx, *dy) && *dx < 0.0 && actions.can_advance)
                .then_some(Command::Advance)
        }
    }
}
