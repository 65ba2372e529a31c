#![deny(clippy::string_slice)]

pub mod deck;
pub mod distractors;
pub mod draw;
pub mod exam;
pub mod input;
pub mod loader;
pub mod session;
pub mod session_config;
pub mod simulation;
mod utils;

pub use deck::Deck;
pub use exam::{ExamProgress, ExamResult, ExamTracker, IncorrectEntry};
pub use loader::LoadError;
pub use session::{
    ActionSet, AdvanceOutcome, CardFace, CardView, InputState, PrimaryAction, SelectOutcome,
    Session, SubmitOutcome,
};
pub use session_config::{SessionPlan, resolve_session};
pub use simulation::ExamSimulation;

use input::{Command, InputEvent};
use quiz_utils::{Capabilities, CatalogIndex, ConfigDocument, ConfigError, LaunchParams};
use quiz_utils::catalog::MenuView;
use std::sync::LazyLock;
use wasm_bindgen::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("The selected lists of mode {mode_id} contain no words")]
    EmptyDeck { mode_id: String },

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl From<SetupError> for JsValue {
    fn from(error: SetupError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
#[allow(clippy::declare_interior_mutable_const)]
const LOGGER: LazyLock<()> = LazyLock::new(|| {
    utils::set_panic_hook();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

/// The loaded catalog of a site.
#[wasm_bindgen]
pub struct QuizApp {
    index: CatalogIndex,
    base_url: String,
}

impl QuizApp {
    pub fn from_document(document: &ConfigDocument, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            index: CatalogIndex::build(document)?,
            base_url: base_url.to_string(),
        })
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl QuizApp {
    /// Fetches `config.json` from `base_url` and indexes it.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub async fn load(base_url: String) -> Result<QuizApp, JsValue> {
        // used to only initialize the logger once
        #[allow(clippy::borrow_interior_mutable_const)]
        *LOGGER;

        let document = loader::fetch_config(&base_url).await.inspect_err(|e| {
            log::error!("Error loading config: {e:?}");
        })?;
        let app = Self::from_document(&document, &base_url)
            .map_err(SetupError::from)
            .inspect_err(|e| {
                log::error!("Error indexing catalog: {e:?}");
            })?;
        Ok(app)
    }

    pub fn site_title(&self) -> String {
        self.index.site_title().to_string()
    }

    /// The menu for a location hash like `#reader/book1`.
    pub fn menu(&self, hash: &str) -> MenuView {
        self.index.navigate(hash)
    }

    /// Fetches the selected lists and starts studying them.
    pub async fn start_session(&self, params: LaunchParams) -> Result<QuizSession, JsValue> {
        let session =
            loader::load_session(&self.index, &params, &self.base_url, utils::fresh_seed())
                .await
                .inspect_err(|e| {
                    log::error!("Error starting session: {e:?}");
                })?;
        Ok(QuizSession { session })
    }
}

impl From<LoadError> for JsValue {
    fn from(error: LoadError) -> Self {
        SetupError::from(error).into()
    }
}

/// A running study session, owned by the page.
#[wasm_bindgen]
pub struct QuizSession {
    session: Session,
}

impl QuizSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl QuizSession {
    pub fn card(&self) -> CardView {
        self.session.card_view()
    }

    pub fn actions(&self) -> ActionSet {
        self.session.actions()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.session.capabilities()
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        self.session.submit(text)
    }

    pub fn give_up(&mut self) -> bool {
        self.session.give_up()
    }

    pub fn clear_shake(&mut self) {
        self.session.clear_shake()
    }

    pub fn flip(&mut self) -> bool {
        self.session.flip()
    }

    pub fn select_option(&mut self, index: usize) -> SelectOutcome {
        self.session.select_option(index)
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        self.session.advance()
    }

    pub fn exam_progress(&self) -> Option<ExamProgress> {
        self.session.exam_progress()
    }

    pub fn result(&self) -> Option<ExamResult> {
        self.session.result().cloned()
    }

    /// What a key press, tap, or swipe should do on the current card.
    pub fn interpret(&self, event: InputEvent) -> Option<Command> {
        input::interpret(&event, &self.session.actions())
    }
}

/// Waits for the card's flip-back animation to finish.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub async fn wait_for_flip_transition() -> Result<(), JsValue> {
    utils::sleep_ms(session::FLIP_TRANSITION_MS).await
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
