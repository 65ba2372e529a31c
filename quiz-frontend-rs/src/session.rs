use quiz_utils::text_cleanup::{canonical_answer, matches_answer};
use quiz_utils::{Capabilities, ModeType, VocabRecord};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::deck::{BackField, Deck};
use crate::distractors::{OptionSet, build_options};
use crate::draw::practice_draw;
use crate::exam::{ExamProgress, ExamResult, ExamTracker};

/// How long the card takes to turn back to its front, in milliseconds.
pub const FLIP_TRANSITION_MS: u32 = 610;

#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum CardFace {
    Front,
    Back,
}

impl CardFace {
    pub fn flipped(self) -> Self {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }
}

/// Where a typed-answer card is in its lifecycle.
#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum InputState {
    AwaitingSubmit,
    /// The last submission was wrong; the learner may try again.
    IncorrectShake,
    CorrectLocked,
    /// The learner gave up and the answer is shown.
    Revealed,
}

impl InputState {
    pub fn is_locked(self) -> bool {
        matches!(self, InputState::CorrectLocked | InputState::Revealed)
    }
}

/// The action the main button and the Enter key perform.
#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum PrimaryAction {
    Submit,
    Advance,
}

/// Which actions the presentation layer should currently enable.
#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ActionSet {
    pub can_submit: bool,
    pub can_advance: bool,
    pub can_flip: bool,
    pub can_give_up: bool,
    pub can_select_option: bool,
    pub primary: PrimaryAction,
}

impl ActionSet {
    const NONE: ActionSet = ActionSet {
        can_submit: false,
        can_advance: false,
        can_flip: false,
        can_give_up: false,
        can_select_option: false,
        primary: PrimaryAction::Advance,
    };
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SubmitOutcome {
    Correct { canonical: String },
    Incorrect,
    /// Nothing was typed. Not graded.
    Empty,
    Blocked,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SelectOutcome {
    Correct,
    Incorrect { correct_index: usize },
    Blocked,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AdvanceOutcome {
    /// A new card is loaded. When the old card was showing its back, the
    /// presentation should wait `flip_back_delay_ms` before showing the new content.
    NextCard { flip_back_delay_ms: Option<u32> },
    Finished { result: ExamResult },
    Blocked,
}

/// Everything needed to draw the current card.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub question: String,
    pub back_fields: Vec<BackField>,
    pub face: CardFace,
    pub mode_type: ModeType,
    pub input_state: Option<InputState>,
    /// Shown in the answer box once the card is answered or revealed.
    pub displayed_answer: Option<String>,
    pub answer_placeholder: Option<String>,
    pub options: Vec<String>,
    pub selected_option: Option<usize>,
    /// Only known to the presentation once an option has been picked.
    pub correct_option: Option<usize>,
}

#[derive(Clone, Debug)]
enum ModeState {
    Review,
    Quiz {
        input: InputState,
    },
    Mcq {
        options: OptionSet,
        selected: Option<usize>,
    },
}

/// One study session over a deck: the current card, its face and answer state,
/// and the exam bookkeeping when the session is an exam.
#[derive(Clone, Debug)]
pub struct Session {
    deck: Deck,
    rng: ChaCha8Rng,
    current: usize,
    correct_answer: String,
    displayed_answer: Option<String>,
    face: CardFace,
    state: ModeState,
    exam: Option<ExamTracker>,
    result: Option<ExamResult>,
}

impl Session {
    /// Starts a session and shows its first card
    ///
    /// `exam_questions` turns the session into an exam of that many questions
    /// (clamped to the deck). It is ignored when it asks for no questions or
    /// the mode cannot be examined.
    pub fn new(deck: Deck, exam_questions: Option<usize>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let capabilities = deck.mode_type().capabilities();

        let exam = match exam_questions {
            Some(0) => {
                log::warn!("Ignoring request for an exam without questions");
                None
            }
            Some(total) if capabilities.supports_exam => {
                Some(ExamTracker::start(total, deck.size(), &mut rng))
            }
            Some(_) => {
                log::warn!("{} mode cannot be run as an exam", deck.mode_type());
                None
            }
            None => None,
        };

        log::info!(
            "Starting {} session over {} cards{}",
            deck.mode_type(),
            deck.size(),
            exam.as_ref()
                .map(|exam| format!(" (exam of {} questions)", exam.total_questions()))
                .unwrap_or_default()
        );

        let mut session = Self {
            deck,
            rng,
            current: 0,
            correct_answer: String::new(),
            displayed_answer: None,
            face: CardFace::Front,
            state: ModeState::Review,
            exam,
            result: None,
        };
        let first = match session.exam.as_mut() {
            Some(exam) => exam.on_card_served().unwrap_or_default(),
            None => practice_draw(session.deck.size(), None, &mut session.rng),
        };
        session.load_card(first);
        session
    }

    fn load_card(&mut self, index: usize) {
        self.current = index;
        self.correct_answer = self.deck.answer_text(self.current_record()).to_string();
        self.displayed_answer = None;
        self.face = CardFace::Front;
        self.state = match self.deck.mode_type() {
            ModeType::Review => ModeState::Review,
            ModeType::Quiz => ModeState::Quiz {
                input: InputState::AwaitingSubmit,
            },
            ModeType::Mcq => ModeState::Mcq {
                options: build_options(&self.correct_answer, &self.deck, &mut self.rng),
                selected: None,
            },
        };
        log::debug!("Showing card {index}");
    }

    fn current_record(&self) -> &VocabRecord {
        &self.deck.records()[self.current]
    }

    fn mark_incorrect(&mut self) {
        let question = self.deck.question_text(self.current_record()).to_string();
        if let Some(exam) = self.exam.as_mut() {
            if exam.on_incorrect(&question, &self.correct_answer) {
                log::debug!("Counted {question:?} as incorrect");
            }
        }
    }

    pub fn actions(&self) -> ActionSet {
        if self.result.is_some() {
            return ActionSet::NONE;
        }
        match &self.state {
            ModeState::Review => ActionSet {
                can_advance: true,
                can_flip: true,
                ..ActionSet::NONE
            },
            ModeState::Quiz { input } => {
                let locked = input.is_locked();
                ActionSet {
                    can_submit: !locked,
                    can_advance: locked,
                    can_flip: true,
                    can_give_up: !locked,
                    can_select_option: false,
                    primary: if locked {
                        PrimaryAction::Advance
                    } else {
                        PrimaryAction::Submit
                    },
                }
            }
            ModeState::Mcq { selected, .. } => ActionSet {
                can_advance: selected.is_some(),
                can_flip: selected.is_some(),
                can_select_option: selected.is_none(),
                ..ActionSet::NONE
            },
        }
    }

    /// Grades a typed answer against every accepted alternative of the current card.
    pub fn submit(&mut self, submission: &str) -> SubmitOutcome {
        if !self.actions().can_submit {
            return SubmitOutcome::Blocked;
        }
        if submission.trim().is_empty() {
            return SubmitOutcome::Empty;
        }
        match matches_answer(submission, &self.correct_answer) {
            Some(canonical) => {
                self.state = ModeState::Quiz {
                    input: InputState::CorrectLocked,
                };
                self.displayed_answer = Some(canonical.clone());
                self.face = CardFace::Back;
                SubmitOutcome::Correct { canonical }
            }
            None => {
                self.state = ModeState::Quiz {
                    input: InputState::IncorrectShake,
                };
                self.mark_incorrect();
                SubmitOutcome::Incorrect
            }
        }
    }

    /// Ends the shake animation after a wrong answer.
    pub fn clear_shake(&mut self) {
        if let ModeState::Quiz { input } = &mut self.state {
            if *input == InputState::IncorrectShake {
                *input = InputState::AwaitingSubmit;
            }
        }
    }

    /// Reveals the answer of an unanswered quiz card. Counts as wrong in an exam.
    pub fn give_up(&mut self) -> bool {
        if !self.actions().can_give_up {
            return false;
        }
        self.state = ModeState::Quiz {
            input: InputState::Revealed,
        };
        self.displayed_answer = Some(canonical_answer(&self.correct_answer));
        self.face = CardFace::Back;
        self.mark_incorrect();
        true
    }

    /// Locks in a multiple-choice option and turns the card over.
    pub fn select_option(&mut self, choice: usize) -> SelectOutcome {
        let ModeState::Mcq { options, selected } = &mut self.state else {
            return SelectOutcome::Blocked;
        };
        if selected.is_some() || choice >= options.options.len() || self.result.is_some() {
            return SelectOutcome::Blocked;
        }
        *selected = Some(choice);
        let correct_index = options.correct_index;
        self.face = CardFace::Back;
        if choice == correct_index {
            SelectOutcome::Correct
        } else {
            self.mark_incorrect();
            SelectOutcome::Incorrect { correct_index }
        }
    }

    pub fn flip(&mut self) -> bool {
        if !self.actions().can_flip {
            return false;
        }
        self.face = self.face.flipped();
        true
    }

    /// Moves to the next card, or finishes the exam after its last question.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if !self.actions().can_advance {
            return AdvanceOutcome::Blocked;
        }
        let flip_back_delay_ms = (self.face == CardFace::Back).then_some(FLIP_TRANSITION_MS);

        let next = match self.exam.as_mut() {
            Some(exam) => match exam.on_card_served() {
                Some(index) => index,
                None => {
                    let Some(result) = exam.final_result() else {
                        return AdvanceOutcome::Blocked;
                    };
                    log::info!(
                        "Exam finished: {}% ({} of {} wrong)",
                        result.score,
                        result.incorrect_count,
                        result.total_questions
                    );
                    self.result = Some(result.clone());
                    return AdvanceOutcome::Finished { result };
                }
            },
            None => practice_draw(self.deck.size(), Some(self.current), &mut self.rng),
        };
        self.load_card(next);
        AdvanceOutcome::NextCard { flip_back_delay_ms }
    }

    pub fn card_view(&self) -> CardView {
        let record = self.current_record();
        let (input_state, options, selected_option, correct_option) = match &self.state {
            ModeState::Review => (None, Vec::new(), None, None),
            ModeState::Quiz { input } => (Some(*input), Vec::new(), None, None),
            ModeState::Mcq { options, selected } => (
                None,
                options.options.clone(),
                *selected,
                selected.map(|_| options.correct_index),
            ),
        };
        CardView {
            question: self.deck.question_text(record).to_string(),
            back_fields: self.deck.back_field_values(record),
            face: self.face,
            mode_type: self.deck.mode_type(),
            input_state,
            displayed_answer: self.displayed_answer.clone(),
            answer_placeholder: self.deck.answer_label().map(str::to_string),
            options,
            selected_option,
            correct_option,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.deck.mode_type().capabilities()
    }

    pub fn mode_type(&self) -> ModeType {
        self.deck.mode_type()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Index of the current card's record in the deck.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The raw answer field of the current card.
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn is_exam(&self) -> bool {
        self.exam.is_some()
    }

    pub fn exam_progress(&self) -> Option<ExamProgress> {
        self.exam.as_ref().map(ExamTracker::progress)
    }

    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}
