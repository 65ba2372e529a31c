use quiz_utils::text_cleanup::canonical_answer;

use crate::exam::ExamResult;
use crate::session::{AdvanceOutcome, CardView, Session, SubmitOutcome};

/// What a scripted learner does with a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Type(String),
    Choose(usize),
    GiveUp,
}

/// Decides how to answer each card of a simulated exam.
pub trait Answerer {
    fn answer(&mut self, card: &CardView, correct_answer: &str) -> Answer;
}

impl<F: FnMut(&CardView, &str) -> Answer> Answerer for F {
    fn answer(&mut self, card: &CardView, correct_answer: &str) -> Answer {
        self(card, correct_answer)
    }
}

pub struct AlwaysCorrect;

impl Answerer for AlwaysCorrect {
    fn answer(&mut self, card: &CardView, correct_answer: &str) -> Answer {
        if card.options.is_empty() {
            Answer::Type(canonical_answer(correct_answer))
        } else {
            let index = card
                .options
                .iter()
                .position(|option| option == correct_answer)
                .unwrap_or_default();
            Answer::Choose(index)
        }
    }
}

pub struct AlwaysWrong;

impl Answerer for AlwaysWrong {
    fn answer(&mut self, card: &CardView, correct_answer: &str) -> Answer {
        match card
            .options
            .iter()
            .position(|option| option != correct_answer)
        {
            Some(index) => Answer::Choose(index),
            None => Answer::GiveUp,
        }
    }
}

/// One question of a finished simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedCard {
    pub question: String,
    pub answer: Answer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    pub cards: Vec<SimulatedCard>,
    pub result: ExamResult,
}

/// Drives an exam session from its first card to its result.
pub struct ExamSimulation {
    session: Session,
}

impl ExamSimulation {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Returns `None` when the session is not an exam or stops accepting answers early.
    pub fn run(mut self, answerer: &mut impl Answerer) -> Option<SimulationReport> {
        let total = self.session.exam_progress()?.total;
        let mut cards = Vec::with_capacity(total);

        for _ in 0..=total {
            let view = self.session.card_view();
            let answer = answerer.answer(&view, self.session.correct_answer());
            match &answer {
                Answer::Type(text) => {
                    let outcome = self.session.submit(text);
                    if !matches!(outcome, SubmitOutcome::Correct { .. }) {
                        self.session.give_up();
                    }
                }
                Answer::Choose(index) => {
                    self.session.select_option(*index);
                }
                Answer::GiveUp => {
                    self.session.give_up();
                }
            }
            cards.push(SimulatedCard {
                question: view.question,
                answer,
            });

            match self.session.advance() {
                AdvanceOutcome::NextCard { .. } => {}
                AdvanceOutcome::Finished { result } => {
                    return Some(SimulationReport { cards, result });
                }
                AdvanceOutcome::Blocked => {
                    log::warn!("Simulation stalled after {} cards", cards.len());
                    return None;
                }
            }
        }
        None
    }
}
