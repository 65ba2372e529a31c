use rand::Rng;

use crate::draw::exam_order;

/// A card the learner got wrong during an exam.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct IncorrectEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ExamProgress {
    pub served: usize,
    pub total: usize,
    pub incorrect_count: usize,
    /// `None` until at least one question has been served.
    pub score: Option<u32>,
    /// The requested number of questions exceeded the deck and was reduced.
    pub clamped: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub score: u32,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub total_questions: usize,
    pub incorrect_log: Vec<IncorrectEntry>,
}

/// Bookkeeping for a bounded, non-repeating, scored run through a deck.
#[derive(Clone, Debug)]
pub struct ExamTracker {
    total_questions: usize,
    current_question_number: usize,
    incorrect_count: usize,
    // set once the current card has been counted wrong
    current_card_marked_wrong: bool,
    incorrect_log: Vec<IncorrectEntry>,
    order: Vec<usize>,
    clamped: bool,
}

impl ExamTracker {
    /// Starts an exam of `total_questions`, clamped to the deck size, over a freshly shuffled deck.
    pub fn start(total_questions: usize, deck_size: usize, rng: &mut impl Rng) -> Self {
        let clamped = total_questions > deck_size;
        if clamped {
            log::warn!(
                "Exam asked for {total_questions} questions but the deck only has {deck_size}"
            );
        }
        Self {
            total_questions: total_questions.min(deck_size),
            current_question_number: 0,
            incorrect_count: 0,
            current_card_marked_wrong: false,
            incorrect_log: Vec::new(),
            order: exam_order(deck_size, rng),
            clamped,
        }
    }

    /// Moves on to the next question and returns the record index to show,
    /// or `None` once every question has been served.
    pub fn on_card_served(&mut self) -> Option<usize> {
        if self.is_complete() {
            return None;
        }
        let index = *self.order.get(self.current_question_number)?;
        self.current_question_number += 1;
        self.current_card_marked_wrong = false;
        Some(index)
    }

    /// Counts the current card as wrong. Only the first call per card has an effect.
    pub fn on_incorrect(&mut self, question: &str, answer: &str) -> bool {
        if self.current_card_marked_wrong {
            return false;
        }
        self.current_card_marked_wrong = true;
        self.incorrect_count += 1;
        self.incorrect_log.push(IncorrectEntry {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        true
    }

    pub fn is_complete(&self) -> bool {
        self.current_question_number >= self.total_questions
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn questions_served(&self) -> usize {
        self.current_question_number
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    pub fn was_clamped(&self) -> bool {
        self.clamped
    }

    /// Percentage of served questions answered without a mistake, rounded.
    pub fn score(&self) -> Option<u32> {
        let served = self.current_question_number;
        if served == 0 {
            return None;
        }
        let correct = served.saturating_sub(self.incorrect_count);
        Some((100.0 * correct as f64 / served as f64).round() as u32)
    }

    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            served: self.current_question_number,
            total: self.total_questions,
            incorrect_count: self.incorrect_count,
            score: self.score(),
            clamped: self.clamped,
        }
    }

    /// The outcome once every question was served. An exam that served nothing has no result.
    pub fn final_result(&self) -> Option<ExamResult> {
        if !self.is_complete() {
            return None;
        }
        let served = self.current_question_number;
        Some(ExamResult {
            score: self.score()?,
            correct_count: served.saturating_sub(self.incorrect_count),
            incorrect_count: self.incorrect_count,
            total_questions: self.total_questions,
            incorrect_log: self.incorrect_log.clone(),
        })
    }
}
