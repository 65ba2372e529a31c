use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::deck::Deck;

/// Wrong options offered next to the correct one.
pub const DISTRACTOR_COUNT: usize = 3;

// sampling gives up after this many draws so tiny decks still terminate
const MAX_ATTEMPTS: usize = 20;

/// The shuffled options of a multiple-choice card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSet {
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Samples up to `count` distinct wrong answers from the deck
///
/// Candidates equal to the correct answer are rejected by raw comparison, so
/// spellings that only differ in punctuation can still appear as distractors.
pub fn generate_distractors(
    correct_answer: &str,
    deck: &Deck,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    let wanted = count.min(deck.size().saturating_sub(1));
    let mut distractors: Vec<String> = Vec::with_capacity(wanted);
    let mut attempts = 0;

    while distractors.len() < wanted && attempts < MAX_ATTEMPTS {
        attempts += 1;
        let Some(record) = deck.record_at(rng.random_range(0..deck.size())) else {
            continue;
        };
        let candidate = deck.answer_text(record);
        if candidate.is_empty()
            || candidate == correct_answer
            || distractors.iter().any(|chosen| chosen == candidate)
        {
            continue;
        }
        distractors.push(candidate.to_string());
    }

    if distractors.len() < wanted {
        log::debug!(
            "Only found {} of {wanted} distractors for {correct_answer:?}",
            distractors.len()
        );
    }
    distractors
}

/// The correct answer plus its distractors, in random order.
pub fn build_options(correct_answer: &str, deck: &Deck, rng: &mut impl Rng) -> OptionSet {
    let mut options = generate_distractors(correct_answer, deck, DISTRACTOR_COUNT, rng);
    options.push(correct_answer.to_string());
    options.shuffle(rng);
    let correct_index = options
        .iter()
        .position(|option| option == correct_answer)
        .unwrap_or_default();
    OptionSet {
        options,
        correct_index,
    }
}
