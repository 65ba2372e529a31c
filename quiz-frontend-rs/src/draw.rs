use rand::Rng;
use rand::seq::SliceRandom as _;

/// Picks the next practice card uniformly at random, never repeating the previous one.
pub fn practice_draw(deck_size: usize, previous: Option<usize>, rng: &mut impl Rng) -> usize {
    if deck_size <= 1 {
        return 0;
    }
    loop {
        let index = rng.random_range(0..deck_size);
        if Some(index) != previous {
            return index;
        }
    }
}

/// A fresh random order of every record index, consumed front to back during an exam.
pub fn exam_order(deck_size: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..deck_size).collect();
    order.shuffle(rng);
    order
}
