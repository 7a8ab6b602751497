use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card, PileCard};

/// Returns the 52 cards in canonical order (suit-major, rank-minor), all face-down.
pub fn create_deck() -> Vec<PileCard> {
    full_deck().into_iter().map(PileCard::face_down).collect()
}

/// In-place Fisher-Yates shuffle: for `i` from the last index down to 1,
/// swap element `i` with a uniformly chosen element at index `<= i`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// A seeded deck. The same seed always yields the same shuffled order.
///
/// # Examples
///
/// ```
/// use klondike_engine::deck::Deck;
///
/// let mut a = Deck::new_with_seed(42);
/// let mut b = Deck::new_with_seed(42);
/// a.shuffle();
/// b.shuffle();
/// assert_eq!(a.cards(), b.cards());
/// ```
#[derive(Debug)]
pub struct Deck {
    cards: Vec<PileCard>,
    rng: ChaCha20Rng,
    seed: u64,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep canonical order until shuffle is called explicitly
        Self {
            cards: create_deck(),
            rng,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shuffle(&mut self) {
        self.cards = create_deck();
        shuffle(&mut self.cards, &mut self.rng);
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().map(|c| c.card).collect()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Hands the current order over to the dealer. The end of the vector is the top.
    pub fn into_cards(self) -> Vec<PileCard> {
        self.cards
    }
}
