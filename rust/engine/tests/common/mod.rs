#![allow(dead_code)]

use std::collections::HashSet;

use klondike_engine::cards::{all_ranks, full_deck, Card, PileCard, Rank, Suit};
use klondike_engine::game::GameState;

pub fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(suit, rank)
}

pub fn up(rank: Rank, suit: Suit) -> PileCard {
    PileCard::face_up(card(rank, suit))
}

pub fn down(rank: Rank, suit: Suit) -> PileCard {
    PileCard::face_down(card(rank, suit))
}

/// Ace..=`top` of `suit`, face-up, as a foundation holds them.
pub fn foundation_up_to(suit: Suit, top: Rank) -> Vec<PileCard> {
    all_ranks()
        .into_iter()
        .filter(|r| *r <= top)
        .map(|r| up(r, suit))
        .collect()
}

/// Builds a legal 52-card layout from the given piles; every card not
/// mentioned goes to the stock face-down in canonical order.
pub fn layout(
    waste: Vec<PileCard>,
    foundations: [Vec<PileCard>; 4],
    tableau: [Vec<PileCard>; 7],
) -> GameState {
    let placed: HashSet<Card> = waste
        .iter()
        .chain(foundations.iter().flatten())
        .chain(tableau.iter().flatten())
        .map(|c| c.card)
        .collect();
    let stock: Vec<PileCard> = full_deck()
        .into_iter()
        .filter(|c| !placed.contains(c))
        .map(PileCard::face_down)
        .collect();
    GameState::from_piles(stock, waste, foundations, tableau).expect("valid layout")
}

/// Same as [`layout`] but with an explicitly empty stock; the caller must
/// place all 52 cards.
pub fn layout_without_stock(
    waste: Vec<PileCard>,
    foundations: [Vec<PileCard>; 4],
    tableau: [Vec<PileCard>; 7],
) -> GameState {
    GameState::from_piles(vec![], waste, foundations, tableau).expect("valid layout")
}

/// Every card in the game is present exactly once.
pub fn assert_full_census(state: &GameState) {
    let mut seen = HashSet::new();
    for pile in state.piles() {
        for pc in pile.cards() {
            assert!(seen.insert(pc.card), "{} duplicated", pc.card);
        }
    }
    assert_eq!(seen.len(), 52);
}
