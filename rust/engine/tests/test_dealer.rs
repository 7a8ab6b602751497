use std::collections::HashSet;

use klondike_engine::cards::Card;
use klondike_engine::dealer::{deal, TABLEAU_DEAL};
use klondike_engine::deck::{create_deck, Deck};
use klondike_engine::errors::GameError;

fn shuffled(seed: u64) -> Vec<klondike_engine::cards::PileCard> {
    let mut deck = Deck::new_with_seed(seed);
    deck.shuffle();
    deck.into_cards()
}

#[test]
fn columns_grow_by_one_with_only_the_last_card_face_up() {
    let dealt = deal(shuffled(42)).expect("deal");
    for (i, column) in dealt.tableau.iter().enumerate() {
        assert_eq!(column.len(), i + 1, "column {i}");
        let (last, rest) = column.cards().split_last().expect("non-empty");
        assert!(last.face_up, "column {i} top must be face-up");
        assert!(rest.iter().all(|c| !c.face_up), "column {i} must hide the rest");
    }
}

#[test]
fn stock_keeps_the_remaining_24_face_down() {
    let dealt = deal(shuffled(42)).expect("deal");
    assert_eq!(dealt.stock.len(), 24);
    assert!(dealt.stock.cards().iter().all(|c| !c.face_up));

    let mut all: HashSet<Card> = dealt.stock.cards().iter().map(|c| c.card).collect();
    for column in &dealt.tableau {
        for c in column.cards() {
            assert!(all.insert(c.card));
        }
    }
    assert_eq!(all.len(), 52);
}

#[test]
fn cards_come_off_the_end_of_the_deck() {
    let deck = create_deck();
    let dealt = deal(deck.clone()).expect("deal");
    // first card dealt is the last card of the deck
    assert_eq!(dealt.tableau[0].cards()[0].card, deck[51].card);
    assert_eq!(dealt.tableau[1].cards()[0].card, deck[50].card);
    assert_eq!(dealt.tableau[1].cards()[1].card, deck[49].card);
    // the stock is what remains, in order
    let stock: Vec<Card> = dealt.stock.cards().iter().map(|c| c.card).collect();
    let expected: Vec<Card> = deck[..52 - TABLEAU_DEAL].iter().map(|c| c.card).collect();
    assert_eq!(stock, expected);
}

#[test]
fn dealing_is_deterministic() {
    assert_eq!(deal(shuffled(7)).unwrap(), deal(shuffled(7)).unwrap());
}

#[test]
fn short_deck_is_rejected() {
    let mut deck = create_deck();
    deck.truncate(20);
    assert_eq!(
        deal(deck),
        Err(GameError::DeckExhausted {
            needed: 28,
            available: 20
        })
    );
}
