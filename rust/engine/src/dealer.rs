use crate::cards::PileCard;
use crate::errors::GameError;
use crate::pile::{Pile, PileKind, TABLEAU_COUNT};

/// Cards dealt to the tableau: 1 + 2 + ... + 7.
pub const TABLEAU_DEAL: usize = TABLEAU_COUNT * (TABLEAU_COUNT + 1) / 2;

/// Initial Klondike layout produced by [`deal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub tableau: [Pile; TABLEAU_COUNT],
    pub stock: Pile,
}

/// Deals a shuffled deck into the seven tableau columns and the stock.
///
/// Column `i` receives `i + 1` cards taken from the end of `deck`; only the
/// last card dealt to each column is face-up. What remains becomes the stock,
/// face-down, in its remaining order.
///
/// # Errors
///
/// [`GameError::DeckExhausted`] when the deck holds fewer cards than the
/// tableau needs.
pub fn deal(mut deck: Vec<PileCard>) -> Result<Deal, GameError> {
    if deck.len() < TABLEAU_DEAL {
        return Err(GameError::DeckExhausted {
            needed: TABLEAU_DEAL,
            available: deck.len(),
        });
    }
    let mut tableau: [Pile; TABLEAU_COUNT] =
        std::array::from_fn(|_| Pile::new(PileKind::Tableau));
    for (i, column) in tableau.iter_mut().enumerate() {
        for j in 0..=i {
            let mut card = deck.pop().ok_or(GameError::DeckExhausted {
                needed: TABLEAU_DEAL,
                available: 0,
            })?;
            card.face_up = j == i;
            column.push(card);
        }
    }
    for card in deck.iter_mut() {
        card.face_up = false;
    }
    Ok(Deal {
        tableau,
        stock: Pile::with_cards(PileKind::Stock, deck),
    })
}
