use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{PileCard, Rank};
use crate::pile::{Pile, PileKind};

/// Cards in a completed foundation.
pub const FULL_FOUNDATION: usize = 13;

/// Why an ordinary request was turned down. These are reported in an
/// [`crate::game::Outcome`], never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Violation {
    #[error("nothing to move")]
    EmptyRun,
    #[error("card is face-down")]
    FaceDown,
    #[error("card is not at the head of a movable run")]
    NotRunHead,
    #[error("no card is selected")]
    NoSelection,
    #[error("a card is already selected")]
    SelectionActive,
    #[error("stock and waste are both empty")]
    NothingToDraw,
    #[error("source and destination are the same pile")]
    SamePile,
    #[error("stock and waste do not accept cards")]
    NotATarget,
    #[error("only one card at a time may go to a foundation")]
    MultipleCardsToFoundation,
    #[error("an empty foundation only accepts an ace")]
    FoundationNeedsAce,
    #[error("foundation holds a different suit")]
    SuitMismatch,
    #[error("card is not the next rank for this foundation")]
    RankNotNext,
    #[error("an empty tableau column only accepts a king")]
    TableauNeedsKing,
    #[error("tableau builds must alternate colors")]
    SameColor,
    #[error("card must be exactly one rank lower than the tableau top")]
    RankNotOneLower,
}

/// Returns the run headed by the card at `index` if it may be picked up.
///
/// Waste and foundation piles only give up their top card; a tableau gives
/// up any suffix that is entirely face-up. The stock is never a source.
pub fn movable_run(pile: &Pile, index: usize) -> Result<&[PileCard], Violation> {
    let cards = pile.cards();
    let head = cards.get(index).ok_or(Violation::EmptyRun)?;
    if !head.face_up {
        return Err(Violation::FaceDown);
    }
    match pile.kind() {
        PileKind::Stock => Err(Violation::NotRunHead),
        PileKind::Waste | PileKind::Foundation => {
            if index + 1 == cards.len() {
                Ok(&cards[index..])
            } else {
                Err(Violation::NotRunHead)
            }
        }
        PileKind::Tableau => match pile.face_up_run_start() {
            Some(start) if index >= start => Ok(&cards[index..]),
            _ => Err(Violation::NotRunHead),
        },
    }
}

/// Validates placing `run` (bottom card first) onto `destination`.
///
/// # Errors
///
/// Returns the [`Violation`] naming the first rule the move breaks.
///
/// # Examples
///
/// ```
/// use klondike_engine::cards::{Card, PileCard, Rank, Suit};
/// use klondike_engine::pile::{Pile, PileKind};
/// use klondike_engine::rules::{validate_move, Violation};
///
/// let king = Pile::with_cards(
///     PileKind::Tableau,
///     vec![PileCard::face_up(Card::new(Suit::Hearts, Rank::King))],
/// );
/// let black_queen = [PileCard::face_up(Card::new(Suit::Spades, Rank::Queen))];
/// let red_queen = [PileCard::face_up(Card::new(Suit::Diamonds, Rank::Queen))];
///
/// assert_eq!(validate_move(&black_queen, &king), Ok(()));
/// assert_eq!(validate_move(&red_queen, &king), Err(Violation::SameColor));
/// ```
pub fn validate_move(run: &[PileCard], destination: &Pile) -> Result<(), Violation> {
    let bottom = run.first().ok_or(Violation::EmptyRun)?;
    if run.iter().any(|c| !c.face_up) {
        return Err(Violation::FaceDown);
    }
    let moving = bottom.card;
    match destination.kind() {
        PileKind::Stock | PileKind::Waste => Err(Violation::NotATarget),
        PileKind::Foundation => {
            if run.len() != 1 {
                return Err(Violation::MultipleCardsToFoundation);
            }
            match destination.top() {
                None if moving.rank == Rank::Ace => Ok(()),
                None => Err(Violation::FoundationNeedsAce),
                Some(top) if top.card.suit != moving.suit => Err(Violation::SuitMismatch),
                Some(top) if moving.rank.value() != top.card.rank.value() + 1 => {
                    Err(Violation::RankNotNext)
                }
                Some(_) => Ok(()),
            }
        }
        PileKind::Tableau => match destination.top() {
            None if moving.rank == Rank::King => Ok(()),
            None => Err(Violation::TableauNeedsKing),
            Some(top) if top.card.color() == moving.color() => Err(Violation::SameColor),
            Some(top) if moving.rank.value() + 1 != top.card.rank.value() => {
                Err(Violation::RankNotOneLower)
            }
            Some(_) => Ok(()),
        },
    }
}

pub fn is_legal_move(run: &[PileCard], destination: &Pile) -> bool {
    validate_move(run, destination).is_ok()
}

/// True iff at least one move was made and every foundation is complete.
pub fn check_win(foundations: &[Pile], move_count: u32) -> bool {
    if move_count == 0 {
        return false;
    }
    foundations.len() == crate::pile::FOUNDATION_COUNT
        && foundations.iter().all(|f| f.len() == FULL_FOUNDATION)
}

/// True when the pile is Ace..n of a single suit, bottom to top.
pub fn is_ordered_foundation(pile: &Pile) -> bool {
    let cards = pile.cards();
    let Some(first) = cards.first() else {
        return true;
    };
    cards.iter().enumerate().all(|(i, c)| {
        c.card.suit == first.card.suit && usize::from(c.card.rank.value()) == i + 1
    })
}
