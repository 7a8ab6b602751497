use thiserror::Error;

use crate::pile::PileRef;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("No game in progress")]
    NotInitialized,
    #[error("Invalid card reference: {0}")]
    InvalidCard(u8),
    #[error("Invalid pile reference: {0}")]
    InvalidPile(PileRef),
    #[error("Game already won")]
    GameAlreadyWon,
    #[error("Deck exhausted while dealing (needed {needed}, had {available})")]
    DeckExhausted { needed: usize, available: usize },
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

impl GameError {
    /// True for errors caused by a card or pile reference that does not exist.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, GameError::InvalidCard(_) | GameError::InvalidPile(_))
    }
}
