use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, PileCard};

pub const FOUNDATION_COUNT: usize = 4;
pub const TABLEAU_COUNT: usize = 7;

/// The role a pile plays on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PileKind {
    /// Face-down draw source
    Stock,
    /// Face-up discard fed by the stock; only the top is playable
    Waste,
    /// Ace-to-King build of a single suit
    Foundation,
    /// Alternating-color build down; face-down cards under a face-up run
    Tableau,
}

/// Names one concrete pile on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PileRef {
    Stock,
    Waste,
    Foundation(usize),
    Tableau(usize),
}

impl PileRef {
    pub fn kind(self) -> PileKind {
        match self {
            PileRef::Stock => PileKind::Stock,
            PileRef::Waste => PileKind::Waste,
            PileRef::Foundation(_) => PileKind::Foundation,
            PileRef::Tableau(_) => PileKind::Tableau,
        }
    }

    /// Every pile on the table, in a fixed order.
    pub fn all() -> Vec<PileRef> {
        let mut v = vec![PileRef::Stock, PileRef::Waste];
        v.extend((0..FOUNDATION_COUNT).map(PileRef::Foundation));
        v.extend((0..TABLEAU_COUNT).map(PileRef::Tableau));
        v
    }

    pub fn is_valid(self) -> bool {
        match self {
            PileRef::Stock | PileRef::Waste => true,
            PileRef::Foundation(i) => i < FOUNDATION_COUNT,
            PileRef::Tableau(i) => i < TABLEAU_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown pile name: {0:?}")]
pub struct ParsePileRefError(String);

/// Parses the [`fmt::Display`] form (`stock`, `waste`, `foundation-2`,
/// `tableau-6`). Indices out of range are rejected.
impl FromStr for PileRef {
    type Err = ParsePileRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePileRefError(s.to_string());
        let pile_ref = match s.split_once('-') {
            None if s == "stock" => PileRef::Stock,
            None if s == "waste" => PileRef::Waste,
            Some(("foundation", i)) => PileRef::Foundation(i.parse().map_err(|_| err())?),
            Some(("tableau", i)) => PileRef::Tableau(i.parse().map_err(|_| err())?),
            _ => return Err(err()),
        };
        if pile_ref.is_valid() {
            Ok(pile_ref)
        } else {
            Err(err())
        }
    }
}

impl fmt::Display for PileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PileRef::Stock => write!(f, "stock"),
            PileRef::Waste => write!(f, "waste"),
            PileRef::Foundation(i) => write!(f, "foundation-{}", i),
            PileRef::Tableau(i) => write!(f, "tableau-{}", i),
        }
    }
}

/// An ordered stack of cards. Index 0 is the bottom, the last element is the top.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pile {
    kind: PileKind,
    cards: Vec<PileCard>,
}

impl Pile {
    pub fn new(kind: PileKind) -> Self {
        Self {
            kind,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(kind: PileKind, cards: Vec<PileCard>) -> Self {
        Self { kind, cards }
    }

    pub fn kind(&self) -> PileKind {
        self.kind
    }

    pub fn cards(&self) -> &[PileCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top(&self) -> Option<&PileCard> {
        self.cards.last()
    }

    pub fn push(&mut self, card: PileCard) {
        self.cards.push(card);
    }

    pub fn pop(&mut self) -> Option<PileCard> {
        self.cards.pop()
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|c| c.card == card)
    }

    /// Removes and returns everything from `index` to the top, preserving order.
    pub fn split_off(&mut self, index: usize) -> Vec<PileCard> {
        if index >= self.cards.len() {
            return Vec::new();
        }
        self.cards.split_off(index)
    }

    pub fn extend(&mut self, run: Vec<PileCard>) {
        self.cards.extend(run);
    }

    /// Removes every card, leaving the pile empty.
    pub fn take_all(&mut self) -> Vec<PileCard> {
        std::mem::take(&mut self.cards)
    }

    /// Start index of the maximal face-up suffix, if the top is face-up.
    pub fn face_up_run_start(&self) -> Option<usize> {
        let hidden = self.cards.iter().rposition(|c| !c.face_up);
        match hidden {
            Some(i) if i + 1 == self.cards.len() => None,
            Some(i) => Some(i + 1),
            None if self.cards.is_empty() => None,
            None => Some(0),
        }
    }

    /// Turns the top card face-up if it is face-down and reports it.
    pub fn reveal_top(&mut self) -> Option<Card> {
        match self.cards.last_mut() {
            Some(top) if !top.face_up => {
                top.face_up = true;
                Some(top.card)
            }
            _ => None,
        }
    }
}
