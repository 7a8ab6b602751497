use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents one of the four suits in a standard 52-card deck.
/// Declaration order is the canonical deck order (suit-major).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts suit (♥)
    Hearts,
    /// Diamonds suit (♦)
    Diamonds,
    /// Spades suit (♠)
    Spades,
    /// Clubs suit (♣)
    Clubs,
}

impl Suit {
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Spades | Suit::Clubs => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Clubs => '♣',
        }
    }

    fn index(self) -> u8 {
        self as u8
    }
}

/// Card color, derived from the suit. Tableau builds must alternate it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Represents the rank of a playing card from Ace (low) through King.
/// Numeric values follow the Klondike building order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Ace (1)
    Ace = 1,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
}

impl Rank {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            1 => Some(Rank::Ace),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Stable identifier of a card within the 52-card deck (`0..52`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u8);

/// Represents a single playing card with a suit and rank.
/// The pair is unique within a game and doubles as the card's identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card
    pub suit: Suit,
    /// The rank of the card (Ace through King)
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn id(&self) -> CardId {
        CardId(self.suit.index() * 13 + (self.rank.value() - 1))
    }

    pub fn from_id(id: CardId) -> Option<Card> {
        let suit = *all_suits().get(usize::from(id.0 / 13))?;
        let rank = Rank::from_u8(id.0 % 13 + 1)?;
        Some(Card { suit, rank })
    }
}

impl From<Card> for CardId {
    fn from(card: Card) -> Self {
        card.id()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// A card as it lies in a pile: identity plus its current orientation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PileCard {
    pub card: Card,
    /// Whether the card is showing its face
    pub face_up: bool,
}

impl PileCard {
    pub fn face_down(card: Card) -> Self {
        Self {
            card,
            face_up: false,
        }
    }

    pub fn face_up(card: Card) -> Self {
        Self {
            card,
            face_up: true,
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { suit: s, rank: r });
        }
    }
    v
}
