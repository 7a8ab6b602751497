//! # klondike-engine: Klondike Solitaire Rules Engine
//!
//! A deterministic single-player Klondike engine (draw one, seven tableau
//! columns, four foundations). Owns deck construction, shuffling, dealing,
//! move legality, state transitions, win detection, and the move counter and
//! session timer. Rendering and input handling belong to the caller, which
//! issues commands to an [`engine::Engine`] and re-renders from its queries.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Color, Card, CardId, PileCard)
//! - [`deck`] - Canonical deck and seeded Fisher-Yates shuffling with ChaCha20
//! - [`dealer`] - Opening Klondike layout
//! - [`pile`] - Pile containers and pile references
//! - [`rules`] - Move validation, run eligibility and win detection
//! - [`game`] - Game state aggregate and its state machine
//! - [`engine`] - Command/query boundary for a UI
//! - [`timer`] - Elapsed-time tracking and the cancellable tick
//! - [`config`] - Engine configuration and environment overrides
//! - [`logging`] - Tracing subscriber setup and log capture for tests
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use klondike_engine::engine::Engine;
//! use klondike_engine::pile::PileRef;
//!
//! let mut engine = Engine::with_seed(7);
//! engine.new_game().expect("deal");
//!
//! // Every column's top card is face-up after the deal
//! let column = engine.pile(PileRef::Tableau(6)).unwrap();
//! assert_eq!(column.len(), 7);
//! assert!(column.top().unwrap().face_up);
//!
//! // Picking up a face-down stock card draws it instead
//! let stock_top = engine.pile(PileRef::Stock).unwrap().top().unwrap().card;
//! let outcome = engine.select_card(stock_top.id()).unwrap();
//! assert_eq!(engine.pile(PileRef::Waste).unwrap().top().unwrap().card, stock_top);
//! assert_eq!(outcome.move_count, 1);
//! ```
//!
//! ## Move Validation
//!
//! ```rust
//! use klondike_engine::cards::{Card, PileCard, Rank, Suit};
//! use klondike_engine::pile::{Pile, PileKind};
//! use klondike_engine::rules::is_legal_move;
//!
//! let empty_foundation = Pile::new(PileKind::Foundation);
//! let ace = [PileCard::face_up(Card::new(Suit::Clubs, Rank::Ace))];
//! assert!(is_legal_move(&ace, &empty_foundation));
//! ```

pub mod cards;
pub mod config;
pub mod dealer;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod logging;
pub mod pile;
pub mod rules;
pub mod timer;
