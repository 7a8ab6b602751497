use std::fmt;
use std::time::Duration;

use chrono::SecondsFormat;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::config::EngineConfig;
use crate::errors::GameError;
use crate::game::{Event, GameState, Outcome, Selection};
use crate::pile::{Pile, PileRef};
use crate::timer::{millis, SessionTimer, TickListener};

/// Game controller: owns the current [`GameState`], the session timer and
/// the seed sequence for new deals. This is the boundary a UI talks to.
///
/// # Examples
///
/// ```
/// use klondike_engine::engine::Engine;
/// use klondike_engine::pile::PileRef;
///
/// let mut engine = Engine::with_seed(12345);
/// engine.new_game().expect("deal");
///
/// let outcome = engine.draw().expect("game in progress");
/// assert!(outcome.is_accepted());
/// assert_eq!(outcome.changed, vec![PileRef::Stock, PileRef::Waste]);
/// assert_eq!(engine.move_count().unwrap(), 1);
/// ```
pub struct Engine {
    config: EngineConfig,
    /// Source of per-game deal seeds
    seeds: ChaCha20Rng,
    game: Option<GameState>,
    /// Layout the current game started from, replayed by `restart`
    initial: Option<GameState>,
    timer: SessionTimer,
    tick_listener: Option<TickListener>,
}

/// Serializable view of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub won: bool,
    pub elapsed_ms: u64,
    /// Session start (RFC3339)
    #[serde(default)]
    pub started_at: Option<String>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            config,
            seeds: ChaCha20Rng::seed_from_u64(seed),
            game: None,
            initial: None,
            timer: SessionTimer::new(),
            tick_listener: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Listener for periodic elapsed-time ticks. Takes effect from the next
    /// new game, restart or resume.
    pub fn set_tick_listener(&mut self, listener: TickListener) {
        self.tick_listener = Some(listener);
    }

    /// Deals a new game with the next seed of the engine's sequence.
    pub fn new_game(&mut self) -> Result<Outcome, GameError> {
        let seed = self.seeds.next_u64();
        self.new_game_with_seed(seed)
    }

    pub fn new_game_with_seed(&mut self, seed: u64) -> Result<Outcome, GameError> {
        let state = GameState::deal(seed)?;
        tracing::info!(seed, "dealing new game");
        Ok(self.install(state, Event::Dealt { seed }))
    }

    /// Replays the current game from its starting layout.
    pub fn restart(&mut self) -> Result<Outcome, GameError> {
        let initial = self.initial.clone().ok_or(GameError::NotInitialized)?;
        let event = match initial.seed() {
            Some(seed) => Event::Dealt { seed },
            None => Event::Resumed,
        };
        tracing::info!(seed = ?initial.seed(), "restarting game");
        Ok(self.install(initial, event))
    }

    /// Continues from a stored layout. The layout is checked with
    /// [`GameState::verify_layout`]; the move counter and selection start fresh.
    pub fn resume(&mut self, mut state: GameState) -> Result<Outcome, GameError> {
        state.verify_layout()?;
        state.reset_session();
        tracing::info!(seed = ?state.seed(), "resuming stored layout");
        Ok(self.install(state, Event::Resumed))
    }

    pub fn draw(&mut self) -> Result<Outcome, GameError> {
        let recycle_counts = self.config.recycle_counts_as_move;
        let outcome = self.playable()?.draw(recycle_counts);
        Ok(self.finish(outcome))
    }

    /// Accepts a [`CardId`] or a [`Card`].
    pub fn select_card(&mut self, id: impl Into<CardId>) -> Result<Outcome, GameError> {
        let id = id.into();
        let card = Card::from_id(id).ok_or(GameError::InvalidCard(id.0))?;
        let recycle_counts = self.config.recycle_counts_as_move;
        let outcome = self.playable()?.select_card(card, recycle_counts)?;
        Ok(self.finish(outcome))
    }

    pub fn attempt_move(&mut self, destination: PileRef) -> Result<Outcome, GameError> {
        if !destination.is_valid() {
            return Err(GameError::InvalidPile(destination));
        }
        let outcome = self.playable()?.attempt_move(destination)?;
        Ok(self.finish(outcome))
    }

    /// Moves the selection onto the pile that holds `id`.
    pub fn attempt_move_to_card(&mut self, id: impl Into<CardId>) -> Result<Outcome, GameError> {
        let id = id.into();
        let card = Card::from_id(id).ok_or(GameError::InvalidCard(id.0))?;
        let (destination, _) = self
            .state()?
            .locate(card)
            .ok_or(GameError::InvalidCard(id.0))?;
        self.attempt_move(destination)
    }

    pub fn deselect(&mut self) -> Result<Outcome, GameError> {
        let game = self.game.as_mut().ok_or(GameError::NotInitialized)?;
        Ok(game.deselect())
    }

    pub fn state(&self) -> Result<&GameState, GameError> {
        self.game.as_ref().ok_or(GameError::NotInitialized)
    }

    pub fn pile(&self, pile_ref: PileRef) -> Result<&Pile, GameError> {
        self.state()?.pile(pile_ref)
    }

    pub fn move_count(&self) -> Result<u32, GameError> {
        Ok(self.state()?.move_count())
    }

    pub fn selection(&self) -> Result<Option<Selection>, GameError> {
        Ok(self.state()?.selection())
    }

    pub fn is_won(&self) -> Result<bool, GameError> {
        Ok(self.state()?.is_won())
    }

    pub fn seed(&self) -> Result<Option<u64>, GameError> {
        Ok(self.state()?.seed())
    }

    /// Time since the current game started, frozen once it is won.
    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_ticking()
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let state = self.state()?.clone();
        Ok(GameSnapshot {
            won: state.is_won(),
            state,
            elapsed_ms: millis(self.elapsed()),
            started_at: self
                .timer
                .started_at()
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
    }

    fn install(&mut self, state: GameState, event: Event) -> Outcome {
        self.timer
            .restart(self.config.tick_interval(), self.tick_listener.clone());
        let outcome = Outcome {
            event,
            changed: PileRef::all(),
            move_count: state.move_count(),
            won: state.is_won(),
        };
        self.initial = Some(state.clone());
        self.game = Some(state);
        outcome
    }

    /// The running game, refusing further play once it is won.
    fn playable(&mut self) -> Result<&mut GameState, GameError> {
        let game = self.game.as_mut().ok_or(GameError::NotInitialized)?;
        if game.is_won() {
            return Err(GameError::GameAlreadyWon);
        }
        Ok(game)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        match &outcome.event {
            Event::Drew { card } => {
                tracing::debug!(card = %card, move_count = outcome.move_count, "drew card")
            }
            Event::Recycled { cards } => {
                tracing::debug!(cards, move_count = outcome.move_count, "recycled waste")
            }
            Event::Selected(selection) => {
                tracing::debug!(
                    card = %selection.card,
                    source = %selection.source,
                    "card selected"
                )
            }
            Event::Moved {
                from,
                to,
                cards,
                revealed,
            } => tracing::debug!(
                from = %from,
                to = %to,
                cards,
                revealed = ?revealed,
                move_count = outcome.move_count,
                "moved run"
            ),
            Event::Rejected(violation) => {
                tracing::debug!(reason = %violation, "request rejected")
            }
            Event::Dealt { .. } | Event::Resumed | Event::Deselected => {}
        }
        if outcome.won {
            self.timer.stop();
            tracing::info!(
                move_count = outcome.move_count,
                elapsed_ms = millis(self.timer.elapsed()),
                "game won"
            );
        }
        outcome
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("game", &self.game)
            .field("timer", &self.timer)
            .field("tick_listener", &self.tick_listener.is_some())
            .finish_non_exhaustive()
    }
}
