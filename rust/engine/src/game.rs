use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, PileCard};
use crate::dealer::deal;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::pile::{Pile, PileKind, PileRef, FOUNDATION_COUNT, TABLEAU_COUNT};
use crate::rules::{check_win, is_ordered_foundation, movable_run, validate_move, Violation};

/// The card picked up by the player and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub card: Card,
    pub source: PileRef,
    /// Position of `card` within the source pile; the run is everything above it
    pub index: usize,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A fresh layout was dealt from `seed`
    Dealt { seed: u64 },
    /// A stored layout was loaded
    Resumed,
    /// The stock top went face-up onto the waste
    Drew { card: Card },
    /// The waste was turned back over into the stock
    Recycled { cards: usize },
    Selected(Selection),
    Moved {
        from: PileRef,
        to: PileRef,
        cards: usize,
        /// Tableau card turned face-up by the move, if any
        revealed: Option<Card>,
    },
    Deselected,
    Rejected(Violation),
}

/// Result of a command: what happened, which piles need re-rendering, and
/// the counters after the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub event: Event,
    pub changed: Vec<PileRef>,
    pub move_count: u32,
    pub won: bool,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self.event, Event::Rejected(_))
    }

    pub fn violation(&self) -> Option<Violation> {
        match self.event {
            Event::Rejected(v) => Some(v),
            _ => None,
        }
    }
}

/// Every pile on the table plus the move counter and the current selection.
///
/// Commands validate before they mutate, so a rejected command leaves the
/// state exactly as it was (apart from clearing the selection where the
/// command says so).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Deal seed; `None` for layouts built from explicit piles
    seed: Option<u64>,
    stock: Pile,
    waste: Pile,
    foundations: [Pile; FOUNDATION_COUNT],
    tableau: [Pile; TABLEAU_COUNT],
    move_count: u32,
    selection: Option<Selection>,
}

impl GameState {
    /// Shuffles a deck with `seed` and deals the opening layout.
    pub fn deal(seed: u64) -> Result<Self, GameError> {
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let seed = deck.seed();
        let dealt = deal(deck.into_cards())?;
        Ok(Self {
            seed: Some(seed),
            stock: dealt.stock,
            waste: Pile::new(PileKind::Waste),
            foundations: std::array::from_fn(|_| Pile::new(PileKind::Foundation)),
            tableau: dealt.tableau,
            move_count: 0,
            selection: None,
        })
    }

    /// Builds a layout from explicit pile contents (bottom card first).
    ///
    /// The layout must pass [`GameState::verify_layout`]; tableau builds are
    /// taken as given.
    pub fn from_piles(
        stock: Vec<PileCard>,
        waste: Vec<PileCard>,
        foundations: [Vec<PileCard>; FOUNDATION_COUNT],
        tableau: [Vec<PileCard>; TABLEAU_COUNT],
    ) -> Result<Self, GameError> {
        let state = Self {
            seed: None,
            stock: Pile::with_cards(PileKind::Stock, stock),
            waste: Pile::with_cards(PileKind::Waste, waste),
            foundations: foundations
                .map(|cards| Pile::with_cards(PileKind::Foundation, cards)),
            tableau: tableau.map(|cards| Pile::with_cards(PileKind::Tableau, cards)),
            move_count: 0,
            selection: None,
        };
        state.verify_layout()?;
        Ok(state)
    }

    /// Census plus the per-pile rules a stored layout must already satisfy:
    /// stock face-down, waste face-up, foundations face-up Ace..n of one suit,
    /// and tableau face-down cards only beneath face-up ones.
    pub fn verify_layout(&self) -> Result<(), GameError> {
        self.verify_census()?;
        if self.stock.cards().iter().any(|c| c.face_up) {
            return Err(GameError::InvalidLayout(
                "stock holds a face-up card".to_string(),
            ));
        }
        if let Some(pc) = self.waste.cards().iter().find(|c| !c.face_up) {
            return Err(GameError::InvalidLayout(format!(
                "waste holds face-down {}",
                pc.card
            )));
        }
        for (i, foundation) in self.foundations.iter().enumerate() {
            if foundation.cards().iter().any(|c| !c.face_up) {
                return Err(GameError::InvalidLayout(format!(
                    "{} holds a face-down card",
                    PileRef::Foundation(i)
                )));
            }
            if !is_ordered_foundation(foundation) {
                return Err(GameError::InvalidLayout(format!(
                    "{} is not Ace upwards in one suit",
                    PileRef::Foundation(i)
                )));
            }
        }
        for (i, column) in self.tableau.iter().enumerate() {
            let hidden_above_run = column
                .face_up_run_start()
                .map_or(column.cards(), |start| &column.cards()[..start])
                .iter()
                .any(|c| c.face_up);
            if hidden_above_run {
                return Err(GameError::InvalidLayout(format!(
                    "{} has a face-down card above a face-up one",
                    PileRef::Tableau(i)
                )));
            }
        }
        Ok(())
    }

    /// Checks that every one of the 52 cards is on the table exactly once and
    /// that each pile sits in a slot of its own kind.
    pub fn verify_census(&self) -> Result<(), GameError> {
        for pile_ref in PileRef::all() {
            let pile = self.pile(pile_ref)?;
            if pile.kind() != pile_ref.kind() {
                return Err(GameError::InvalidLayout(format!(
                    "{} holds a {:?} pile",
                    pile_ref,
                    pile.kind()
                )));
            }
        }
        let mut seen = HashSet::with_capacity(52);
        for pile in self.piles() {
            for pc in pile.cards() {
                if !seen.insert(pc.card) {
                    return Err(GameError::InvalidLayout(format!(
                        "{} appears more than once",
                        pc.card
                    )));
                }
            }
        }
        if seen.len() != 52 {
            return Err(GameError::InvalidLayout(format!(
                "expected 52 cards, found {}",
                seen.len()
            )));
        }
        Ok(())
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn stock(&self) -> &Pile {
        &self.stock
    }

    pub fn waste(&self) -> &Pile {
        &self.waste
    }

    pub fn foundations(&self) -> &[Pile; FOUNDATION_COUNT] {
        &self.foundations
    }

    pub fn tableau(&self) -> &[Pile; TABLEAU_COUNT] {
        &self.tableau
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_won(&self) -> bool {
        check_win(&self.foundations, self.move_count)
    }

    pub fn pile(&self, pile_ref: PileRef) -> Result<&Pile, GameError> {
        match pile_ref {
            PileRef::Stock => Some(&self.stock),
            PileRef::Waste => Some(&self.waste),
            PileRef::Foundation(i) => self.foundations.get(i),
            PileRef::Tableau(i) => self.tableau.get(i),
        }
        .ok_or(GameError::InvalidPile(pile_ref))
    }

    fn pile_mut(&mut self, pile_ref: PileRef) -> Result<&mut Pile, GameError> {
        match pile_ref {
            PileRef::Stock => Some(&mut self.stock),
            PileRef::Waste => Some(&mut self.waste),
            PileRef::Foundation(i) => self.foundations.get_mut(i),
            PileRef::Tableau(i) => self.tableau.get_mut(i),
        }
        .ok_or(GameError::InvalidPile(pile_ref))
    }

    /// All thirteen piles in [`PileRef::all`] order.
    pub fn piles(&self) -> impl Iterator<Item = &Pile> {
        [&self.stock, &self.waste]
            .into_iter()
            .chain(self.foundations.iter())
            .chain(self.tableau.iter())
    }

    /// Finds the pile holding `card` and its index within that pile.
    pub fn locate(&self, card: Card) -> Option<(PileRef, usize)> {
        PileRef::all().into_iter().find_map(|pile_ref| {
            self.pile(pile_ref)
                .ok()
                .and_then(|pile| pile.position(card))
                .map(|index| (pile_ref, index))
        })
    }

    /// Starts a fresh session on this layout: counter zeroed, nothing selected.
    pub(crate) fn reset_session(&mut self) {
        self.move_count = 0;
        self.selection = None;
    }

    /// Stock top goes face-up onto the waste; with an empty stock the waste
    /// is turned over into a face-down stock instead.
    pub fn draw(&mut self, recycle_counts_as_move: bool) -> Outcome {
        self.selection = None;
        if let Some(mut card) = self.stock.pop() {
            card.face_up = true;
            self.waste.push(card);
            self.move_count += 1;
            return self.outcome(
                Event::Drew { card: card.card },
                vec![PileRef::Stock, PileRef::Waste],
            );
        }
        if self.waste.is_empty() {
            return self.outcome(Event::Rejected(Violation::NothingToDraw), vec![]);
        }
        let recycled: Vec<PileCard> = self
            .waste
            .take_all()
            .into_iter()
            .rev()
            .map(|mut c| {
                c.face_up = false;
                c
            })
            .collect();
        let cards = recycled.len();
        self.stock.extend(recycled);
        if recycle_counts_as_move {
            self.move_count += 1;
        }
        self.outcome(
            Event::Recycled { cards },
            vec![PileRef::Stock, PileRef::Waste],
        )
    }

    /// Picks up `card`. A face-down stock card draws instead.
    pub fn select_card(
        &mut self,
        card: Card,
        recycle_counts_as_move: bool,
    ) -> Result<Outcome, GameError> {
        let (source, index) = self
            .locate(card)
            .ok_or(GameError::InvalidCard(card.id().0))?;
        let pile = self.pile(source)?;
        if source == PileRef::Stock && pile.cards().get(index).is_some_and(|c| !c.face_up) {
            return Ok(self.draw(recycle_counts_as_move));
        }
        if self.selection.is_some() {
            return Ok(self.outcome(Event::Rejected(Violation::SelectionActive), vec![]));
        }
        if let Err(v) = movable_run(pile, index) {
            return Ok(self.outcome(Event::Rejected(v), vec![]));
        }
        let selection = Selection {
            card,
            source,
            index,
        };
        self.selection = Some(selection);
        Ok(self.outcome(Event::Selected(selection), vec![]))
    }

    /// Moves the selected run onto `destination` if the rules allow it.
    /// The selection is cleared whether or not the move happens.
    pub fn attempt_move(&mut self, destination: PileRef) -> Result<Outcome, GameError> {
        let target = self.pile(destination)?;
        let Some(selection) = self.selection else {
            return Ok(self.outcome(Event::Rejected(Violation::NoSelection), vec![]));
        };
        if selection.source == destination {
            self.selection = None;
            return Ok(self.outcome(Event::Rejected(Violation::SamePile), vec![]));
        }
        let source = self.pile(selection.source)?;
        let verdict = match movable_run(source, selection.index) {
            Ok(run) if run.first().map(|c| c.card) != Some(selection.card) => {
                Err(Violation::NotRunHead)
            }
            Ok(run) => validate_move(run, target),
            Err(v) => Err(v),
        };
        self.selection = None;
        if let Err(v) = verdict {
            return Ok(self.outcome(Event::Rejected(v), vec![]));
        }

        let run = self.pile_mut(selection.source)?.split_off(selection.index);
        let cards = run.len();
        let revealed = match selection.source {
            PileRef::Tableau(_) => self.pile_mut(selection.source)?.reveal_top(),
            _ => None,
        };
        self.pile_mut(destination)?.extend(run);
        self.move_count += 1;
        Ok(self.outcome(
            Event::Moved {
                from: selection.source,
                to: destination,
                cards,
                revealed,
            },
            vec![selection.source, destination],
        ))
    }

    pub fn deselect(&mut self) -> Outcome {
        self.selection = None;
        self.outcome(Event::Deselected, vec![])
    }

    fn outcome(&self, event: Event, changed: Vec<PileRef>) -> Outcome {
        Outcome {
            event,
            changed,
            move_count: self.move_count,
            won: self.is_won(),
        }
    }
}
