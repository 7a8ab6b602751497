//! Property tests: arbitrary command sequences never break the table.

mod common;

use common::assert_full_census;
use klondike_engine::cards::CardId;
use klondike_engine::engine::Engine;
use klondike_engine::errors::GameError;
use klondike_engine::game::{GameState, Outcome};
use klondike_engine::pile::{Pile, PileRef};
use klondike_engine::rules::is_ordered_foundation;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Command {
    Draw,
    Select(u8),
    Move(usize),
    MoveToCard(u8),
    Deselect,
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        2 => Just(Command::Draw),
        4 => (0u8..52).prop_map(Command::Select),
        3 => (0usize..13).prop_map(Command::Move),
        2 => (0u8..52).prop_map(Command::MoveToCard),
        1 => Just(Command::Deselect),
    ]
}

fn apply(engine: &mut Engine, command: &Command) -> Result<Outcome, GameError> {
    match *command {
        Command::Draw => engine.draw(),
        Command::Select(id) => engine.select_card(CardId(id)),
        Command::Move(i) => engine.attempt_move(PileRef::all()[i]),
        Command::MoveToCard(id) => engine.attempt_move_to_card(CardId(id)),
        Command::Deselect => engine.deselect(),
    }
}

fn piles(state: &GameState) -> Vec<Pile> {
    state.piles().cloned().collect()
}

fn assert_table_shape(state: &GameState) -> Result<(), TestCaseError> {
    for foundation in state.foundations() {
        prop_assert!(is_ordered_foundation(foundation));
    }
    prop_assert!(state.stock().cards().iter().all(|c| !c.face_up));
    prop_assert!(state.waste().cards().iter().all(|c| c.face_up));
    for column in state.tableau() {
        // face-down cards only ever sit beneath face-up ones
        let first_up = column
            .cards()
            .iter()
            .position(|c| c.face_up)
            .unwrap_or(column.len());
        prop_assert!(column.cards()[first_up..].iter().all(|c| c.face_up));
        if let Some(top) = column.top() {
            prop_assert!(top.face_up);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_preserves_table_invariants(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 1..200),
    ) {
        let mut engine = Engine::with_seed(seed);
        engine.new_game().unwrap();
        let mut last_count = 0;

        for command in &commands {
            let before = piles(engine.state().unwrap());
            match apply(&mut engine, command) {
                Ok(outcome) => {
                    let state = engine.state().unwrap();
                    prop_assert_eq!(outcome.move_count, state.move_count());
                    prop_assert!(outcome.move_count >= last_count);
                    prop_assert!(outcome.move_count <= last_count + 1);
                    if !outcome.is_accepted() {
                        prop_assert_eq!(&piles(state), &before);
                        prop_assert_eq!(outcome.move_count, last_count);
                    }
                    last_count = outcome.move_count;
                }
                Err(err) => {
                    prop_assert!(
                        matches!(err, GameError::GameAlreadyWon),
                        "unexpected {err:?}"
                    );
                    prop_assert_eq!(&piles(engine.state().unwrap()), &before);
                }
            }
            let state = engine.state().unwrap();
            assert_full_census(state);
            assert_table_shape(state)?;
        }
    }

    #[test]
    fn same_seed_same_deal(seed in any::<u64>()) {
        let a = GameState::deal(seed).unwrap();
        let b = GameState::deal(seed).unwrap();
        prop_assert_eq!(&a, &b);
        assert_full_census(&a);
        assert_table_shape(&a)?;
    }
}
