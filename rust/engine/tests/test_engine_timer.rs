mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{card, foundation_up_to, layout_without_stock, up};
use klondike_engine::cards::{Rank as R, Suit as S};
use klondike_engine::config::EngineConfig;
use klondike_engine::engine::Engine;
use klondike_engine::pile::PileRef;
use klondike_engine::timer::{millis, TickListener};

fn fast_engine() -> Engine {
    Engine::new(EngineConfig {
        seed: Some(21),
        tick_interval_ms: 10,
        ..EngineConfig::default()
    })
}

fn counting_listener() -> (TickListener, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let listener: TickListener = Arc::new(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (listener, count)
}

#[test]
fn no_ticker_without_a_listener() {
    let mut engine = fast_engine();
    assert_eq!(engine.elapsed(), Duration::ZERO);
    engine.new_game().unwrap();
    assert!(engine.is_timer_running());
    assert!(!engine.is_ticking());
}

#[test]
fn listener_receives_ticks_while_playing() {
    let (listener, count) = counting_listener();
    let mut engine = fast_engine();
    engine.set_tick_listener(listener);
    engine.new_game().unwrap();
    assert!(engine.is_ticking());
    thread::sleep(Duration::from_millis(80));
    assert!(count.load(Ordering::SeqCst) > 0);
}

#[test]
fn new_game_replaces_the_ticker() {
    let (first, first_count) = counting_listener();
    let (second, second_count) = counting_listener();
    let mut engine = fast_engine();
    engine.set_tick_listener(first);
    engine.new_game().unwrap();

    engine.set_tick_listener(second);
    engine.new_game().unwrap();
    let seen = first_count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(80));
    assert_eq!(first_count.load(Ordering::SeqCst), seen);
    assert!(second_count.load(Ordering::SeqCst) > 0);
}

#[test]
fn winning_stops_the_clock() {
    let (listener, count) = counting_listener();
    let mut engine = fast_engine();
    engine.set_tick_listener(listener);
    engine
        .resume(layout_without_stock(
            vec![],
            [
                foundation_up_to(S::Hearts, R::King),
                foundation_up_to(S::Diamonds, R::King),
                foundation_up_to(S::Spades, R::King),
                foundation_up_to(S::Clubs, R::Queen),
            ],
            [vec![up(R::King, S::Clubs)], vec![], vec![], vec![], vec![], vec![], vec![]],
        ))
        .unwrap();
    assert!(engine.is_ticking());

    engine.select_card(card(R::King, S::Clubs).id()).unwrap();
    engine.attempt_move(PileRef::Foundation(3)).unwrap();
    assert!(engine.is_won().unwrap());
    assert!(!engine.is_ticking());
    assert!(!engine.is_timer_running());

    let frozen = engine.elapsed();
    let ticks = count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(engine.elapsed(), frozen);
    assert_eq!(count.load(Ordering::SeqCst), ticks);
    assert_eq!(engine.snapshot().unwrap().elapsed_ms, millis(frozen));
}

#[test]
fn restart_resets_elapsed_time() {
    let mut engine = fast_engine();
    engine.new_game().unwrap();
    thread::sleep(Duration::from_millis(30));
    let before = engine.elapsed();
    engine.restart().unwrap();
    assert!(engine.elapsed() < before);
}
