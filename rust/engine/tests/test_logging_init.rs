use klondike_engine::logging::init_logging;

// Runs in its own test binary since the global subscriber can only be set once.
#[test]
fn global_subscriber_installs_once() {
    assert!(init_logging().is_ok());
    assert!(init_logging().is_err());
    tracing::info!("logging initialised");
}
