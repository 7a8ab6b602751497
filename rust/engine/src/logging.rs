use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::pile::PileRef;

pub const DEFAULT_FILTER: &str = "info,klondike_engine=debug";

/// Message of the event [`crate::engine::Engine`] logs for every completed move.
pub const MOVED_RUN: &str = "moved run";
/// Message of the event logged when a game is won.
pub const GAME_WON: &str = "game won";

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Fails if a global subscriber is already set.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// One captured event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses a recorded field back into its type, e.g. `move_count` as
    /// `u32` or `from` as a [`PileRef`].
    pub fn field_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.field(name)?.parse().ok()
    }

    /// Source and destination of a logged move.
    pub fn pile_move(&self) -> Option<(PileRef, PileRef)> {
        if self.message != MOVED_RUN {
            return None;
        }
        Some((self.field_as("from")?, self.field_as("to")?))
    }
}

/// Collects events in memory so tests can assert on what the engine logged.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// First captured entry whose message contains `message`.
    pub fn find(&self, message: &str) -> Option<LogEntry> {
        self.lock()
            .iter()
            .find(|e| e.message.contains(message))
            .cloned()
    }

    /// Every logged move in order, as `(from, to)`.
    pub fn moves(&self) -> Vec<(PileRef, PileRef)> {
        self.lock().iter().filter_map(LogEntry::pile_move).collect()
    }

    /// Move count recorded by the win event, if one was logged.
    pub fn winning_move_count(&self) -> Option<u32> {
        self.lock()
            .iter()
            .find(|e| e.message == GAME_WON)
            .and_then(|e| e.field_as("move_count"))
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            subscriber: self,
            _phantom: PhantomData,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct TestLayer<S> {
    subscriber: TestLogSubscriber,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.subscriber.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    // unquoted, so string fields parse back with `field_as`
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}
