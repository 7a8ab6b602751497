use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Receives the elapsed session time on every tick.
pub type TickListener = Arc<dyn Fn(Duration) + Send + Sync>;

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Background thread calling a [`TickListener`] at a fixed period.
///
/// Cancelling (or dropping) the ticker stops and joins the thread, so once
/// [`Ticker::cancel`] returns no further tick can be delivered.
#[derive(Debug)]
pub struct Ticker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(
        interval: Duration,
        started: Instant,
        listener: TickListener,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("klondike-ticker".to_string())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let elapsed = started.elapsed();
                        tracing::trace!(elapsed_ms = millis(elapsed), "tick");
                        listener(elapsed);
                    }
                    // explicit stop or sender dropped
                    _ => break,
                }
            })?;
        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("tick listener panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Elapsed-time bookkeeping for one game session.
#[derive(Debug, Default)]
pub struct SessionTimer {
    started: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
    frozen: Option<Duration>,
    ticker: Option<Ticker>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing from zero. Any previous ticker is stopped first, so at
    /// most one is ever alive.
    pub fn restart(&mut self, interval: Duration, listener: Option<TickListener>) {
        self.cancel_ticker();
        let now = Instant::now();
        self.started = Some(now);
        self.started_at = Some(Utc::now());
        self.frozen = None;
        if let Some(listener) = listener {
            match Ticker::spawn(interval, now, listener) {
                Ok(ticker) => self.ticker = Some(ticker),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "failed to start ticker, elapsed time still tracked"
                    )
                }
            }
        }
    }

    /// Freezes the elapsed time and stops the ticker.
    pub fn stop(&mut self) {
        self.cancel_ticker();
        if self.frozen.is_none() {
            self.frozen = self.started.map(|s| s.elapsed());
        }
    }

    pub fn elapsed(&self) -> Duration {
        match (self.frozen, self.started) {
            (Some(frozen), _) => frozen,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.frozen.is_none()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_active)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener() -> (TickListener, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let listener: TickListener = Arc::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (listener, count)
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1_500)), 1_500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn idle_timer_reports_zero() {
        let timer = SessionTimer::new();
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert!(!timer.is_running());
        assert!(timer.started_at().is_none());
    }

    #[test]
    fn stop_freezes_elapsed_time() {
        let mut timer = SessionTimer::new();
        timer.restart(Duration::from_millis(10), None);
        thread::sleep(Duration::from_millis(5));
        timer.stop();
        let frozen = timer.elapsed();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(timer.elapsed(), frozen);
        assert!(!timer.is_running());
    }

    #[test]
    fn no_ticks_after_stop() {
        let (listener, count) = counting_listener();
        let mut timer = SessionTimer::new();
        timer.restart(Duration::from_millis(5), Some(listener));
        assert!(timer.is_ticking());
        thread::sleep(Duration::from_millis(40));
        timer.stop();
        assert!(!timer.is_ticking());
        let seen = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn restart_replaces_the_previous_ticker() {
        let (first, first_count) = counting_listener();
        let (second, _) = counting_listener();
        let mut timer = SessionTimer::new();
        timer.restart(Duration::from_millis(5), Some(first));
        timer.restart(Duration::from_millis(5), Some(second));
        let seen = first_count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(first_count.load(Ordering::SeqCst), seen);
        assert!(timer.is_ticking());
    }
}
