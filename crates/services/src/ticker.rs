//! One-second tick source with an explicit cancellation token.
//!
//! The ticker only delivers events; it never touches session state. Whoever
//! owns the session applies each `Tick` and cancels the ticker once the session
//! leaves the active phase. Ticks already queued when the token fires are still
//! delivered and must be treated as no-ops by the receiver.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const TICK_BUFFER: usize = 8;

/// A scheduled countdown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
}

/// Shared cancellation flag for a scheduled tick source.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Cancel. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running tick task. Dropping it cancels the task.
#[derive(Debug)]
pub struct Ticker {
    token: CancelToken,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker on the current tokio runtime.
    ///
    /// The first tick fires one `period` after spawning.
    #[must_use]
    pub fn spawn(period: Duration) -> (Self, mpsc::Receiver<Tick>) {
        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        let token = CancelToken::new();
        let mut cancelled = token.subscribe();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0_u64;
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = interval.tick() => {
                        if *cancelled.borrow() {
                            break;
                        }
                        seq += 1;
                        if tx.send(Tick { seq }).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(ticks = seq, "ticker stopped");
        });

        (Self { token, task }, rx)
    }

    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_sequential_ticks() {
        let (ticker, mut rx) = Ticker::spawn(TICK_PERIOD);
        for expected in 1..=3 {
            let tick = rx.recv().await.unwrap();
            assert_eq!(tick.seq, expected);
        }
        ticker.cancel();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_tick_delivers_nothing() {
        let (ticker, mut rx) = Ticker::spawn(TICK_PERIOD);
        ticker.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
        assert!(ticker.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_ticks() {
        let (ticker, mut rx) = Ticker::spawn(TICK_PERIOD);
        assert_eq!(rx.recv().await.unwrap().seq, 1);
        drop(ticker);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
