//! Frame ticker - a scheduled task that emits one event per display frame
//!
//! Cancellation is explicit: [`Ticker::stop`] aborts the task, and dropping
//! the ticker does the same, so no frame callback outlives its owner.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Periodic frame source
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker that sends `make_event(now)` every `period`
    ///
    /// The task ends on its own when the receiving side is dropped.
    pub fn spawn<E, F>(period: Duration, tx: mpsc::UnboundedSender<E>, make_event: F) -> Self
    where
        E: Send + 'static,
        F: Fn(Instant) -> E + Send + 'static,
    {
        debug!(?period, "Ticker::spawn: called");
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let tick = interval.tick().await;
                if tx.send(make_event(tick.into_std())).is_err() {
                    debug!("Ticker: receiver dropped, stopping");
                    break;
                }
            }
        });

        Self { handle: Some(handle) }
    }

    /// Period for a frame rate, at least one millisecond
    pub fn period_for_fps(fps: u32) -> Duration {
        let fps = fps.max(1) as u64;
        Duration::from_millis((1000 / fps).max(1))
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop emitting frames
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Ticker::stop: aborting frame task");
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_for_fps() {
        assert_eq!(Ticker::period_for_fps(60), Duration::from_millis(16));
        assert_eq!(Ticker::period_for_fps(30), Duration::from_millis(33));
        assert_eq!(Ticker::period_for_fps(0), Duration::from_millis(1000));
        assert_eq!(Ticker::period_for_fps(5000), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_ticker_emits_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(Duration::from_millis(5), tx, |now| now);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(second >= first);
        assert!(ticker.is_running());
    }

    #[tokio::test]
    async fn test_stop_closes_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(5), tx, |_| ());
        rx.recv().await.unwrap();

        ticker.stop();
        assert!(!ticker.is_running());

        // Aborting drops the sender; drain whatever was queued, then the channel closes
        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }

    #[tokio::test]
    async fn test_drop_stops_ticker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let _ticker = Ticker::spawn(Duration::from_millis(5), tx, |_| ());
        }
        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }

    #[tokio::test]
    async fn test_ticker_ends_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(Duration::from_millis(1), tx, |_| ());
        drop(rx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!ticker.is_running());
    }
}
