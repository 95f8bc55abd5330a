//! TUI event handling
//!
//! Keyboard input is polled on a blocking thread; display frames come from a
//! [`Ticker`]. Both feed one tokio channel so the runner sees a single
//! ordered stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::eclipse::Ticker;

/// How long the input thread blocks before re-checking the stop flag
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Display frame, stamped with the tick time
    Frame(Instant),
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Event receiver
    rx: mpsc::UnboundedReceiver<Event>,
    ticker: Ticker,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new event handler emitting frames every `frame_period`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(frame_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let input_tx = tx.clone();
        let input_stop = stop.clone();
        // Detached; it exits within one poll interval of the stop flag
        std::thread::spawn(move || {
            while !input_stop.load(Ordering::Relaxed) {
                if !event::poll(INPUT_POLL).unwrap_or(false) {
                    continue;
                }
                let Ok(evt) = event::read() else {
                    continue;
                };
                let event = match evt {
                    event::Event::Key(key) => Event::Key(key),
                    event::Event::Resize(w, h) => Event::Resize(w, h),
                    _ => continue,
                };
                if input_tx.send(event).is_err() {
                    break;
                }
            }
            debug!("EventHandler: input thread exiting");
        });

        let ticker = Ticker::spawn(frame_period, tx, Event::Frame);

        Self {
            rx,
            ticker,
            stop,
        }
    }

    /// Get the next event (async)
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }

    /// Stop frames and signal the input thread, without waiting for it
    pub fn stop(&mut self) {
        self.ticker.stop();
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop();
    }
}
