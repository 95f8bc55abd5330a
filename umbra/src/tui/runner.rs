//! TUI Runner - main loop that owns terminal and event stream
//!
//! Frame events advance the animation; key events go to the App. Every loop
//! iteration repaints, so an explicit write shows on the very next paint.
//! On exit the showcase is torn down before the event sources stop.

use std::time::Duration;

use eyre::Result;
use tracing::{debug, info};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::showcase::Showcase;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
}

impl TuiRunner {
    /// Create a runner painting every `frame_period`
    pub fn new(terminal: Tui, showcase: Showcase, frame_period: Duration) -> Self {
        Self {
            app: App::new(showcase),
            terminal,
            event_handler: EventHandler::new(frame_period),
        }
    }

    /// Mark the session as offline for the caption title
    pub fn set_offline(&mut self, offline: bool) {
        self.app.state_mut().offline = offline;
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        info!("TUI started");
        let result = self.event_loop().await;

        self.app.state_mut().showcase.teardown();
        self.event_handler.stop();
        info!("TUI stopped");
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            let event = self.event_handler.next().await?;
            if dispatch(&mut self.app, event) {
                debug!("TuiRunner: quit requested");
                break;
            }
        }
        Ok(())
    }
}

/// Apply one event; returns true when the app should exit
fn dispatch(app: &mut App, event: Event) -> bool {
    match event {
        Event::Frame(now) => {
            app.state_mut().showcase.frame(now);
            false
        }
        Event::Key(key_event) => app.handle_key(key_event),
        Event::Resize(width, height) => {
            debug!(width, height, "TuiRunner: resize");
            false
        }
    }
}
