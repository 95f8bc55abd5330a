//! Terminal User Interface for Umbra
//!
//! Full-screen eclipse animation:
//! - Sun, moon and corona drawn on a braille canvas
//! - Phase track and progress scrubber
//! - Caption panel for the current phase
//! - Keyboard playback control (space, arrows, 1-6)

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode};

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::showcase::Showcase;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the animation until the user quits
pub async fn run(showcase: Showcase, frame_period: Duration, offline: bool) -> Result<()> {
    let terminal = init()?;

    // Use a guard to ensure terminal is restored even on early return/error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, showcase, frame_period);
    runner.set_offline(offline);
    runner.run().await
}
