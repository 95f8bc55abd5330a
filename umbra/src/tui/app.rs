//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::state::{AppState, COARSE_STEP, FINE_STEP, InteractionMode};
use crate::eclipse::Phase;
use crate::showcase::Showcase;

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new(showcase: Showcase) -> Self {
        Self {
            state: AppState::new(showcase),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            return true; // Force quit
        }

        match self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }

        self.state.should_quit
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        let driver = self.state.showcase.driver_mut();
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            // === Quit ===
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.should_quit = true;
            }

            // === Help ===
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Playback ===
            KeyCode::Char(' ') | KeyCode::Char('p') => driver.toggle(),
            KeyCode::Char('r') => {
                driver.scrub(0.0);
                driver.play();
            }

            // === Scrubbing ===
            KeyCode::Left if shifted => driver.nudge(-COARSE_STEP),
            KeyCode::Right if shifted => driver.nudge(COARSE_STEP),
            KeyCode::Left => driver.nudge(-FINE_STEP),
            KeyCode::Right => driver.nudge(FINE_STEP),
            KeyCode::Char('h') => driver.nudge(-COARSE_STEP),
            KeyCode::Char('l') => driver.nudge(COARSE_STEP),
            KeyCode::Home => driver.scrub(0.0),
            KeyCode::End => driver.scrub(1.0),

            // === Phase jumps ===
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                if let Some(phase) = Phase::from_index(index) {
                    debug!(%phase, "handle_normal_key: phase jump");
                    driver.jump(phase);
                }
            }

            _ => {}
        }
    }

    /// Handle key in help mode
    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) | KeyCode::Enter => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
    }
}
