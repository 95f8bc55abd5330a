//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.

use crate::showcase::Showcase;

/// Scrub step for arrow keys
pub const FINE_STEP: f64 = 0.001;

/// Scrub step for shifted arrows and h/l
pub const COARSE_STEP: f64 = 0.01;

/// Interaction mode (modal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Watching / controlling the animation
    #[default]
    Normal,
    /// Help overlay
    Help,
}

/// Application state
#[derive(Debug)]
pub struct AppState {
    /// Animation and captions
    pub showcase: Showcase,

    /// Current interaction mode
    pub interaction_mode: InteractionMode,

    /// Whether the caption fetch was skipped for this session
    pub offline: bool,

    /// Should the app quit?
    pub should_quit: bool,
}

impl AppState {
    pub fn new(showcase: Showcase) -> Self {
        Self {
            showcase,
            interaction_mode: InteractionMode::Normal,
            offline: false,
            should_quit: false,
        }
    }

    pub fn is_help(&self) -> bool {
        self.interaction_mode == InteractionMode::Help
    }

    /// Label for where captions come from, as shown in the caption title
    pub fn narrative_label(&self) -> String {
        if self.showcase.has_pending_narrative() {
            return "built-in, generating…".to_string();
        }
        if self.offline {
            return "built-in, offline".to_string();
        }
        let narrative = self.showcase.narrative();
        match narrative.fallbacks().len() {
            0 => narrative.source().to_string(),
            n => format!("{} ({} built-in)", narrative.source(), n),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Showcase::default())
    }
}
