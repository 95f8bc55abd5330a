//! The six narrative phases of an eclipse

use serde::{Deserialize, Serialize};

use super::Progress;

/// Number of narrative phases
pub const PHASE_COUNT: usize = 6;

/// Narrative phase, derived from progress by uniform partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Before,
    FirstContact,
    DuringPeak,
    Totality,
    ReturnOfLight,
    Afterglow,
}

/// All phases in order
pub const PHASES: [Phase; PHASE_COUNT] = [
    Phase::Before,
    Phase::FirstContact,
    Phase::DuringPeak,
    Phase::Totality,
    Phase::ReturnOfLight,
    Phase::Afterglow,
];

/// Phase index for a progress value: `min(floor(p * 6), 5)`
pub fn phase_index(progress: Progress) -> usize {
    let scaled = (progress.value() * PHASE_COUNT as f64).floor();
    (scaled as usize).min(PHASE_COUNT - 1)
}

impl Phase {
    /// Phase active at the given progress
    pub fn from_progress(progress: Progress) -> Self {
        PHASES[phase_index(progress)]
    }

    /// Phase at an index, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        PHASES.get(index).copied()
    }

    /// Position in the ordered phase list
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire key used in narrative payloads
    pub fn key(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::FirstContact => "first_contact",
            Self::DuringPeak => "during_peak",
            Self::Totality => "totality",
            Self::ReturnOfLight => "return_of_light",
            Self::Afterglow => "afterglow",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Before => "Before",
            Self::FirstContact => "First Contact",
            Self::DuringPeak => "During Peak",
            Self::Totality => "Totality",
            Self::ReturnOfLight => "Return of Light",
            Self::Afterglow => "Afterglow",
        }
    }

    /// Progress a phase-jump control writes: `index / (N - 1)`
    pub fn jump_target(self) -> Progress {
        Progress::new(self.index() as f64 / (PHASE_COUNT - 1) as f64)
    }

    /// Parse a wire key
    pub fn from_key(key: &str) -> Option<Self> {
        PHASES.iter().copied().find(|p| p.key() == key)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
