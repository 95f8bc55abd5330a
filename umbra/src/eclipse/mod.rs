//! Eclipse animation core
//!
//! A single progress value drives everything: the phase shown in the caption,
//! the moon's position, and the corona. Phase and visual derivation are pure
//! functions of progress; only [`ProgressDriver`] mutates it.

mod dilation;
mod driver;
mod phase;
mod progress;
mod ticker;
pub mod visuals;

pub use dilation::{DilationError, SpeedProfile};
pub use driver::{DriverSettings, ProgressDriver};
pub use phase::{PHASE_COUNT, PHASES, Phase, phase_index};
pub use progress::Progress;
pub use ticker::Ticker;
pub use visuals::Visuals;
