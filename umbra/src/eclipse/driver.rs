//! Progress driver - advances progress once per frame
//!
//! The driver is the sole writer of progress during autoplay. User input goes
//! through [`ProgressDriver::scrub`] and [`ProgressDriver::jump`], which take
//! priority and pause playback.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{Phase, Progress, SpeedProfile, Visuals};

/// Driver tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    /// Wall-clock seconds for one cycle at full speed
    pub cycle_secs: f64,
    /// Longest frame gap honored in one advance
    pub max_frame_delta: Duration,
    pub profile: SpeedProfile,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            cycle_secs: 40.0,
            max_frame_delta: Duration::from_millis(250),
            profile: SpeedProfile::default(),
        }
    }
}

impl DriverSettings {
    /// Progress per second at multiplier 1.0
    pub fn base_speed(&self) -> f64 {
        if self.cycle_secs > 0.0 { 1.0 / self.cycle_secs } else { 0.0 }
    }
}

/// Animation state: progress, playback, and the frame baseline
#[derive(Debug, Clone)]
pub struct ProgressDriver {
    progress: Progress,
    playing: bool,
    last_frame: Option<Instant>,
    settings: DriverSettings,
}

impl ProgressDriver {
    /// Start at progress 0, playing
    pub fn new(settings: DriverSettings) -> Self {
        debug!(?settings, "ProgressDriver::new: called");
        Self {
            progress: Progress::START,
            playing: true,
            last_frame: None,
            settings,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        Phase::from_progress(self.progress)
    }

    pub fn visuals(&self) -> Visuals {
        Visuals::from_progress(self.progress)
    }

    /// Current speed multiplier
    pub fn multiplier(&self) -> f64 {
        self.settings.profile.multiplier(self.progress)
    }

    /// Frame callback at wall-clock instant `now`
    ///
    /// Paused frames only move the baseline, so resuming never catches up on
    /// idle time.
    pub fn frame(&mut self, now: Instant) {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        if self.playing {
            self.advance(delta);
        }
    }

    /// Advance by an elapsed duration at the current speed multiplier
    pub fn advance(&mut self, delta: Duration) {
        let delta = delta.min(self.settings.max_frame_delta);
        let increment = delta.as_secs_f64() * self.settings.base_speed() * self.multiplier();
        self.progress = self.progress.advance(increment);
    }

    pub fn play(&mut self) {
        debug!(progress = %self.progress, "ProgressDriver::play: called");
        self.playing = true;
    }

    pub fn pause(&mut self) {
        debug!(progress = %self.progress, "ProgressDriver::pause: called");
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Explicit progress write; pauses playback
    pub fn scrub(&mut self, value: f64) {
        debug!(value, "ProgressDriver::scrub: called");
        self.progress = Progress::new(value);
        self.playing = false;
    }

    /// Relative scrub from the current position, clamped to `[0, 1]`
    pub fn nudge(&mut self, delta: f64) {
        self.scrub(self.progress.value() + delta);
    }

    /// Jump to a phase's control position; pauses playback
    pub fn jump(&mut self, phase: Phase) {
        debug!(%phase, "ProgressDriver::jump: called");
        self.scrub(phase.jump_target().value());
    }
}

impl Default for ProgressDriver {
    fn default() -> Self {
        Self::new(DriverSettings::default())
    }
}
