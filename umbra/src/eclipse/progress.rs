//! Progress value for one eclipse cycle

use serde::{Deserialize, Serialize};

/// Elapsed fraction of one eclipse cycle
///
/// Advancement always lands in `[0, 1)`. Explicit writes (scrub, phase jump)
/// may set exactly `1.0`, which the next advance wraps back to the start.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(f64);

impl Progress {
    /// Start of the cycle
    pub const START: Self = Self(0.0);

    /// Midpoint of the cycle (center of totality)
    pub const MIDPOINT: Self = Self(0.5);

    /// Create a progress value from an explicit write, clamped to `[0, 1]`
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Advance by a non-negative increment, wrapping modulo 1
    pub fn advance(self, increment: f64) -> Self {
        if !increment.is_finite() || increment <= 0.0 {
            return self;
        }
        let next = (self.0 + increment).rem_euclid(1.0);
        // rem_euclid can round up to the modulus for tiny negative remainders
        if next >= 1.0 { Self::START } else { Self(next) }
    }

    /// Signed distance to the midpoint (`0.5 - progress`)
    pub fn offset_from_midpoint(self) -> f64 {
        Self::MIDPOINT.0 - self.0
    }

    /// Unsigned distance to the midpoint
    pub fn proximity(self) -> f64 {
        self.offset_from_midpoint().abs()
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(Progress::new(-0.5).value(), 0.0);
        assert_eq!(Progress::new(1.5).value(), 1.0);
        assert_eq!(Progress::new(0.25).value(), 0.25);
        assert_eq!(Progress::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_advance_without_wrap() {
        let p = Progress::new(0.25).advance(0.25);
        assert_eq!(p.value(), 0.5);
    }

    #[test]
    fn test_advance_ignores_non_positive() {
        let p = Progress::new(0.3);
        assert_eq!(p.advance(0.0), p);
        assert_eq!(p.advance(-0.2), p);
        assert_eq!(p.advance(f64::INFINITY), p);
    }

    #[test]
    fn test_advance_from_explicit_one_wraps() {
        let p = Progress::new(1.0).advance(0.01);
        assert!(p.value() >= 0.0 && p.value() < 0.02);
    }

    #[test]
    fn test_exact_wrap_lands_on_zero() {
        let p = Progress::new(0.75).advance(0.25);
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn test_proximity() {
        assert_eq!(Progress::MIDPOINT.proximity(), 0.0);
        assert_eq!(Progress::new(0.25).proximity(), 0.25);
        assert_eq!(Progress::new(0.75).proximity(), 0.25);
        assert_eq!(Progress::new(0.25).offset_from_midpoint(), 0.25);
        assert_eq!(Progress::new(0.75).offset_from_midpoint(), -0.25);
    }

    proptest! {
        #[test]
        fn prop_wraparound_stays_below_increment(increment in 1e-5f64..1.0) {
            let p = Progress::new(0.999_999).advance(increment);
            prop_assert!(p.value() >= 0.0);
            prop_assert!(p.value() < increment);
        }

        #[test]
        fn prop_advance_stays_in_range(start in 0.0f64..=1.0, increment in 0.0f64..10.0) {
            let p = Progress::new(start).advance(increment);
            prop_assert!(p.value() >= 0.0);
            prop_assert!(p.value() < 1.0 || (increment == 0.0 && start == 1.0));
        }
    }
}
