//! Time dilation near totality
//!
//! Progress slows down as it approaches the midpoint so the viewer dwells on
//! totality without the clock ever stopping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Progress;

/// Invalid speed profile
#[derive(Debug, Error, PartialEq)]
pub enum DilationError {
    #[error("proximity bands must satisfy 0 < totality ({totality}) < approach ({approach}) <= 0.5")]
    Bands { totality: f64, approach: f64 },

    #[error("multipliers must satisfy 0 < totality ({totality}) <= approach ({approach}) <= 1")]
    Multipliers { totality: f64, approach: f64 },
}

/// Speed multiplier policy keyed on proximity to the midpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedProfile {
    /// Proximity below which the slowest multiplier applies
    #[serde(rename = "totality-proximity")]
    pub totality_proximity: f64,

    /// Proximity below which the approach multiplier applies
    #[serde(rename = "approach-proximity")]
    pub approach_proximity: f64,

    /// Multiplier inside the totality proximity
    #[serde(rename = "totality-multiplier")]
    pub totality_multiplier: f64,

    /// Multiplier while approaching or leaving totality
    #[serde(rename = "approach-multiplier")]
    pub approach_multiplier: f64,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            totality_proximity: 0.01,
            approach_proximity: 0.11,
            totality_multiplier: 0.12,
            approach_multiplier: 0.42,
        }
    }
}

impl SpeedProfile {
    /// Multiplier for the given progress
    ///
    /// Symmetric about the midpoint for any offset that is exact in `f64`.
    /// For other inputs `0.5 + x` and `0.5 - x` each round on their own, so
    /// within one ulp of a band edge the two sides may land in different
    /// bands.
    pub fn multiplier(&self, progress: Progress) -> f64 {
        let proximity = progress.proximity();
        if proximity < self.totality_proximity {
            self.totality_multiplier
        } else if proximity < self.approach_proximity {
            self.approach_multiplier
        } else {
            1.0
        }
    }

    /// Reject profiles that would speed up toward the midpoint or stall it
    pub fn validate(&self) -> Result<(), DilationError> {
        let bands_ok = self.totality_proximity > 0.0
            && self.totality_proximity < self.approach_proximity
            && self.approach_proximity <= 0.5;
        if !bands_ok {
            return Err(DilationError::Bands {
                totality: self.totality_proximity,
                approach: self.approach_proximity,
            });
        }

        let multipliers_ok = self.totality_multiplier > 0.0
            && self.totality_multiplier <= self.approach_multiplier
            && self.approach_multiplier <= 1.0;
        if !multipliers_ok {
            return Err(DilationError::Multipliers {
                totality: self.totality_multiplier,
                approach: self.approach_multiplier,
            });
        }

        Ok(())
    }
}
