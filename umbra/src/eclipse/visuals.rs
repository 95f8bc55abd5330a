//! Visual parameters derived from progress
//!
//! Everything here is a pure function of [`Progress`]. Distances are measured
//! in sun radii. Apart from the two band flags, every output is continuous in
//! progress.

use std::f64::consts::PI;

use serde::Serialize;

use super::Progress;

/// Horizontal travel of the moon across one cycle, in sun radii
pub const SHADOW_TRAVEL: f64 = 5.0;

/// Moon radius relative to the sun; slightly larger so totality is total
pub const MOON_RADIUS: f64 = 1.02;

/// Half-width of the totality band around the midpoint
pub const TOTALITY_BAND: f64 = 0.0008;

/// Half-width of the band where corona and glow ramp up
pub const NEAR_BAND: f64 = 0.12;

/// Blur radius far from totality
pub const BASE_BLUR: f64 = 2.0;

/// Additional blur at the midpoint
pub const EXTRA_BLUR: f64 = 18.0;

/// Fraction of daylight lost at full coverage
const MAX_DIMMING: f64 = 0.92;

/// Render-ready parameters for one progress value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Visuals {
    /// Moon center offset from the sun center; positive means left of the sun
    pub shadow_offset: f64,
    pub is_totality: bool,
    pub is_near: bool,
    /// 0 outside the near band, 1 at the midpoint
    pub nearness: f64,
    pub corona_opacity: f64,
    pub glow_intensity: f64,
    pub blur_radius: f64,
    /// Fraction of the sun disk hidden by the moon
    pub coverage: f64,
    /// Ambient light, 1 in full daylight
    pub sky_light: f64,
}

impl Visuals {
    pub fn from_progress(progress: Progress) -> Self {
        let shadow_offset = shadow_offset(progress);
        let nearness = nearness(progress);
        let coverage = coverage(shadow_offset.abs());

        Self {
            shadow_offset,
            is_totality: is_totality(progress),
            is_near: is_near(progress),
            nearness,
            corona_opacity: nearness,
            glow_intensity: nearness * nearness,
            blur_radius: BASE_BLUR + nearness * EXTRA_BLUR,
            coverage,
            sky_light: 1.0 - MAX_DIMMING * coverage,
        }
    }
}

/// Affine in `(0.5 - progress)`
pub fn shadow_offset(progress: Progress) -> f64 {
    progress.offset_from_midpoint() * SHADOW_TRAVEL
}

pub fn is_totality(progress: Progress) -> bool {
    progress.proximity() < TOTALITY_BAND
}

pub fn is_near(progress: Progress) -> bool {
    progress.proximity() < NEAR_BAND
}

/// Linear ramp from the edge of the near band to the midpoint
pub fn nearness(progress: Progress) -> f64 {
    (1.0 - progress.proximity() / NEAR_BAND).clamp(0.0, 1.0)
}

/// Covered fraction of a unit sun disk by a moon disk at center distance `d`
pub fn coverage(distance: f64) -> f64 {
    let (r_sun, r_moon) = (1.0_f64, MOON_RADIUS);
    let d = distance.abs();

    if d >= r_sun + r_moon {
        return 0.0;
    }
    if d <= r_moon - r_sun {
        return 1.0;
    }

    // Circle-circle intersection (lens) area
    let alpha = ((d * d + r_sun * r_sun - r_moon * r_moon) / (2.0 * d * r_sun)).clamp(-1.0, 1.0);
    let beta = ((d * d + r_moon * r_moon - r_sun * r_sun) / (2.0 * d * r_moon)).clamp(-1.0, 1.0);
    let kite = (-d + r_sun + r_moon) * (d + r_sun - r_moon) * (d - r_sun + r_moon) * (d + r_sun + r_moon);
    let lens = r_sun * r_sun * alpha.acos() + r_moon * r_moon * beta.acos() - 0.5 * kite.max(0.0).sqrt();

    (lens / (PI * r_sun * r_sun)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_midpoint() {
        let v = Visuals::from_progress(Progress::MIDPOINT);
        assert_eq!(v.shadow_offset, 0.0);
        assert!(v.is_totality);
        assert!(v.is_near);
        assert_eq!(v.nearness, 1.0);
        assert_eq!(v.coverage, 1.0);
        assert_eq!(v.blur_radius, BASE_BLUR + EXTRA_BLUR);
        assert!((v.sky_light - (1.0 - MAX_DIMMING)).abs() < 1e-12);
    }

    #[test]
    fn test_far_from_midpoint() {
        let v = Visuals::from_progress(Progress::START);
        assert_eq!(v.shadow_offset, 2.5);
        assert!(!v.is_totality);
        assert!(!v.is_near);
        assert_eq!(v.nearness, 0.0);
        assert_eq!(v.corona_opacity, 0.0);
        assert_eq!(v.coverage, 0.0);
        assert_eq!(v.sky_light, 1.0);
        assert_eq!(v.blur_radius, BASE_BLUR);
    }

    #[test]
    fn test_shadow_direction() {
        assert!(shadow_offset(Progress::new(0.25)) > 0.0);
        assert!(shadow_offset(Progress::new(0.75)) < 0.0);
    }

    #[test]
    fn test_bands() {
        assert!(is_totality(Progress::new(0.5005)));
        assert!(!is_totality(Progress::new(0.501)));
        assert!(is_near(Progress::new(0.39)));
        assert!(!is_near(Progress::new(0.37)));
    }

    #[test]
    fn test_coverage_partial() {
        let half_way = coverage(1.0);
        assert!(half_way > 0.0 && half_way < 1.0);
        assert!(coverage(0.5) > coverage(1.0));
        assert!(coverage(1.5) > coverage(1.9));
    }

    proptest! {
        #[test]
        fn prop_continuous_fields_have_no_jumps(p in 0.0f64..0.999) {
            let eps = 1e-6;
            let a = Visuals::from_progress(Progress::new(p));
            let b = Visuals::from_progress(Progress::new(p + eps));
            prop_assert!((a.shadow_offset - b.shadow_offset).abs() < 1e-4);
            prop_assert!((a.nearness - b.nearness).abs() < 1e-3);
            prop_assert!((a.blur_radius - b.blur_radius).abs() < 1e-2);
            prop_assert!((a.coverage - b.coverage).abs() < 1e-2);
        }

        #[test]
        fn prop_visuals_are_symmetric_in_magnitude(x in 0.0f64..0.5) {
            let left = Visuals::from_progress(Progress::new(0.5 - x));
            let right = Visuals::from_progress(Progress::new(0.5 + x));
            prop_assert!((left.shadow_offset + right.shadow_offset).abs() < 1e-9);
            prop_assert!((left.coverage - right.coverage).abs() < 1e-6);
        }

        #[test]
        fn prop_coverage_in_unit_range(d in 0.0f64..4.0) {
            let c = coverage(d);
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
