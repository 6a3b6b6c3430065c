//! Mirrored viewing conventions applied to north-referenced azimuths.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// Operator-selected axis flips.
///
/// The composed transform applies the X flip (`a -> PI - a`) before the Y flip
/// (`a -> -a`) and normalises the result into `[0, 2*PI)`. Each flip on its own is an
/// involution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisFlip {
    /// Mirror the map about its vertical axis.
    #[serde(default)]
    pub flip_x: bool,
    /// Mirror the map about its horizontal axis.
    #[serde(default)]
    pub flip_y: bool,
}

impl AxisFlip {
    /// No mirroring.
    pub const NONE: Self = Self::new(false, false);

    /// Create a flip configuration.
    #[must_use]
    pub const fn new(flip_x: bool, flip_y: bool) -> Self {
        Self { flip_x, flip_y }
    }

    /// Returns `true` when neither axis is flipped.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        !self.flip_x && !self.flip_y
    }

    /// Transform an azimuth in radians.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::AxisFlip;
    /// use std::f64::consts::FRAC_PI_4;
    ///
    /// let flip = AxisFlip::new(true, false);
    /// let mirrored = flip.apply(FRAC_PI_4);
    /// assert!((mirrored - 3.0 * FRAC_PI_4).abs() < 1e-12);
    /// assert!((flip.apply(mirrored) - FRAC_PI_4).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn apply(&self, azimuth: f64) -> f64 {
        let mut angle = azimuth;
        if self.flip_x {
            angle = PI - angle;
        }
        if self.flip_y {
            angle = -angle;
        }
        normalize_full_turn(angle)
    }

    /// Transform an azimuth in degrees; the result lies in `[0, 360)`.
    #[must_use]
    pub fn apply_deg(&self, azimuth_deg: f64) -> f64 {
        if self.is_identity() {
            return azimuth_deg.rem_euclid(360.0) % 360.0;
        }
        self.apply(azimuth_deg.to_radians()).to_degrees() % 360.0
    }
}

/// Normalise radians into `[0, 2*PI)`.
pub(crate) fn normalize_full_turn(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    const SAMPLES: [f64; 7] = [0.0, 0.3, FRAC_PI_2, 2.0, PI, 4.5, 6.0];

    #[test]
    fn identity_only_normalises() {
        assert_relative_eq!(AxisFlip::NONE.apply(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_relative_eq!(AxisFlip::NONE.apply(TAU + 0.5), 0.5, epsilon = 1.0e-12);
    }

    #[test]
    fn each_flip_is_an_involution() {
        for flip in [AxisFlip::new(true, false), AxisFlip::new(false, true)] {
            for azimuth in SAMPLES {
                let twice = flip.apply(flip.apply(azimuth));
                assert_relative_eq!(twice, normalize_full_turn(azimuth), epsilon = 1.0e-12);
            }
        }
    }

    #[test]
    fn x_flip_is_applied_before_y_flip() {
        let both = AxisFlip::new(true, true);
        // -(PI - a) == a - PI
        assert_relative_eq!(both.apply(0.5), 0.5 + PI, epsilon = 1.0e-12);
        assert_relative_eq!(both.apply(FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1.0e-12);
    }

    #[test]
    fn results_stay_in_full_turn() {
        for flip in [
            AxisFlip::NONE,
            AxisFlip::new(true, false),
            AxisFlip::new(false, true),
            AxisFlip::new(true, true),
        ] {
            for azimuth in SAMPLES {
                let out = flip.apply(azimuth);
                assert!((0.0..TAU).contains(&out));
                assert!((0.0..360.0).contains(&flip.apply_deg(azimuth.to_degrees())));
            }
        }
    }

    #[test]
    fn degree_variant_matches_radians() {
        let flip = AxisFlip::new(true, false);
        assert_relative_eq!(flip.apply_deg(30.0), 150.0, epsilon = 1.0e-9);
        assert_relative_eq!(AxisFlip::new(false, true).apply_deg(30.0), 330.0, epsilon = 1.0e-9);
        assert_eq!(AxisFlip::NONE.apply_deg(-90.0), 270.0);
    }
}
