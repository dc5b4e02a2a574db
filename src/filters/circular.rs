use num_complex::Complex64;

use super::SmoothingFilter;
use crate::geo::normalize_angle;

/// Exponential average for angular quantities in degrees.
///
/// A naive linear EMA breaks at the 0°/360° boundary: averaging 350° and
/// 10° yields 180°, the opposite direction. This filter instead averages
/// the unit vector for each angle (held as a single complex accumulator)
/// and reads the smoothed angle back with `atan2`, so wrap-around inputs
/// converge where they should.
pub struct CircularEma {
    alpha: f64,
    accumulator: Option<Complex64>,
}

impl CircularEma {
    /// Create a new circular EMA. Alpha is clamped to `[0, 1]`.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            accumulator: None,
        }
    }

    fn angle_of(acc: Complex64) -> f64 {
        normalize_angle(acc.arg().to_degrees())
    }
}

impl SmoothingFilter for CircularEma {
    fn update(&mut self, degrees: f64) -> f64 {
        let unit = Complex64::from_polar(1.0, degrees.to_radians());
        let next = match self.accumulator {
            None => unit,
            Some(acc) => unit * self.alpha + acc * (1.0 - self.alpha),
        };
        self.accumulator = Some(next);
        Self::angle_of(next)
    }

    fn reset(&mut self) {
        self.accumulator = None;
    }

    fn value(&self) -> Option<f64> {
        self.accumulator.map(Self::angle_of)
    }
}
