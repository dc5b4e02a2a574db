use super::SmoothingFilter;

/// Complementary filter fusing a high-frequency rate signal with a
/// low-frequency absolute signal.
///
/// `v = alpha * (v + rate * dt) + (1 - alpha) * absolute`. The rate term
/// (typically a gyro) carries the short-term dynamics; the absolute term
/// (accelerometer or magnetometer) pins down the long-term reference.
/// Alpha close to 1 trusts the integrated rate, alpha close to 0 trusts
/// the absolute reading.
pub struct ComplementaryFilter {
    alpha: f64,
    state: Option<f64>,
}

impl ComplementaryFilter {
    /// Create a new complementary filter. Alpha is clamped to `[0, 1]`.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: None,
        }
    }

    /// Fuse one step of rate signal (units/second over `dt` seconds) with
    /// an absolute reading in the same units.
    pub fn update_fused(&mut self, rate: f64, dt: f64, absolute: f64) -> f64 {
        let next = match self.state {
            None => absolute,
            Some(v) => self.alpha * (v + rate * dt) + (1.0 - self.alpha) * absolute,
        };
        self.state = Some(next);
        next
    }
}

impl SmoothingFilter for ComplementaryFilter {
    /// Absolute-only update: no rate information, the sample is treated
    /// as the absolute signal.
    fn update(&mut self, sample: f64) -> f64 {
        self.update_fused(0.0, 0.0, sample)
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn value(&self) -> Option<f64> {
        self.state
    }
}
