use super::SmoothingFilter;

/// Exponential low-pass filter (scalar EMA).
///
/// `v = alpha * sample + (1 - alpha) * v`. The first sample seeds the
/// state directly, so there is no warm-up lag. Higher alpha tracks the
/// input faster; lower alpha smooths harder.
pub struct LowPassFilter {
    alpha: f64,
    state: Option<f64>,
}

impl LowPassFilter {
    /// Create a new low-pass filter. Alpha is clamped to `[0, 1]`.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: None,
        }
    }
}

impl SmoothingFilter for LowPassFilter {
    fn update(&mut self, sample: f64) -> f64 {
        let next = match self.state {
            None => sample,
            Some(v) => self.alpha * sample + (1.0 - self.alpha) * v,
        };
        self.state = Some(next);
        next
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn value(&self) -> Option<f64> {
        self.state
    }
}
