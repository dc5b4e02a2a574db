use super::SmoothingFilter;

/// Simple moving average filter for signal smoothing
///
/// Computes the arithmetic mean of the last N values in a sliding window.
/// Before the window fills, the mean is taken over the samples seen so
/// far, so early output tracks the input without a zero-fill bias.
///
/// The filter maintains a circular buffer and updates incrementally,
/// making it cheap to run at sensor rates.
pub struct MovingAverage {
    buffer: Vec<f64>,
    index: usize,
    filled: bool,
    seen: usize,
}

impl MovingAverage {
    /// Create a new moving average filter
    ///
    /// # Arguments
    /// * `window_size` - Number of samples to average (larger = smoother
    ///   but slower response); clamped to at least 1
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: vec![0.0; window_size.max(1)],
            index: 0,
            filled: false,
            seen: 0,
        }
    }

    fn average(&self) -> f64 {
        let count = if self.filled {
            self.buffer.len()
        } else {
            self.index.max(1)
        };
        let sum: f64 = self.buffer.iter().take(count).sum();
        sum / count as f64
    }
}

impl SmoothingFilter for MovingAverage {
    fn update(&mut self, value: f64) -> f64 {
        self.buffer[self.index] = value;
        self.index = (self.index + 1) % self.buffer.len();
        self.seen += 1;

        if self.index == 0 {
            self.filled = true;
        }

        self.average()
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
        self.filled = false;
        self.seen = 0;
    }

    fn value(&self) -> Option<f64> {
        if self.seen == 0 {
            None
        } else {
            Some(self.average())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moving_average_window_three() {
        let mut ma = MovingAverage::new(3);

        assert_relative_eq!(ma.update(1.0), 1.0);
        assert_relative_eq!(ma.update(2.0), 1.5);
        assert_relative_eq!(ma.update(3.0), 2.0);
        assert_relative_eq!(ma.update(4.0), 3.0); // (2+3+4)/3
        assert_relative_eq!(ma.update(5.0), 4.0); // (3+4+5)/3
    }

    #[test]
    fn test_window_of_one_passes_through() {
        let mut ma = MovingAverage::new(1);
        assert_relative_eq!(ma.update(7.0), 7.0);
        assert_relative_eq!(ma.update(-3.0), -3.0);
    }

    #[test]
    fn test_zero_window_clamped_to_one() {
        let mut ma = MovingAverage::new(0);
        assert_relative_eq!(ma.update(9.0), 9.0);
    }

    #[test]
    fn test_reset_clears_window() {
        let mut ma = MovingAverage::new(3);
        ma.update(10.0);
        ma.update(20.0);
        ma.reset();
        assert!(ma.value().is_none());
        assert_relative_eq!(ma.update(4.0), 4.0);
    }
}
