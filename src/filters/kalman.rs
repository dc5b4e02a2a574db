use super::SmoothingFilter;

/// One-dimensional Kalman-style estimator with fixed noise parameters.
///
/// Classic scalar estimate/error recursion: the error covariance grows by
/// the process noise `q` each step, the Kalman gain trades the estimate
/// against the measurement according to the measurement noise `r`. The
/// first measurement seeds the estimate directly with no correction.
pub struct ScalarKalman {
    process_noise: f64,
    measurement_noise: f64,
    estimate: Option<f64>,
    error_covariance: f64,
}

impl ScalarKalman {
    pub fn new(process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            process_noise: process_noise.max(0.0),
            measurement_noise: measurement_noise.max(f64::EPSILON),
            estimate: None,
            error_covariance: 1.0,
        }
    }
}

impl SmoothingFilter for ScalarKalman {
    fn update(&mut self, measurement: f64) -> f64 {
        let next = match self.estimate {
            None => {
                self.error_covariance = self.measurement_noise;
                measurement
            }
            Some(estimate) => {
                // Predict
                self.error_covariance += self.process_noise;
                // Correct
                let gain = self.error_covariance / (self.error_covariance + self.measurement_noise);
                self.error_covariance *= 1.0 - gain;
                estimate + gain * (measurement - estimate)
            }
        };
        self.estimate = Some(next);
        next
    }

    fn reset(&mut self) {
        self.estimate = None;
        self.error_covariance = 1.0;
    }

    fn value(&self) -> Option<f64> {
        self.estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_measurement_seeds_estimate() {
        let mut kf = ScalarKalman::new(0.01, 0.1);
        assert_relative_eq!(kf.update(25.0), 25.0);
    }

    #[test]
    fn test_converges_to_constant_signal() {
        let mut kf = ScalarKalman::new(0.001, 0.5);
        kf.update(0.0);

        let mut last = 0.0;
        for _ in 0..500 {
            last = kf.update(10.0);
        }
        assert!((last - 10.0).abs() < 0.1, "expected ~10, got {}", last);
    }

    #[test]
    fn test_rejects_single_outlier() {
        let mut kf = ScalarKalman::new(0.001, 1.0);
        for _ in 0..50 {
            kf.update(10.0);
        }
        let spiked = kf.update(100.0);
        assert!(
            spiked < 20.0,
            "one outlier should barely move the estimate, got {}",
            spiked
        );
    }

    #[test]
    fn test_reset_clears_estimate() {
        let mut kf = ScalarKalman::new(0.01, 0.1);
        kf.update(5.0);
        kf.reset();
        assert!(kf.value().is_none());
        assert_relative_eq!(kf.update(30.0), 30.0);
    }
}
