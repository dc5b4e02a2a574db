//! Synthetic sensor sources for tests and the demo tooling.
//!
//! Everything here is deterministic: noise comes from a seeded ChaCha
//! generator, so a given configuration always produces the same stream.

mod route;
mod sensors;

pub use route::SyntheticRoute;
pub use sensors::{FixJitter, NoisyOrientation, SimulatedLocationSource, SimulatedOrientationSource};

/// Noise parameters for the synthetic sensor streams.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u64,
    /// Standard deviation of heading noise in degrees
    pub heading_sigma_deg: f64,
    /// Standard deviation of tilt (pitch/roll) noise in degrees
    pub tilt_sigma_deg: f64,
    /// Standard deviation of fix position error in meters
    pub fix_sigma_m: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            heading_sigma_deg: 8.0,
            tilt_sigma_deg: 1.5,
            fix_sigma_m: 3.0,
        }
    }
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_heading_sigma(mut self, sigma_deg: f64) -> Self {
        self.heading_sigma_deg = sigma_deg;
        self
    }

    pub fn with_fix_sigma(mut self, sigma_m: f64) -> Self {
        self.fix_sigma_m = sigma_m;
        self
    }

    /// Noise-free streams, useful for exact-value tests.
    pub fn clean() -> Self {
        Self {
            seed: 0,
            heading_sigma_deg: 0.0,
            tilt_sigma_deg: 0.0,
            fix_sigma_m: 0.0,
        }
    }
}
