//! Smoothing filter strategies for noisy scalar sensor streams.
//!
//! Each filter is an independent strategy with the same shape: feed raw
//! samples in, get a smoothed value back, reset to the uninitialized
//! condition on demand. The orientation fusion engine is parameterized by
//! a filter instance, so the noise-reduction strategy can be swapped
//! without touching the fusion logic.

mod circular;
mod complementary;
mod kalman;
mod low_pass;
mod moving_average;

pub use circular::CircularEma;
pub use complementary::ComplementaryFilter;
pub use kalman::ScalarKalman;
pub use low_pass::LowPassFilter;
pub use moving_average::MovingAverage;

use crate::config::HeadingFilterConfig;

/// Common capability of all smoothing strategies.
///
/// Filters are deterministic given their update sequence and carry no
/// thread affinity; serialization of concurrent updates is the caller's
/// job.
pub trait SmoothingFilter: Send {
    /// Feed one raw sample, returning the updated smoothed value.
    fn update(&mut self, sample: f64) -> f64;

    /// Clear internal state back to the uninitialized condition.
    fn reset(&mut self);

    /// Current smoothed value, if at least one sample has been seen.
    fn value(&self) -> Option<f64>;
}

/// Smoothing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Exponential low-pass (scalar EMA)
    LowPass,
    /// Circular EMA over sine/cosine components (correct at the 0°/360° wrap)
    Circular,
    /// One-dimensional Kalman estimate/error recursion
    Kalman,
    /// Complementary fusion of a rate signal with an absolute signal
    Complementary,
    /// Fixed-window arithmetic mean
    MovingAverage,
}

/// Construct a filter instance for the selected strategy.
pub fn create_filter(kind: FilterKind, config: &HeadingFilterConfig) -> Box<dyn SmoothingFilter> {
    match kind {
        FilterKind::LowPass => Box::new(LowPassFilter::new(config.low_pass_alpha)),
        FilterKind::Circular => Box::new(CircularEma::new(config.circular_alpha)),
        FilterKind::Kalman => Box::new(ScalarKalman::new(
            config.kalman_process_noise,
            config.kalman_measurement_noise,
        )),
        FilterKind::Complementary => Box::new(ComplementaryFilter::new(config.complementary_alpha)),
        FilterKind::MovingAverage => Box::new(MovingAverage::new(config.moving_average_window)),
    }
}
