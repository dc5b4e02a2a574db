//! Configuration for the wayfinder navigation engine.
//!
//! All parameters carry working defaults; only the target coordinate has
//! no sensible default and must be supplied at construction. Configs can
//! also be loaded from TOML:
//!
//! ```
//! use wayfinder::config::NavConfig;
//!
//! let config = NavConfig::from_toml_str(
//!     r#"
//!     target = { latitude = 13.0453132, longitude = 77.5733936 }
//!
//!     [heading_filter]
//!     circular_alpha = 0.25
//!     "#,
//! )
//! .unwrap();
//! assert!((config.heading_filter.circular_alpha - 0.25).abs() < 1e-9);
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::DEFAULT_ALIGNMENT_THRESHOLD_DEG;
use crate::error::{NavError, Result};
use crate::filters::FilterKind;
use crate::geo::Coordinate;

/// System-wide navigation configuration
///
/// Contains all parameters for the navigation engine. Use
/// `NavConfig::new(target)` for sensible defaults around a target.
#[derive(Debug, Clone, Deserialize)]
pub struct NavConfig {
    /// Fixed target coordinate the engine navigates toward
    pub target: Coordinate,
    /// Heading smoothing configuration
    #[serde(default)]
    pub heading_filter: HeadingFilterConfig,
    /// Location stream configuration
    #[serde(default)]
    pub location: LocationConfig,
    /// Orientation stream configuration
    #[serde(default)]
    pub orientation: OrientationConfig,
    /// Alignment reporting configuration
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

impl NavConfig {
    /// Create a configuration with defaults around the given target.
    pub fn new(target: Coordinate) -> Self {
        Self {
            target,
            heading_filter: HeadingFilterConfig::default(),
            location: LocationConfig::default(),
            orientation: OrientationConfig::default(),
            alignment: AlignmentConfig::default(),
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: NavConfig =
            toml::from_str(text).map_err(|e| NavError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NavError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the engine cannot run with. Filter alphas
    /// are clamped at filter construction rather than rejected here.
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_valid() {
            return Err(NavError::Config(format!(
                "target out of range: {}",
                self.target
            )));
        }
        if self.alignment.threshold_degrees <= 0.0 {
            return Err(NavError::Config(
                "alignment threshold must be positive".into(),
            ));
        }
        if self.orientation.cadence_hz <= 0.0 {
            return Err(NavError::Config(
                "orientation cadence must be positive".into(),
            ));
        }
        if self.location.min_distance_m < 0.0 || self.location.min_interval_s < 0.0 {
            return Err(NavError::Config(
                "location thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Heading smoothing configuration
///
/// The circular EMA is the recommended strategy for headings; the other
/// parameters feed the alternative strategies when selected.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadingFilterConfig {
    /// Smoothing strategy applied to the heading stream
    pub kind: FilterKind,
    /// Circular EMA smoothing factor (lower = smoother)
    pub circular_alpha: f64,
    /// Scalar low-pass smoothing factor
    pub low_pass_alpha: f64,
    /// Kalman process noise q
    pub kalman_process_noise: f64,
    /// Kalman measurement noise r
    pub kalman_measurement_noise: f64,
    /// Complementary filter rate-trust factor
    pub complementary_alpha: f64,
    /// Moving average window in samples
    pub moving_average_window: usize,
}

impl Default for HeadingFilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterKind::Circular,
            circular_alpha: 0.2,
            low_pass_alpha: 0.3,
            kalman_process_noise: 0.01,
            kalman_measurement_noise: 0.5,
            complementary_alpha: 0.98,
            moving_average_window: 5,
        }
    }
}

/// Location stream configuration
///
/// The thresholds describe what the upstream location source is expected
/// to deliver; the tracker itself applies no additional filtering.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Minimum movement between fixes in meters
    pub min_distance_m: f64,
    /// Minimum interval between fixes in seconds
    pub min_interval_s: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            min_distance_m: 1.0,
            min_interval_s: 0.5,
        }
    }
}

/// Orientation stream configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Nominal orientation sample cadence in Hz
    pub cadence_hz: f64,
    /// Prefer the fused-rotation path when the source supports it;
    /// otherwise fall back to compass-only readings
    pub prefer_fused: bool,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            cadence_hz: 10.0,
            prefer_fused: true,
        }
    }
}

/// Alignment reporting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Relative angle magnitude in degrees below which the user counts
    /// as aligned with the target
    pub threshold_degrees: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            threshold_degrees: DEFAULT_ALIGNMENT_THRESHOLD_DEG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Coordinate {
        Coordinate::new(13.0453132, 77.5733936)
    }

    #[test]
    fn test_defaults_carry_reference_values() {
        let config = NavConfig::new(target());
        assert!((config.heading_filter.circular_alpha - 0.2).abs() < 1e-9);
        assert!((config.heading_filter.low_pass_alpha - 0.3).abs() < 1e-9);
        assert!((config.alignment.threshold_degrees - 10.0).abs() < 1e-9);
        assert!((config.location.min_distance_m - 1.0).abs() < 1e-9);
        assert!((config.location.min_interval_s - 0.5).abs() < 1e-9);
        assert!((config.orientation.cadence_hz - 10.0).abs() < 1e-9);
        assert_eq!(config.heading_filter.kind, FilterKind::Circular);
        config.validate().unwrap();
    }

    #[test]
    fn test_toml_round_trip_with_overrides() {
        let config = NavConfig::from_toml_str(
            r#"
            target = { latitude = 48.8584, longitude = 2.2945 }

            [heading_filter]
            kind = "kalman"
            kalman_measurement_noise = 0.8

            [alignment]
            threshold_degrees = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.heading_filter.kind, FilterKind::Kalman);
        assert!((config.heading_filter.kalman_measurement_noise - 0.8).abs() < 1e-9);
        assert!((config.alignment.threshold_degrees - 5.0).abs() < 1e-9);
        // Unspecified sections keep defaults
        assert!((config.location.min_distance_m - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let result = NavConfig::from_toml_str("target = { latitude = 95.0, longitude = 0.0 }");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = NavConfig::new(target());
        config.alignment.threshold_degrees = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_target_rejected() {
        assert!(NavConfig::from_toml_str("[heading_filter]\n").is_err());
    }
}
