//! Numeric constants for the navigation engine
//!
//! These constants define physical reference values and thresholds used
//! throughout the geodesic and fusion pipeline.

/// Mean Earth radius in meters used by the spherical distance formula.
/// Treating Earth as a sphere keeps error well under 1% for spans
/// up to ~100 km, which covers point-to-point navigation use.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum magnetic vector magnitude for the compass fallback path.
/// A vector shorter than this carries no usable direction; the sample
/// is dropped instead of producing an arbitrary atan2 result.
pub const MIN_VECTOR_MAGNITUDE: f64 = 1e-9;

/// Default relative-angle threshold in degrees below which the user is
/// considered aligned with the target.
pub const DEFAULT_ALIGNMENT_THRESHOLD_DEG: f64 = 10.0;
