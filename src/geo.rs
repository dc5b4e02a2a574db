//! Geodesic math over WGS84 coordinates.
//!
//! All functions are pure. Distances use the spherical Haversine formula,
//! which is within ~1 m of the ellipsoidal answer for sub-km spans and
//! acceptable out to roughly 100 km.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_M;

/// A geographic position in degrees, WGS84 assumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and within the usual
    /// latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7},{:.7}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    /// Parse `"lat,lon"` in degrees, e.g. `"13.0453132,77.5733936"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lon\", got: {}", s))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude: {}", lat))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude: {}", lon))?;
        let coord = Self::new(latitude, longitude);
        if !coord.is_valid() {
            return Err(format!("coordinate out of range: {}", s));
        }
        Ok(coord)
    }
}

/// Great-circle distance between two coordinates in meters (Haversine).
///
/// Symmetric: `distance(a, b) == distance(b, a)`.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing of the great circle from `from` to `to`, in degrees
/// `[0, 360)`. 0 is true north, clockwise positive.
///
/// Not symmetric; the reciprocal bearing is only approximately
/// `(bearing + 180) mod 360` on a sphere.
pub fn initial_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_angle(y.atan2(x).to_degrees())
}

/// Reduce any angle in degrees to `[0, 360)`.
///
/// Negative inputs wrap up: `-10 → 350`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 when the input is a tiny negative value
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Shortest signed rotation from `a` to `b`, in degrees `(-180, 180]`.
///
/// Positive means rotating counter-clockwise on a compass rose (turn left)
/// brings `a` onto `b`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = normalize_angle(b - a);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Destination reached by traveling `distance_m` meters from `from`
/// along the great circle with initial bearing `bearing_deg`.
pub fn destination(from: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Human-readable distance: integer meters below 1 km, whole kilometers
/// plus remainder meters at or above.
pub fn format_distance(meters: f64) -> String {
    let total = meters.round() as i64;
    if total < 1000 {
        format!("{} m", total)
    } else {
        format!("{} km {} m", total / 1000, total % 1000)
    }
}
