use serde_json::json;

use super::{Formatter, iso8601_timestamp};
use crate::navigator::NavigationData;

pub struct JsonFormatter {
    alignment_threshold: f64,
}

impl JsonFormatter {
    pub fn new(alignment_threshold: f64) -> Self {
        Self {
            alignment_threshold,
        }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, data: &NavigationData) -> String {
        json!({
            "ts": iso8601_timestamp(),
            "user_location": data.user_location,
            "target_location": data.target_location,
            "distance_m": data.distance_m,
            "bearing": data.bearing,
            "device_heading": data.device_heading,
            "relative_angle": data.relative_angle,
            "aligned": data.is_aligned(self.alignment_threshold),
            "turn": data.turn_direction(self.alignment_threshold),
        })
        .to_string()
    }
}
