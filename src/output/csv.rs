use super::{Formatter, iso8601_timestamp};
use crate::navigator::NavigationData;

pub struct CsvFormatter {
    alignment_threshold: f64,
}

impl CsvFormatter {
    pub fn new(alignment_threshold: f64) -> Self {
        Self {
            alignment_threshold,
        }
    }

    fn opt(value: Option<f64>, precision: usize) -> String {
        value.map_or(String::new(), |v| format!("{:.*}", precision, v))
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, data: &NavigationData) -> String {
        let (lat, lon) = match data.user_location {
            Some(c) => (format!("{:.7}", c.latitude), format!("{:.7}", c.longitude)),
            None => (String::new(), String::new()),
        };
        format!(
            "{},{},{},{},{},{},{},{}",
            iso8601_timestamp(),
            lat,
            lon,
            Self::opt(data.distance_m, 1),
            Self::opt(data.bearing, 1),
            Self::opt(data.device_heading, 1),
            Self::opt(data.relative_angle, 1),
            data.is_aligned(self.alignment_threshold),
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,latitude,longitude,distance_m,bearing,device_heading,relative_angle,aligned")
    }
}
