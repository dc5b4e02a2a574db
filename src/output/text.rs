use super::Formatter;
use crate::geo::format_distance;
use crate::navigator::{NavigationData, TurnDirection};

pub struct TextFormatter {
    alignment_threshold: f64,
    verbose: bool,
}

impl TextFormatter {
    pub fn new(alignment_threshold: f64, verbose: bool) -> Self {
        Self {
            alignment_threshold,
            verbose,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, data: &NavigationData) -> String {
        let distance = match data.distance_m {
            Some(d) => format_distance(d),
            None => "waiting for fix".to_string(),
        };
        let heading = match data.device_heading {
            Some(h) => format!("{:>6.1}°", h),
            None => "     -".to_string(),
        };

        let advice = match data.turn_direction(self.alignment_threshold) {
            Some(TurnDirection::Aligned) => "on target".to_string(),
            Some(TurnDirection::Left) => {
                format!("turn left {:.0}°", data.relative_angle.unwrap_or(0.0).abs())
            }
            Some(TurnDirection::Right) => {
                format!("turn right {:.0}°", data.relative_angle.unwrap_or(0.0).abs())
            }
            None => "-".to_string(),
        };

        if self.verbose {
            let bearing = data
                .bearing
                .map_or("-".to_string(), |b| format!("{:.1}°", b));
            let relative = data
                .relative_angle
                .map_or("-".to_string(), |r| format!("{:+.1}°", r));
            format!(
                "Distance: {:<14} heading: {} bearing: {} relative: {} [{}]",
                distance, heading, bearing, relative, advice
            )
        } else {
            format!("Distance: {:<14} heading: {} [{}]", distance, heading, advice)
        }
    }
}
