mod csv;
mod json;
mod text;

use chrono::Utc;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

use crate::navigator::NavigationData;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub trait Formatter: Send {
    fn format(&self, data: &NavigationData) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(
    format: OutputFormat,
    alignment_threshold: f64,
    verbose: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(alignment_threshold, verbose)),
        OutputFormat::Json => Box::new(JsonFormatter::new(alignment_threshold)),
        OutputFormat::Csv => Box::new(CsvFormatter::new(alignment_threshold)),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
