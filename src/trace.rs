//! On-disk trace format for recorded or synthesized sensor streams.
//!
//! One event per line, comma separated:
//!
//! ```text
//! loc,<latitude_deg>,<longitude_deg>
//! ori,<alpha_rad>,<beta_rad>,<gamma_rad>
//! mag,<x>,<y>,<z>
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The replay CLI
//! consumes this format and `simulate_route` produces it.

use crate::fusion::{MagneticVector, OrientationSample};
use crate::geo::Coordinate;
use crate::pipeline::SourceEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceRecord {
    Location(Coordinate),
    Orientation(OrientationSample),
    Compass(MagneticVector),
}

impl TraceRecord {
    pub fn to_event(self) -> SourceEvent {
        match self {
            TraceRecord::Location(c) => SourceEvent::Location(c),
            TraceRecord::Orientation(s) => SourceEvent::Orientation(s),
            TraceRecord::Compass(v) => SourceEvent::Compass(v),
        }
    }
}

/// Parse one trace line. Returns `Ok(None)` for blank lines and
/// comments.
pub fn parse_line(line: &str) -> Result<Option<TraceRecord>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split(',').map(str::trim);
    let kind = parts.next().unwrap_or_default();
    let fields: Vec<f64> = parts
        .map(|p| p.parse::<f64>().map_err(|_| format!("bad number: {}", p)))
        .collect::<Result<_, _>>()?;

    let record = match (kind, fields.as_slice()) {
        ("loc", [lat, lon]) => TraceRecord::Location(Coordinate::new(*lat, *lon)),
        ("ori", [alpha, beta, gamma]) => TraceRecord::Orientation(OrientationSample {
            alpha: *alpha,
            beta: *beta,
            gamma: *gamma,
        }),
        ("mag", [x, y, z]) => TraceRecord::Compass(MagneticVector {
            x: *x,
            y: *y,
            z: *z,
        }),
        _ => return Err(format!("unrecognized trace line: {}", line)),
    };
    Ok(Some(record))
}

/// Render one record as a trace line (no trailing newline).
pub fn format_record(record: &TraceRecord) -> String {
    match record {
        TraceRecord::Location(c) => format!("loc,{:.7},{:.7}", c.latitude, c.longitude),
        TraceRecord::Orientation(s) => format!("ori,{:.6},{:.6},{:.6}", s.alpha, s.beta, s.gamma),
        TraceRecord::Compass(v) => format!("mag,{:.4},{:.4},{:.4}", v.x, v.y, v.z),
    }
}
