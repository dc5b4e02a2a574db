use clap::Parser;
use rolling_stats::Stats;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use wayfinder::geo::{self, Coordinate};
use wayfinder::simulation::{FixJitter, NoiseConfig, NoisyOrientation, SyntheticRoute};
use wayfinder::trace::{TraceRecord, format_record};

/// Generate a synthetic sensor trace for a walker heading toward a
/// target, suitable for replay with the main `wayfinder` binary.
#[derive(Parser, Debug)]
#[command(name = "simulate_route")]
#[command(about = "Generate a synthetic navigation sensor trace", long_about = None)]
struct Args {
    /// Start coordinate as "lat,lon"
    #[arg(long)]
    start: Coordinate,

    /// Target coordinate as "lat,lon"
    #[arg(long)]
    target: Coordinate,

    /// Walking speed in meters per second
    #[arg(long, default_value = "1.4")]
    speed: f64,

    /// Initial device heading in degrees
    #[arg(long, default_value = "190.0")]
    heading: f64,

    /// Maximum turn rate toward the target in degrees per second
    #[arg(long, default_value = "20.0")]
    turn_rate: f64,

    /// Orientation sample cadence in Hz
    #[arg(long, default_value = "10.0")]
    cadence: f64,

    /// GPS fix interval in seconds
    #[arg(long, default_value = "0.5")]
    fix_interval: f64,

    /// Heading noise standard deviation in degrees
    #[arg(long, default_value = "8.0")]
    heading_sigma: f64,

    /// Fix position error standard deviation in meters
    #[arg(long, default_value = "3.0")]
    fix_sigma: f64,

    /// Random seed
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Maximum simulated duration in seconds
    #[arg(long, default_value = "600.0")]
    max_duration: f64,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.cadence <= 0.0 || args.fix_interval <= 0.0 || args.speed <= 0.0 {
        anyhow::bail!("cadence, fix interval and speed must be positive");
    }

    let noise = NoiseConfig::default()
        .with_seed(args.seed)
        .with_heading_sigma(args.heading_sigma)
        .with_fix_sigma(args.fix_sigma);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    writeln!(out, "# wayfinder trace: {} -> {}", args.start, args.target)?;

    let mut route = SyntheticRoute::new(args.start, args.target, args.speed, args.fix_interval);
    let mut orientation = NoisyOrientation::new(&noise);
    let mut jitter = FixJitter::new(&noise);
    let mut heading_stats: Stats<f64> = Stats::new();

    let dt = 1.0 / args.cadence;
    let mut time_s = 0.0;
    let mut next_fix_s = 0.0;
    let mut heading = args.heading;
    let mut position = args.start;
    let mut arrived = false;

    while !arrived && time_s <= args.max_duration {
        // The walker turns toward the target along the shortest rotation
        let bearing = geo::initial_bearing(position, args.target);
        let correction = geo::angle_difference(heading, bearing);
        let max_step = args.turn_rate * dt;
        heading = geo::normalize_angle(heading + correction.clamp(-max_step, max_step));

        let sample = orientation.sample(heading);
        heading_stats.update(geo::normalize_angle(sample.alpha.to_degrees()));
        writeln!(out, "{}", format_record(&TraceRecord::Orientation(sample)))?;

        if time_s >= next_fix_s {
            match route.next() {
                Some(fix) => {
                    position = fix;
                    let noisy = jitter.apply(fix);
                    writeln!(out, "{}", format_record(&TraceRecord::Location(noisy)))?;
                }
                None => arrived = true,
            }
            next_fix_s += args.fix_interval;
        }

        time_s += dt;
    }

    out.flush()?;

    log::info!(
        "emitted {:.1}s of trace; noisy heading mean {:.1}° / sd {:.1}°",
        time_s,
        heading_stats.mean,
        heading_stats.std_dev
    );

    Ok(())
}
