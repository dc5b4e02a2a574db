use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::bounded;

use wayfinder::config::NavConfig;
use wayfinder::filters::FilterKind;
use wayfinder::geo::{self, Coordinate};
use wayfinder::output::{OutputFormat, create_formatter};
use wayfinder::pipeline::NavigationPipeline;
use wayfinder::trace;

#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(about = "Replay a sensor trace against a navigation target", long_about = None)]
struct Args {
    /// Trace file to replay (see `simulate_route` to produce one);
    /// reads stdin when omitted
    trace: Option<PathBuf>,

    /// Target coordinate as "lat,lon" (overrides the config file)
    #[arg(short, long)]
    target: Option<Coordinate>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Heading smoothing strategy
    #[arg(long, value_enum)]
    filter: Option<FilterKind>,

    /// Fixed heading calibration offset in degrees, added to every
    /// smoothed heading
    #[arg(long)]
    heading_offset: Option<f64>,

    /// Increase output verbosity
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match (&args.config, args.target) {
        (Some(path), _) => {
            let mut loaded = NavConfig::from_toml_file(path)?;
            if let Some(target) = args.target {
                loaded.target = target;
            }
            loaded
        }
        (None, Some(target)) => NavConfig::new(target),
        (None, None) => anyhow::bail!("either --target or --config is required"),
    };
    if let Some(kind) = args.filter {
        config.heading_filter.kind = kind;
    }
    config.validate()?;

    log::info!(
        "navigating toward {} with {:?} heading filter",
        config.target,
        config.heading_filter.kind
    );

    let formatter = create_formatter(
        args.format,
        config.alignment.threshold_degrees,
        args.verbose,
    );
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let reader: Box<dyn BufRead + Send> = match &args.trace {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let (event_tx, event_rx) = bounded(64);
    let feeder = thread::spawn(move || {
        for (number, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("trace read error: {}", e);
                    break;
                }
            };
            match trace::parse_line(&line) {
                Ok(Some(record)) => {
                    if event_tx.send(record.to_event()).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("trace line {}: {}", number + 1, e),
            }
        }
    });

    let mut navigation = NavigationPipeline::new(&config);
    if let Some(offset) = args.heading_offset {
        navigation.calibrate(offset);
    }
    let _heading_log = navigation.fusion().subscribe(|update| {
        log::debug!(
            "heading {:.1}° (pitch {:.1}°, roll {:.1}°)",
            update.heading,
            update.pitch,
            update.roll
        );
    });

    navigation.run(event_rx, |snapshot| {
        println!("{}", formatter.format(snapshot));
    })?;

    feeder
        .join()
        .map_err(|_| anyhow::anyhow!("trace feeder thread panicked"))?;

    let last = navigation.snapshot();
    if let Some(distance) = last.distance_m {
        log::info!("replay finished {} from target", geo::format_distance(distance));
    }

    Ok(())
}
