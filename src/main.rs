use anyhow::{Context, Result};
use clap::Parser;
use dominance::{CountConfig, PngImage};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the dominant colors of PNG images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more PNG files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Colors closer than this to each other are merged (0 to 1)
    #[arg(short, long, default_value_t = dominance::DEFAULT_DISTANCE_THRESHOLD)]
    distance_threshold: f64,

    /// Colors covering less than this fraction of the image are dropped
    #[arg(short, long, default_value_t = dominance::DEFAULT_FREQUENCY_THRESHOLD)]
    frequency_threshold: f64,

    /// Pixels with alpha at or below this are ignored, in the image's channel units
    #[arg(short = 'a', long, default_value_t = dominance::DEFAULT_MINIMUM_ALPHA)]
    minimum_alpha: u16,

    /// Log level: off, error, warn, info, debug or trace. RUST_LOG takes precedence
    #[arg(long, default_value = "off")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dominance={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config = CountConfig::default()
        .distance_threshold(args.distance_threshold)
        .frequency_threshold(args.frequency_threshold)
        .minimum_alpha(args.minimum_alpha);

    for input in &args.inputs {
        let image = PngImage::open(input).with_context(|| format!("failed to read {}", input.display()))?;

        match dominance::count(&image, &config).with_context(|| format!("failed to count colors of {}", input.display()))? {
            Some(stats) => print!("{}", stats),
            None => println!("Skipped {}: interlaced images with sub-byte samples are not supported", input.display()),
        }
    }

    Ok(())
}
