//! glorys-merge: align GLORYS source files onto one grid and merge them.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use merger::{load_merge_config, run_merge};

#[derive(Parser, Debug)]
#[command(name = "glorys-merge")]
#[command(about = "Merge GLORYS temperature, salinity, currents and sea level onto one grid")]
struct Args {
    /// Run configuration (YAML)
    #[arg(short, long)]
    config: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Must run before the first file is opened.
    netcdf_parser::silence_hdf5_errors();

    let config = load_merge_config(&args.config)?;
    let align = config.align_config()?;
    info!(
        config = %args.config,
        hour = config.ssh_time,
        bbox = ?config.bbox(),
        tolerance = align.coordinate_tolerance,
        verify = align.verify_coordinates,
        "Loaded configuration"
    );

    run_merge(&config, &align).with_context(|| format!("Merge failed for {}", args.config))?;

    Ok(())
}
