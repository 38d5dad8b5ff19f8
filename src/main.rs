//! logsim: write synthetic service logs under `output_logs/`.
//!
//! ## Usage
//!
//! ```bash
//! # JSON batches (default)
//! logsim
//!
//! # CSV batches, context column holds JSON text
//! logsim --format csv
//!
//! # Structured run events on stderr
//! LOG_LEVEL=debug LOG_DOMAINS=driver,writer logsim
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use logsim::logging;
use logsim::{Driver, SimConfig};

/// Generate fake logs for services.
#[derive(Parser)]
#[command(name = "logsim")]
#[command(version)]
#[command(about = "Generate fake logs for services.")]
struct Cli {
    /// Output format (json or csv)
    #[arg(long, default_value = "json", value_parser = ["json", "csv"])]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = Driver::new(SimConfig::default())
        .and_then(|mut driver| driver.run(&cli.format))
        .with_context(|| format!("log generation failed (format {})", cli.format));

    if let Err(err) = &result {
        logging::log_fatal(&format!("{:#}", err));
    }
    result.map(|_| ())
}
