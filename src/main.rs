//! scorecard-dl command line entry point
//!
//! With no arguments, reads `DATA_GOV_KEY` (from the environment or `.env`),
//! downloads every page, and writes `college_scorecard.json` and
//! `college_scorecard_carnegie_basic.csv` into the working directory.

use clap::Parser;
use scorecard_dl::{Config, Pipeline, RateLimitConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scorecard-dl")]
#[command(about = "Download the College Scorecard dataset and export Carnegie classifications")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API root to query
    #[arg(long)]
    base_url: Option<String>,

    /// Raw JSON dump destination
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Classification CSV destination
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Fixed pause between page requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> scorecard_dl::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(path) = self.json_out {
            config.json_output = path;
        }
        if let Some(path) = self.csv_out {
            config.csv_output = path;
        }
        if let Some(ms) = self.delay_ms {
            config.rate_limit = RateLimitConfig::FixedDelay {
                delay: Duration::from_millis(ms),
            };
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if self.no_progress {
            config.show_progress = false;
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scorecard_dl={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> scorecard_dl::Result<()> {
    let config = cli.into_config()?;
    let summary = Pipeline::new(config)?.run().await?;
    info!(
        pages = summary.pages,
        results = summary.results,
        institutions = summary.institutions,
        json = %summary.json_output.display(),
        csv = %summary.csv_output.display(),
        "done"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
