use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcbroken_lib::config::EstimatorConfig;
use mcbroken_lib::error::ErrorResponse;
use mcbroken_lib::{estimate_for_date, parse_target_date, AppError, LossReport};

/// Compute revenue loss of McDonald's in the USA due to broken ice-cream
/// machines at a specific date
#[derive(Parser)]
#[command(name = "mcbroken", version)]
struct Cli {
    /// Target date in DD/MM/YY format
    #[arg(short = 't', long = "target-date", alias = "target_date")]
    target_date: String,

    /// Delete the cached archive and clone it again for the latest snapshots
    #[arg(short, long)]
    reinit: bool,

    /// Config file (defaults to ./mcbroken.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full breakdown as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: failed to serialize report: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{report}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.json {
                if let Ok(json) = serde_json::to_string(&ErrorResponse::from(&err)) {
                    println!("{json}");
                }
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<LossReport, AppError> {
    let target_date = parse_target_date(&cli.target_date)?;
    let config = match &cli.config {
        Some(path) => EstimatorConfig::load(path)?,
        None => EstimatorConfig::load_from_dir(Path::new("."))?,
    };
    estimate_for_date(&config, target_date, cli.reinit)
}
