mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::forecast::{CatchUpArgs, ForecastArgs, TargetsArgs};
use commands::ratios::{RatiosArgs, RollingArgs};

/// Revenue forecast, pacing and ad ratio calculations
#[derive(Parser)]
#[command(
    name = "rpace",
    version,
    about = "Revenue forecast, pacing and ad ratio calculations",
    long_about = "Distributes a revenue target across the months and days of a date range, \
                  paces daily actuals against that curve, sizes the catch-up needed when \
                  behind, and computes ad-account ratios (ROAS, CPA, CPM, CTR, MER) with \
                  decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline steps to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a scenario's revenue target into monthly targets and a daily curve
    Targets(TargetsArgs),
    /// Pace actuals against the forecast curve as of a date
    Forecast(ForecastArgs),
    /// Re-pace the rest of the range to close a shortfall
    CatchUp(CatchUpArgs),
    /// ROAS, CPA, CPM, CTR, MER from raw ad counters
    Ratios(RatiosArgs),
    /// Trailing-window revenue/spend ratio (aMER)
    Rolling(RollingArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Targets(args) => commands::forecast::run_targets(args),
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::CatchUp(args) => commands::forecast::run_catch_up(args),
        Commands::Ratios(args) => commands::ratios::run_ratios(args),
        Commands::Rolling(args) => commands::ratios::run_rolling(args),
        Commands::Version => {
            println!("rpace {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
