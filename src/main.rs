// src/main.rs
use clap::Parser;
use nhl_data::cli::Args;
use nhl_data::commands;
use nhl_data::config::Config;
use nhl_data::error::AppError;
use nhl_data::logging::setup_logging;
use tracing::{error, info};

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut config = Config::load()?;
    config.verbose = args.verbose;

    // Keep the guard alive until exit so buffered log lines are flushed
    let (log_file_path, _guard) = setup_logging(&args, &config)?;
    info!("Logs are written to {log_file_path}");

    commands::run(&args.command, &config).inspect_err(|e| error!("{e}"))
}
