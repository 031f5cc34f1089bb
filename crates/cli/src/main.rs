//! # Clock Realign CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading with CLI overrides
//! - Per-input offset report on stdout
//! - Non-zero exit when an input lacks a clock family

mod cli;
mod commands;
mod error;
mod paths;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_config, run_offsets, run_realign};
use error::CliError;
use observability::ObservabilityConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Clock Realign CLI starting"
    );

    let result = match &cli.command {
        Commands::Realign(args) => run_realign(args),
        Commands::Offsets(args) => run_offsets(args),
        Commands::Config(args) => run_config(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // A missing clock is a user-facing diagnostic, not a crash report
            if let Some(cli_error @ CliError::MissingClock { .. }) = e.downcast_ref::<CliError>() {
                eprintln!("{cli_error}");
            } else {
                tracing::error!(error = %e, "Command failed");
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let (level, force_level) = if cli.quiet {
        ("error", true)
    } else {
        match cli.verbose {
            0 => ("warn", false),
            1 => ("info", false),
            2 => ("debug", false),
            _ => ("trace", false),
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: level.to_string(),
        force_level,
    })
}
