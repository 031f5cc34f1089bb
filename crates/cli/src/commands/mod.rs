//! Command implementations.

mod config;
mod offsets;
mod realign;

pub use config::run_config;
pub use offsets::run_offsets;
pub use realign::run_realign;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use config_loader::ConfigLoader;
use contracts::{CompleteOffsets, ContractError, Family, RealignConfig};
use log_store::JsonlSource;

use crate::cli::ConfigSource;
use crate::error::CliError;

/// Read the configuration file (or defaults) and apply the shared overrides.
///
/// The result is not validated yet; callers apply their own overrides and
/// then call [`validate_config`] once.
fn load_config(source: &ConfigSource) -> Result<RealignConfig> {
    let mut config = match &source.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::read_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => RealignConfig::default(),
    };

    if let Some(channel) = &source.transform_channel {
        info!(transform_channel = %channel, "Overriding transform channel from CLI");
        config.transform_channel = channel.clone();
    }
    Ok(config)
}

fn validate_config(config: &RealignConfig) -> Result<()> {
    ConfigLoader::validate(config).context("Invalid configuration")
}

fn open_input(path: &Path) -> Result<JsonlSource> {
    if !path.is_file() {
        return Err(CliError::input_not_found(path.display().to_string()).into());
    }
    JsonlSource::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// Turn a missing clock into the user-facing error, keep everything else
fn realign_error(input: &Path, err: ContractError) -> anyhow::Error {
    match err {
        ContractError::MissingClock { missing, .. } => {
            CliError::missing_clock(input.display().to_string(), missing).into()
        }
        other => anyhow::Error::new(other).context(format!("Failed to realign {}", input.display())),
    }
}

fn print_offsets(offsets: &CompleteOffsets) {
    println!("Diff");
    println!(
        "  Hose:  {:>4}s",
        offsets.offset(Family::Hose).as_secs_f64()
    );
    println!(
        "  Shoot: {:>4}s",
        offsets.offset(Family::Shoot).as_secs_f64()
    );
}

#[cfg(test)]
const HOSE_LINE: &str =
    r#"{"channel":"/hose/scan","arrival_time":700,"payload":{"kind":"stamped","header":{"stamp":100}}}"#;

#[cfg(test)]
const SHOOT_LINE: &str =
    r#"{"channel":"/shoot/cam","arrival_time":900,"payload":{"kind":"stamped","header":{"stamp":50}}}"#;

#[cfg(test)]
fn write_log(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
