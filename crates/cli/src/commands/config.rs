//! `config` command implementation.

use anyhow::{Context, Result};

use config_loader::ConfigLoader;

use super::{load_config, validate_config};
use crate::cli::ConfigArgs;

/// Execute the `config` command
pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    validate_config(&config)?;

    let rendered = if args.json {
        ConfigLoader::to_json(&config)
    } else {
        ConfigLoader::to_toml(&config)
    }
    .context("Failed to render configuration")?;

    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
