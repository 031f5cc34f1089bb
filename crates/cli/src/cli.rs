//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Clock Realign - shift hose/shoot timestamps onto the recording clock
#[derive(Parser, Debug)]
#[command(
    name = "clock-realign",
    author,
    version,
    about = "Realign hose/shoot payload timestamps with the recording clock",
    long_about = "Realigns the embedded timestamps of the hose and shoot channel families.\n\n\
                  The offset of each family is taken from its first sample in the log \n\
                  (arrival time minus header stamp) and applied to every record of that \n\
                  family, including transforms on the transform channel. The corrected \n\
                  log is written next to the input with the output prefix."
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Realign one or more logs
    Realign(RealignArgs),

    /// Discover and print the clock offsets without writing anything
    Offsets(OffsetsArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Configuration source shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the transform channel from configuration
    #[arg(long)]
    pub transform_channel: Option<String>,
}

/// Arguments for the `realign` command
#[derive(Parser, Debug, Clone)]
pub struct RealignArgs {
    /// Input logs (JSON Lines)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub source: ConfigSource,

    /// Override the output file name prefix from configuration
    #[arg(long)]
    pub output_prefix: Option<String>,

    /// Drop classified records that carry no stamp instead of forwarding them
    #[arg(long)]
    pub drop_unstamped: bool,

    /// Discover and print offsets but do not write the corrected logs
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `offsets` command
#[derive(Parser, Debug)]
pub struct OffsetsArgs {
    /// Input logs (JSON Lines)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub source: ConfigSource,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Output as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
