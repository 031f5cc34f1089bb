//! `offsets` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{ClockAnchor, Family, OffsetTable};
use realigner::{Discovery, Realigner};

use super::{load_config, open_input, validate_config};
use crate::cli::OffsetsArgs;
use crate::error::CliError;

/// Discovery result for JSON output
#[derive(Serialize)]
struct OffsetsReport {
    input: String,
    found: bool,
    scanned: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    hose: Option<AnchorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shoot: Option<AnchorInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<Family>,
}

#[derive(Serialize)]
struct AnchorInfo {
    channel: String,
    arrival_time_ns: i64,
    header_stamp_ns: i64,
    offset_ns: i64,
    offset_s: f64,
}

impl From<&ClockAnchor> for AnchorInfo {
    fn from(anchor: &ClockAnchor) -> Self {
        Self {
            channel: anchor.channel.clone(),
            arrival_time_ns: anchor.arrival_time.as_nanos(),
            header_stamp_ns: anchor.header_stamp.as_nanos(),
            offset_ns: anchor.offset.as_nanos(),
            offset_s: anchor.offset.as_secs_f64(),
        }
    }
}

/// Execute the `offsets` command
///
/// Every input is scanned; the command fails afterwards if any of them
/// lacks a family.
pub fn run_offsets(args: &OffsetsArgs) -> Result<()> {
    let reports = collect_offsets(args)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&reports).context("Failed to serialize offsets")?;
        println!("{}", json);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    match reports.into_iter().find(|report| !report.found) {
        Some(report) => Err(CliError::missing_clock(report.input, report.missing).into()),
        None => Ok(()),
    }
}

/// Scan every input, partial tables included
fn collect_offsets(args: &OffsetsArgs) -> Result<Vec<OffsetsReport>> {
    let config = load_config(&args.source)?;
    validate_config(&config)?;

    let realigner = Realigner::new(config);
    let mut reports = Vec::with_capacity(args.inputs.len());

    for input in &args.inputs {
        let source = open_input(input)?;
        let discovery = realigner
            .discover(&source)
            .with_context(|| format!("Failed to scan {}", input.display()))?;
        info!(
            input = %input.display(),
            found = discovery.found,
            scanned = discovery.scanned,
            "Offsets discovered"
        );
        reports.push(build_report(input.display().to_string(), &discovery));
    }
    Ok(reports)
}

fn build_report(input: String, discovery: &Discovery) -> OffsetsReport {
    let table: &OffsetTable = &discovery.offsets;
    OffsetsReport {
        input,
        found: discovery.found,
        scanned: discovery.scanned,
        hose: table.anchor(Family::Hose).map(AnchorInfo::from),
        shoot: table.anchor(Family::Shoot).map(AnchorInfo::from),
        missing: table.missing(),
    }
}

fn print_report(report: &OffsetsReport) {
    println!("{} ({} records scanned)", report.input, report.scanned);
    for (label, anchor) in [("Hose: ", &report.hose), ("Shoot:", &report.shoot)] {
        match anchor {
            Some(anchor) => println!(
                "  {} {:>4}s (first sample on {})",
                label, anchor.offset_s, anchor.channel
            ),
            None => println!("  {} not found", label),
        }
    }
}
