//! `realign` command implementation.

use anyhow::Result;
use tracing::info;

use contracts::{Family, RealignConfig, RealignReport, UnstampedPolicy};
use log_store::JsonlSink;
use observability::RealignMetricsAggregator;
use realigner::Realigner;

use super::{load_config, open_input, print_offsets, realign_error, validate_config};
use crate::cli::RealignArgs;
use crate::paths::{display_name, output_path_for};

/// Execute the `realign` command
///
/// Inputs are processed in order; the first failing input stops the run.
pub fn run_realign(args: &RealignArgs) -> Result<()> {
    let config = build_config(args)?;
    info!(
        transform_channel = %config.transform_channel,
        hose = %config.families.hose,
        shoot = %config.families.shoot,
        output_prefix = %config.output_prefix,
        inputs = args.inputs.len(),
        "Configuration loaded"
    );

    let realigner = Realigner::new(config);
    let mut aggregator = RealignMetricsAggregator::new();

    for input in &args.inputs {
        let source = open_input(input)?;
        let output = output_path_for(input, &realigner.config().output_prefix)?;

        println!("{}", display_name(input));
        println!("  -> {}", display_name(&output));

        if args.dry_run {
            let (offsets, _) = realigner
                .discover_complete(&source)
                .map_err(|e| realign_error(input, e))?;
            print_offsets(&offsets);
            continue;
        }

        let report = realigner
            .realign_with(&source, |offsets| {
                print_offsets(offsets);
                JsonlSink::create(&output)
            })
            .map_err(|e| realign_error(input, e))?;

        print_report(&report);
        aggregator.update(&report);
        info!(input = %input.display(), output = %output.display(), "Input realigned");
    }

    if aggregator.inputs > 1 {
        print!("\n{aggregator}");
    }
    Ok(())
}

fn build_config(args: &RealignArgs) -> Result<RealignConfig> {
    let mut config = load_config(&args.source)?;

    if let Some(prefix) = &args.output_prefix {
        info!(output_prefix = %prefix, "Overriding output prefix from CLI");
        config.output_prefix = prefix.clone();
    }
    if args.drop_unstamped {
        config.unstamped_policy = UnstampedPolicy::Drop;
    }

    validate_config(&config)?;
    Ok(config)
}

fn print_report(report: &RealignReport) {
    let stats = &report.stats;
    print!(
        "  {} records written: {} hose, {} shoot shifted, {} passed through",
        stats.written(),
        stats.shifted(Family::Hose),
        stats.shifted(Family::Shoot),
        stats.passed_through
    );
    if stats.unstamped > 0 {
        print!(", {} without stamp", stats.unstamped);
    }
    println!();
}
