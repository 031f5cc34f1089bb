//! Realignment metrics
//!
//! Counters and gauges for the discovery and rewrite passes, plus an
//! in-memory aggregator for the end-of-run summary.

use std::collections::BTreeMap;

use contracts::{ClockOffset, Family, RealignReport, RewriteStats};
use metrics::{counter, gauge, histogram};

/// Record the outcome of a discovery pass
pub fn record_discovery(scanned: u64, found: bool) {
    let status = if found { "found" } else { "missing" };
    counter!("clock_realign_discoveries_total", "status" => status).increment(1);
    histogram!("clock_realign_discovery_scanned_records").record(scanned as f64);
}

/// Record a single rewritten record
///
/// `family` is `None` for records forwarded unmodified.
pub fn record_rewritten(family: Option<Family>) {
    let family = family.map(Family::as_str).unwrap_or("unclassified");
    counter!("clock_realign_records_total", "family" => family).increment(1);
}

/// Record a classified record without a stamp field
pub fn record_unstamped(channel: &str) {
    counter!(
        "clock_realign_unstamped_records_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record the offsets and counters of a finished run
pub fn record_report(report: &RealignReport) {
    counter!("clock_realign_inputs_total").increment(1);

    for family in Family::ALL {
        gauge!("clock_realign_offset_seconds", "family" => family.as_str())
            .set(report.offsets.offset(family).as_secs_f64());
    }

    let stats = &report.stats;
    counter!("clock_realign_transform_stamps_shifted_total").increment(stats.transforms_shifted);
    if stats.dropped > 0 {
        counter!("clock_realign_records_dropped_total").increment(stats.dropped);
    }
}

/// Aggregates reports across the inputs of one invocation
#[derive(Debug, Clone, Default)]
pub struct RealignMetricsAggregator {
    /// Inputs realigned
    pub inputs: u64,

    /// Summed rewrite counters
    pub totals: RewriteStats,

    /// Offset statistics per family (seconds)
    pub offset_stats: BTreeMap<Family, RunningStats>,
}

impl RealignMetricsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one report in
    pub fn update(&mut self, report: &RealignReport) {
        self.inputs += 1;

        let stats = &report.stats;
        self.totals.total += stats.total;
        self.totals.shifted_hose += stats.shifted_hose;
        self.totals.shifted_shoot += stats.shifted_shoot;
        self.totals.passed_through += stats.passed_through;
        self.totals.unstamped += stats.unstamped;
        self.totals.dropped += stats.dropped;
        self.totals.transforms_shifted += stats.transforms_shifted;

        for family in Family::ALL {
            self.offset_stats
                .entry(family)
                .or_default()
                .push_offset(report.offsets.offset(family));
        }
    }

    /// Offset summary for `family`
    pub fn offset_summary(&self, family: Family) -> StatsSummary {
        self.offset_stats
            .get(&family)
            .map(StatsSummary::from)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for RealignMetricsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Realign Summary ===")?;
        writeln!(f, "Inputs: {}", self.inputs)?;
        writeln!(f, "Records: {}", self.totals.total)?;
        writeln!(
            f,
            "Shifted: hose={}, shoot={} ({} transform stamps)",
            self.totals.shifted_hose, self.totals.shifted_shoot, self.totals.transforms_shifted
        )?;
        writeln!(f, "Passed through: {}", self.totals.passed_through)?;
        if self.totals.unstamped > 0 {
            writeln!(
                f,
                "Unstamped: {} (dropped {})",
                self.totals.unstamped, self.totals.dropped
            )?;
        }
        for family in Family::ALL {
            writeln!(f, "Offset {} (s): {}", family, self.offset_summary(family))?;
        }
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else if self.count == 1 {
            write!(f, "{:.9}", self.mean)
        } else {
            write!(
                f,
                "min={:.9}, max={:.9}, mean={:.9} (n={})",
                self.min, self.max, self.mean, self.count
            )
        }
    }
}

/// Incremental min / max / mean
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.min = value;
            self.max = value;
            return;
        }
        self.mean += (value - self.mean) / self.count as f64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Add an offset, in seconds
    pub fn push_offset(&mut self, offset: ClockOffset) {
        self.push(offset.as_secs_f64());
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean (0 when empty)
    pub fn mean(&self) -> f64 {
        self.mean
    }
}
