//! Two-pass orchestration: discover, then rewrite.

use contracts::{
    CompleteOffsets, ContractError, LogSink, LogSource, RealignConfig, RealignReport,
};
use tracing::{debug, info, instrument};

use crate::classifier::Classifier;
use crate::discoverer::{discover, Discovery};
use crate::rewriter::Rewriter;

/// Timestamp realigner for one configuration
#[derive(Debug, Clone)]
pub struct Realigner {
    config: RealignConfig,
    classifier: Classifier,
}

impl Realigner {
    /// Create a realigner
    pub fn new(config: RealignConfig) -> Self {
        let classifier = Classifier::new(&config);
        Self { config, classifier }
    }

    /// Run configuration
    pub fn config(&self) -> &RealignConfig {
        &self.config
    }

    /// Discovery pass only
    #[instrument(name = "discover", skip_all, fields(source = %source.name()))]
    pub fn discover<S>(&self, source: &S) -> Result<Discovery, ContractError>
    where
        S: LogSource + ?Sized,
    {
        let discovery = discover(&self.classifier, source.records()?)?;
        observability::record_discovery(discovery.scanned, discovery.found);
        debug!(
            found = discovery.found,
            scanned = discovery.scanned,
            "Discovery pass finished"
        );
        Ok(discovery)
    }

    /// Discover offsets and require both families.
    ///
    /// # Errors
    /// `ContractError::MissingClock` if a family has no sample in the log.
    pub fn discover_complete<S>(&self, source: &S) -> Result<(CompleteOffsets, u64), ContractError>
    where
        S: LogSource + ?Sized,
    {
        let discovery = self.discover(source)?;
        let scanned = discovery.scanned;
        discovery
            .offsets
            .into_complete()
            .map(|offsets| (offsets, scanned))
            .map_err(|partial| ContractError::missing_clock(source.name(), partial.missing()))
    }

    /// Realign `source` into an already opened `sink`
    pub fn realign<S, K>(&self, source: &S, sink: K) -> Result<RealignReport, ContractError>
    where
        S: LogSource + ?Sized,
        K: LogSink,
    {
        self.realign_with(source, |_| Ok(sink))
    }

    /// Realign `source`, opening the sink only once both offsets are known.
    ///
    /// `open_sink` is never called for a log without a complete clock, so no
    /// output artifact is created in that case. The sink is flushed and
    /// closed after the last record.
    #[instrument(name = "realign", skip_all, fields(source = %source.name()))]
    pub fn realign_with<S, K, F>(
        &self,
        source: &S,
        open_sink: F,
    ) -> Result<RealignReport, ContractError>
    where
        S: LogSource + ?Sized,
        K: LogSink,
        F: FnOnce(&CompleteOffsets) -> Result<K, ContractError>,
    {
        let (offsets, discovery_scanned) = self.discover_complete(source)?;
        let mut sink = open_sink(&offsets)?;

        info!(
            sink = %sink.name(),
            hose_offset_s = offsets.offset(contracts::Family::Hose).as_secs_f64(),
            shoot_offset_s = offsets.offset(contracts::Family::Shoot).as_secs_f64(),
            "Rewriting log"
        );

        let rewriter = Rewriter::new(&self.classifier, &offsets, self.config.unstamped_policy);
        let stats = rewriter.rewrite(source.records()?, &mut sink)?;
        sink.flush()?;
        sink.close()?;

        let report = RealignReport {
            source_name: source.name().to_string(),
            offsets,
            discovery_scanned,
            stats,
        };
        observability::record_report(&report);

        info!(
            records = stats.total,
            shifted_hose = stats.shifted_hose,
            shifted_shoot = stats.shifted_shoot,
            passed_through = stats.passed_through,
            "Rewrite finished"
        );

        Ok(report)
    }
}

impl Default for Realigner {
    fn default() -> Self {
        Self::new(RealignConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ClockOffset, Family, Payload, Record, Timestamp};
    use log_store::{MemorySink, MemorySource};
    use std::cell::Cell;

    fn stamped(channel: &str, stamp: i64, arrival: i64) -> Record {
        Record::new(channel, Timestamp(arrival), Payload::stamped(Timestamp(stamp)))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let source = MemorySource::new(
            "scenario",
            vec![
                stamped("hose", 100, 700),
                stamped("shoot", 50, 900),
                stamped("hose", 110, 710),
            ],
        );
        let sink = MemorySink::new("out");
        let collected = sink.handle();

        let report = Realigner::default().realign(&source, sink).unwrap();

        assert_eq!(report.offsets.offset(Family::Hose), ClockOffset(600));
        assert_eq!(report.offsets.offset(Family::Shoot), ClockOffset(850));

        let out = collected.records();
        let stamps: Vec<i64> = out
            .iter()
            .map(|r| r.payload.header_stamp().unwrap().as_nanos())
            .collect();
        assert_eq!(stamps, vec![700, 900, 710]);
        let arrivals: Vec<i64> = out.iter().map(|r| r.arrival_time.as_nanos()).collect();
        assert_eq!(arrivals, vec![700, 900, 710]);
        assert!(collected.is_closed());
    }

    #[test]
    fn test_missing_family_never_opens_sink() {
        let source = MemorySource::new(
            "hose_only",
            vec![stamped("/hose/scan", 100, 700), stamped("/odom", 1, 1)],
        );
        let opened = Cell::new(false);

        let result = Realigner::default().realign_with(&source, |_| {
            opened.set(true);
            Ok(MemorySink::new("never"))
        });

        match result {
            Err(ContractError::MissingClock {
                source_name,
                missing,
            }) => {
                assert_eq!(source_name, "hose_only");
                assert_eq!(missing, vec![Family::Shoot]);
            }
            other => panic!("expected MissingClock, got {other:?}"),
        }
        assert!(!opened.get());
    }

    #[test]
    fn test_open_sink_sees_offsets() {
        let source = MemorySource::new(
            "offsets",
            vec![stamped("/shoot", 0, 5), stamped("/hose", 0, 3)],
        );
        let seen = Cell::new(None);

        Realigner::default()
            .realign_with(&source, |offsets| {
                seen.set(Some(offsets.offset(Family::Shoot)));
                Ok(MemorySink::new("out"))
            })
            .unwrap();

        assert_eq!(seen.get(), Some(ClockOffset(5)));
    }

    #[test]
    fn test_discover_only() {
        let source = MemorySource::new(
            "partial",
            vec![stamped("/shoot", 10, 20)],
        );
        let discovery = Realigner::default().discover(&source).unwrap();
        assert!(!discovery.found);
        assert_eq!(discovery.offsets.offset(Family::Shoot), Some(ClockOffset(10)));
    }
}
