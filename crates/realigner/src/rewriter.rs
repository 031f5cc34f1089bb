//! Rewrite pass.
//!
//! Applies the per-family offset to embedded stamps. Arrival times are never
//! touched and records keep their input order.

use contracts::{
    ClockOffset, CompleteOffsets, ContractError, Family, LogSink, Payload, Record, RewriteStats,
    Timestamp, UnstampedPolicy,
};
use tracing::{trace, warn};

use crate::classifier::Classifier;

/// What happened to one record
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    /// Stamp(s) shifted by the family offset
    Shifted {
        record: Record,
        family: Family,
        /// Number of stamps changed (1, or the sub-transform count)
        stamps: u64,
    },
    /// Unclassified, unchanged
    PassThrough(Record),
    /// Classified but the payload has no stamp field, unchanged
    Unstamped { record: Record, family: Family },
}

/// Shifts stamps according to a complete offset table
#[derive(Debug, Clone)]
pub struct Rewriter<'a> {
    classifier: &'a Classifier,
    offsets: &'a CompleteOffsets,
    unstamped_policy: UnstampedPolicy,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter
    pub fn new(
        classifier: &'a Classifier,
        offsets: &'a CompleteOffsets,
        unstamped_policy: UnstampedPolicy,
    ) -> Self {
        Self {
            classifier,
            offsets,
            unstamped_policy,
        }
    }

    /// Correct a single record.
    ///
    /// On the transform channel the family comes from the first
    /// sub-transform, and every sub-transform is shifted by that family's
    /// offset.
    pub fn correct(&self, mut record: Record) -> Result<Correction, ContractError> {
        let Some(class) = self.classifier.classify(&record.channel, &record.payload) else {
            return Ok(Correction::PassThrough(record));
        };

        let diff = self.offsets.offset(class.family);
        let stamps = match &mut record.payload {
            Payload::Transforms { transforms } => {
                for transform in transforms.iter_mut() {
                    transform.header.stamp = shift(transform.header.stamp, diff, &record.channel)?;
                }
                Some(transforms.len() as u64)
            }
            Payload::Stamped { header, .. } => {
                header.stamp = shift(header.stamp, diff, &record.channel)?;
                Some(1)
            }
            Payload::Unstamped { .. } => None,
        };

        Ok(match stamps {
            Some(stamps) => {
                record.discard_raw();
                Correction::Shifted {
                    record,
                    family: class.family,
                    stamps,
                }
            }
            None => Correction::Unstamped {
                record,
                family: class.family,
            },
        })
    }

    /// Stream `records` through `correct` into `sink`.
    ///
    /// The sink is neither flushed nor closed here.
    pub fn rewrite<I, S>(&self, records: I, sink: &mut S) -> Result<RewriteStats, ContractError>
    where
        I: IntoIterator<Item = Result<Record, ContractError>>,
        S: LogSink + ?Sized,
    {
        let mut stats = RewriteStats::default();

        for record in records {
            let record = record?;
            stats.total += 1;
            let correction = self.correct(record)?;
            self.emit(correction, sink, &mut stats)?;
        }

        Ok(stats)
    }

    /// Write a corrected record and count it
    fn emit<S>(
        &self,
        correction: Correction,
        sink: &mut S,
        stats: &mut RewriteStats,
    ) -> Result<(), ContractError>
    where
        S: LogSink + ?Sized,
    {
        match correction {
            Correction::Shifted {
                record,
                family,
                stamps,
            } => {
                stats.count_shifted(family);
                if self.classifier.is_transform_channel(&record.channel) {
                    stats.transforms_shifted += stamps;
                }
                trace!(channel = %record.channel, %family, stamps, "Stamps shifted");
                observability::record_rewritten(Some(family));
                sink.write(&record)
            }
            Correction::PassThrough(record) => {
                stats.passed_through += 1;
                observability::record_rewritten(None);
                sink.write(&record)
            }
            Correction::Unstamped { record, family } => {
                stats.unstamped += 1;
                observability::record_unstamped(&record.channel);
                warn!(
                    channel = %record.channel,
                    %family,
                    policy = ?self.unstamped_policy,
                    "No header stamp found, record not adjusted"
                );
                match self.unstamped_policy {
                    UnstampedPolicy::Forward => sink.write(&record),
                    UnstampedPolicy::Drop => {
                        stats.dropped += 1;
                        Ok(())
                    }
                }
            }
        }
    }
}

fn shift(stamp: Timestamp, diff: ClockOffset, channel: &str) -> Result<Timestamp, ContractError> {
    stamp
        .checked_shift(diff)
        .ok_or_else(|| ContractError::StampOverflow {
            channel: channel.to_string(),
        })
}
