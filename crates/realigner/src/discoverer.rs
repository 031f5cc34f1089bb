//! Offset discovery pass.

use contracts::{ClockAnchor, ContractError, OffsetTable, Record};
use tracing::debug;

use crate::classifier::Classifier;

/// Outcome of the discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Offsets found so far (partial when `found` is false)
    pub offsets: OffsetTable,
    /// Both families have an offset
    pub found: bool,
    /// Records read before the scan stopped
    pub scanned: u64,
}

/// Scan `records` for the first sample of every family.
///
/// The offset of a family is taken from its first classified record only.
/// The scan stops as soon as both families are known; read errors abort it.
pub fn discover<I>(classifier: &Classifier, records: I) -> Result<Discovery, ContractError>
where
    I: IntoIterator<Item = Result<Record, ContractError>>,
{
    let mut offsets = OffsetTable::new();
    let mut scanned = 0u64;

    for record in records {
        let record = record?;
        scanned += 1;

        let Some(class) = classifier.classify(&record.channel, &record.payload) else {
            continue;
        };
        if offsets.contains(class.family) {
            continue;
        }

        let offset = record
            .arrival_time
            .checked_offset_from(class.stamp)
            .ok_or_else(|| ContractError::StampOverflow {
                channel: record.channel.clone(),
            })?;

        debug!(
            family = %class.family,
            channel = %record.channel,
            arrival = record.arrival_time.as_nanos(),
            stamp = class.stamp.as_nanos(),
            offset_ns = offset.as_nanos(),
            "Clock anchor found"
        );

        offsets.record(
            class.family,
            ClockAnchor {
                channel: record.channel,
                arrival_time: record.arrival_time,
                header_stamp: class.stamp,
                offset,
            },
        );

        if offsets.is_complete() {
            return Ok(Discovery {
                offsets,
                found: true,
                scanned,
            });
        }
    }

    Ok(Discovery {
        offsets,
        found: false,
        scanned,
    })
}
