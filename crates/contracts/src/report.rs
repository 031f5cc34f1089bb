//! RewriteStats / RealignReport - Realigner output
//!
//! Per-run counters, consumed by the CLI summary and by observability.

use serde::{Deserialize, Serialize};

use crate::{CompleteOffsets, Family};

/// Counters of one rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    /// Records read
    pub total: u64,

    /// Hose records with shifted stamps
    pub shifted_hose: u64,

    /// Shoot records with shifted stamps
    pub shifted_shoot: u64,

    /// Unclassified records forwarded unmodified
    pub passed_through: u64,

    /// Classified records without a stamp field
    pub unstamped: u64,

    /// Records left out of the output
    pub dropped: u64,

    /// Sub-transform stamps shifted on the transform channel
    pub transforms_shifted: u64,
}

impl RewriteStats {
    /// Shifted record count for `family`
    pub fn shifted(&self, family: Family) -> u64 {
        match family {
            Family::Hose => self.shifted_hose,
            Family::Shoot => self.shifted_shoot,
        }
    }

    pub(crate) fn shifted_mut(&mut self, family: Family) -> &mut u64 {
        match family {
            Family::Hose => &mut self.shifted_hose,
            Family::Shoot => &mut self.shifted_shoot,
        }
    }

    /// Count one shifted record of `family`
    pub fn count_shifted(&mut self, family: Family) {
        *self.shifted_mut(family) += 1;
    }

    /// Records handed to the sink
    pub fn written(&self) -> u64 {
        self.total - self.dropped
    }
}

/// Result of a complete realignment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealignReport {
    /// Source that was realigned
    pub source_name: String,

    /// Offsets applied
    pub offsets: CompleteOffsets,

    /// Records read by the discovery pass before both clocks were found
    pub discovery_scanned: u64,

    /// Rewrite pass counters
    pub stats: RewriteStats,
}
