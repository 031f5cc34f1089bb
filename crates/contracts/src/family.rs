//! Family / OffsetTable - discovery output
//!
//! The offset table is write-once per family. The rewriter only accepts a
//! `CompleteOffsets`, which can only be built once both families are known.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ClockOffset, Timestamp};

/// Logical channel family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Hose,
    Shoot,
}

impl Family {
    /// All families, in classification order
    pub const ALL: [Family; 2] = [Family::Hose, Family::Shoot];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Hose => "hose",
            Family::Shoot => "shoot",
        }
    }

    fn index(self) -> usize {
        match self {
            Family::Hose => 0,
            Family::Shoot => 1,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First sample observed for a family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockAnchor {
    /// Channel the sample was read from
    pub channel: String,

    /// Log-level arrival time of the sample
    pub arrival_time: Timestamp,

    /// Embedded stamp of the sample
    pub header_stamp: Timestamp,

    /// `arrival_time - header_stamp`
    pub offset: ClockOffset,
}

/// Per-family clock offsets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable {
    anchors: [Option<ClockAnchor>; 2],
}

impl OffsetTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the anchor for `family`.
    ///
    /// Returns `false` (and keeps the existing entry) if the family already
    /// has one.
    pub fn record(&mut self, family: Family, anchor: ClockAnchor) -> bool {
        let slot = &mut self.anchors[family.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(anchor);
        true
    }

    /// Whether `family` has been discovered
    pub fn contains(&self, family: Family) -> bool {
        self.anchors[family.index()].is_some()
    }

    /// Anchor sample for `family`
    pub fn anchor(&self, family: Family) -> Option<&ClockAnchor> {
        self.anchors[family.index()].as_ref()
    }

    /// Offset for `family`
    pub fn offset(&self, family: Family) -> Option<ClockOffset> {
        self.anchor(family).map(|a| a.offset)
    }

    /// Both families discovered
    pub fn is_complete(&self) -> bool {
        Family::ALL.iter().all(|f| self.contains(*f))
    }

    /// Families without an entry
    pub fn missing(&self) -> Vec<Family> {
        Family::ALL
            .iter()
            .copied()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    /// Freeze into a complete table, or give the table back if incomplete
    pub fn into_complete(self) -> Result<CompleteOffsets, OffsetTable> {
        match self.anchors {
            [Some(hose), Some(shoot)] => Ok(CompleteOffsets { hose, shoot }),
            anchors => Err(OffsetTable { anchors }),
        }
    }
}

/// Offset table with an entry for every family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteOffsets {
    hose: ClockAnchor,
    shoot: ClockAnchor,
}

impl CompleteOffsets {
    /// Anchor sample for `family`
    pub fn anchor(&self, family: Family) -> &ClockAnchor {
        match family {
            Family::Hose => &self.hose,
            Family::Shoot => &self.shoot,
        }
    }

    /// Offset for `family`
    pub fn offset(&self, family: Family) -> ClockOffset {
        self.anchor(family).offset
    }
}
