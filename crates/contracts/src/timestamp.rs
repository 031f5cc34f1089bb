//! Timestamp / ClockOffset - nanosecond time model
//!
//! Both the log-level arrival time and the embedded header stamp use the same
//! resolution, so offsets are plain signed nanosecond differences.

use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SEC: f64 = 1e9;

/// Point in time, nanoseconds since the recording clock epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Raw nanoseconds
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Seconds as f64 (diagnostics only)
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    /// `self - earlier`, `None` on overflow
    pub fn checked_offset_from(self, earlier: Timestamp) -> Option<ClockOffset> {
        self.0.checked_sub(earlier.0).map(ClockOffset)
    }

    /// Shift by `offset`, `None` on overflow
    pub fn checked_shift(self, offset: ClockOffset) -> Option<Timestamp> {
        self.0.checked_add(offset.0).map(Timestamp)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Signed clock offset in nanoseconds (arrival clock minus header stamp)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockOffset(pub i64);

impl ClockOffset {
    /// Raw nanoseconds
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Seconds as f64, signed
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }
}

impl fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs_f64())
    }
}
