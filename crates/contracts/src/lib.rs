//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `arrival_time`: capture clock of the log container (nanoseconds, i64)
//! - `header.stamp`: timestamp embedded in the payload, same resolution
//! - offset = first arrival time - first header stamp, per family

mod config;
mod error;
mod family;
mod log_io;
mod record;
mod report;
mod timestamp;

pub use config::*;
pub use error::*;
pub use family::*;
pub use log_io::{LogSink, LogSource, RecordStream};
pub use record::*;
pub use report::*;
pub use timestamp::*;
