//! # Log Store
//!
//! Log containers implementing the `LogSource` / `LogSink` contracts.
//!
//! - [`JsonlSource`] / [`JsonlSink`]: JSON Lines files, one record per line
//! - [`MemorySource`] / [`MemorySink`]: in-memory logs for tests and tooling

mod jsonl;
mod memory;

pub use jsonl::{JsonlSink, JsonlSource};
pub use memory::{MemorySink, MemorySinkHandle, MemorySource};
