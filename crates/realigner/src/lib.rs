//! # Realigner
//!
//! Timestamp realignment of recorded logs.
//!
//! Responsibilities:
//! - Classify channels into the hose / shoot families
//! - Discover the clock offset of each family from its first sample
//! - Rewrite every record of a family with that offset
//!
//! Offsets are anchored on the first sample only, which assumes the drift
//! between payload stamps and the arrival clock is constant over a log.
//!
//! ## Example
//!
//! ```ignore
//! use realigner::Realigner;
//!
//! let realigner = Realigner::new(config);
//! let report = realigner.realign_with(&source, |offsets| {
//!     println!("hose offset: {}", offsets.offset(Family::Hose));
//!     JsonlSink::create(&output)
//! })?;
//! ```

mod classifier;
mod discoverer;
mod realigner;
mod rewriter;

pub use classifier::{normalize_name, Classification, Classifier};
pub use discoverer::{discover, Discovery};
pub use realigner::Realigner;
pub use rewriter::{Correction, Rewriter};

// Re-export contracts types
pub use contracts::{CompleteOffsets, OffsetTable, RealignReport, RewriteStats};
