//! LogSource / LogSink traits - log container abstraction
//!
//! The realigner never touches a container format directly. A source must be
//! replayable: each `records()` call starts again from the first record, which
//! is what the scan-then-rewrite algorithm relies on.

use crate::{ContractError, Record};

/// Forward stream of records, in recorded order
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record, ContractError>> + 'a>;

/// Replayable record source
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn LogSource> = open_source(path)?;
/// for record in source.records()? {
///     let record = record?;
///     println!("{} @ {}", record.channel, record.arrival_time);
/// }
/// // a second call starts over
/// let again = source.records()?;
/// ```
pub trait LogSource {
    /// Source name (used for logging/diagnostics)
    fn name(&self) -> &str;

    /// Open a fresh pass over all records
    ///
    /// # Errors
    /// Returns an error if the underlying container cannot be (re)opened.
    fn records(&self) -> Result<RecordStream<'_>, ContractError>;
}

/// Record output
///
/// Records are written in call order. There is no rollback; an artifact is
/// only valid once `close` returned `Ok`.
pub trait LogSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append one record
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, record: &Record) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), ContractError>;

    /// Finalize the artifact
    fn close(&mut self) -> Result<(), ContractError>;
}

impl<S: LogSource + ?Sized> LogSource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn records(&self) -> Result<RecordStream<'_>, ContractError> {
        (**self).records()
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, record: &Record) -> Result<(), ContractError> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<(), ContractError> {
        (**self).close()
    }
}
