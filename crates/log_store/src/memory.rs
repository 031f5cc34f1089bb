//! In-memory log container

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use contracts::{ContractError, LogSink, LogSource, Record, RecordStream};
use tracing::debug;

/// Source over records held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    records: Vec<Record>,
}

impl MemorySource {
    /// Create a new MemorySource with the given name
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LogSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> Result<RecordStream<'_>, ContractError> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

/// Sink collecting records in memory
///
/// The collected records stay readable through a [`MemorySinkHandle`] after
/// the sink itself has been moved into a realigner.
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    records: Rc<RefCell<Vec<Record>>>,
    closed: Rc<Cell<bool>>,
}

/// Read side of a [`MemorySink`]
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    records: Rc<RefCell<Vec<Record>>>,
    closed: Rc<Cell<bool>>,
}

impl MemorySink {
    /// Create a new MemorySink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Rc::default(),
            closed: Rc::default(),
        }
    }

    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            records: Rc::clone(&self.records),
            closed: Rc::clone(&self.closed),
        }
    }

    /// Snapshot of the records written so far
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl MemorySinkHandle {
    /// Snapshot of the records written so far
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &Record) -> Result<(), ContractError> {
        if self.closed.get() {
            return Err(ContractError::SinkClosed {
                sink_name: self.name.clone(),
            });
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), ContractError> {
        if !self.closed.replace(true) {
            debug!(sink = %self.name, records = self.records.borrow().len(), "Memory sink closed");
        }
        Ok(())
    }
}
