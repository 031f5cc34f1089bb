//! JSON Lines log container
//!
//! One `Record` per line. Blank lines are ignored on read. Every record read
//! keeps its source line, and the sink writes a record that still carries it
//! back verbatim, so unmodified records round-trip byte for byte.
//!
//! ```text
//! {"channel":"/hose/scan","arrival_time":700,"payload":{"kind":"stamped","header":{"stamp":100}}}
//! {"channel":"/tf","arrival_time":705,"payload":{"kind":"transforms","transforms":[...]}}
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use contracts::{ContractError, LogSink, LogSource, Record, RecordStream};
use serde_json::value::RawValue;
use tracing::{debug, instrument, warn};

const PARTIAL_SUFFIX: &str = ".partial";

/// Replayable JSONL source
#[derive(Debug, Clone)]
pub struct JsonlSource {
    name: String,
    path: PathBuf,
}

impl JsonlSource {
    /// Open a JSONL log
    ///
    /// # Errors
    /// Returns an IO error if `path` does not exist or is not a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(ContractError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }

        Ok(Self {
            name: path.display().to_string(),
            path: path.to_path_buf(),
        })
    }
}

impl LogSource for JsonlSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> Result<RecordStream<'_>, ContractError> {
        let file = File::open(&self.path)?;
        debug!(source = %self.name, "Opened JSONL pass");
        Ok(Box::new(JsonlRecords {
            source_name: &self.name,
            lines: BufReader::new(file).lines(),
            line: 0,
        }))
    }
}

struct JsonlRecords<'a> {
    source_name: &'a str,
    lines: Lines<BufReader<File>>,
    line: u64,
}

impl Iterator for JsonlRecords<'_> {
    type Item = Result<Record, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }

            return Some(decode_line(line).map_err(|e| {
                ContractError::record_decode(self.source_name, self.line, e.to_string())
            }));
        }
    }
}

fn decode_line(line: String) -> Result<Record, serde_json::Error> {
    let raw = RawValue::from_string(line)?;
    let record: Record = serde_json::from_str(raw.get())?;
    Ok(record.with_raw(raw))
}

/// JSONL sink
///
/// Writes into `<path>.partial` and moves it onto `path` on `close`, so the
/// final path only ever holds a complete log. A sink dropped without
/// `close` removes its partial file.
#[derive(Debug)]
pub struct JsonlSink {
    name: String,
    path: PathBuf,
    partial_path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl JsonlSink {
    /// Create the sink for `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();
        let partial_path = partial_path_for(&path);
        let file = File::create(&partial_path)?;

        debug!(path = %path.display(), partial = %partial_path.display(), "JSONL sink created");

        Ok(Self {
            name: path.display().to_string(),
            path,
            partial_path,
            writer: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// Records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Sync the partial file and move it onto the final path
    fn finish(&self, writer: BufWriter<File>) -> Result<(), ContractError> {
        let file = writer
            .into_inner()
            .map_err(|e| ContractError::sink_write(&self.name, e.error().to_string()))?;
        file.sync_all()?;
        drop(file);
        fs::rename(&self.partial_path, &self.path)?;
        Ok(())
    }
}

impl LogSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, record: &Record) -> Result<(), ContractError> {
        let Self {
            name,
            writer,
            written,
            ..
        } = self;
        let writer = writer.as_mut().ok_or_else(|| ContractError::SinkClosed {
            sink_name: name.clone(),
        })?;

        match record.raw() {
            Some(raw) => writer
                .write_all(raw.get().as_bytes())
                .map_err(|e| ContractError::sink_write(name.as_str(), e.to_string()))?,
            None => serde_json::to_writer(&mut *writer, record).map_err(|e| {
                ContractError::RecordEncode {
                    channel: record.channel.clone(),
                    message: e.to_string(),
                }
            })?,
        }
        writer
            .write_all(b"\n")
            .map_err(|e| ContractError::sink_write(name.as_str(), e.to_string()))?;
        *written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        }
        Ok(())
    }

    #[instrument(name = "jsonl_sink_close", skip(self), fields(sink = %self.name))]
    fn close(&mut self) -> Result<(), ContractError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };

        if let Err(e) = self.finish(writer) {
            warn!(error = %e, "JSONL sink close failed, discarding output");
            let _ = fs::remove_file(&self.partial_path);
            return Err(e);
        }

        debug!(records = self.written, "JSONL sink closed");
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            warn!(sink = %self.name, "JSONL sink dropped before close, discarding output");
            let _ = fs::remove_file(&self.partial_path);
        }
    }
}

fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}
