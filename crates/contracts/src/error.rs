//! Layered error definitions
//!
//! Categorized by source: config / clock / record / sink

use thiserror::Error;

use crate::Family;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Clock Errors =====
    /// Discovery exhausted the log without a first sample for every family
    #[error("clock not found in '{source_name}' (missing: {})", format_families(.missing))]
    MissingClock {
        source_name: String,
        missing: Vec<Family>,
    },

    /// Shifting a stamp over- or underflowed the timestamp range
    #[error("timestamp overflow while adjusting channel '{channel}'")]
    StampOverflow { channel: String },

    // ===== Record Errors =====
    /// Record could not be decoded from the log container
    #[error("cannot decode record {line} of '{source_name}': {message}")]
    RecordDecode {
        source_name: String,
        line: u64,
        message: String,
    },

    /// Record could not be encoded for the log container
    #[error("cannot encode record on channel '{channel}': {message}")]
    RecordEncode { channel: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    /// Sink used after close
    #[error("sink '{sink_name}' is closed")]
    SinkClosed { sink_name: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_families(families: &[Family]) -> String {
    families
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create missing clock error
    pub fn missing_clock(source_name: impl Into<String>, missing: Vec<Family>) -> Self {
        Self::MissingClock {
            source_name: source_name.into(),
            missing,
        }
    }

    /// Create record decode error
    pub fn record_decode(source_name: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::RecordDecode {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
