//! Record - one entry of a recorded log
//!
//! A record is a `(channel, payload, arrival_time)` triple. The payload is a
//! tagged variant so the time-adjustable shapes are known statically.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::Timestamp;

/// Log record
///
/// Constructed by a `LogSource` per iteration, handed to a `LogSink` after
/// (optional) correction.
///
/// A record decoded from a text container may carry its verbatim encoding.
/// Sinks write that encoding back as is, so a record that was not modified
/// leaves the container byte for byte identical. Any change to `payload`
/// must go through [`Record::discard_raw`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Channel (topic) name, e.g. `/hose/scan` or `/tf`
    pub channel: String,

    /// Capture-clock arrival time - preserved on rewrite
    pub arrival_time: Timestamp,

    /// Message payload
    pub payload: Payload,

    /// Top-level keys outside the model, re-encoded unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    raw: Option<Box<RawValue>>,
}

impl Record {
    /// Create a record
    pub fn new(channel: impl Into<String>, arrival_time: Timestamp, payload: Payload) -> Self {
        Self {
            channel: channel.into(),
            arrival_time,
            payload,
            extra: Map::new(),
            raw: None,
        }
    }

    /// Attach the verbatim encoding this record was decoded from
    pub fn with_raw(mut self, raw: Box<RawValue>) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Verbatim encoding, if the record is unchanged since decoding
    pub fn raw(&self) -> Option<&RawValue> {
        self.raw.as_deref()
    }

    /// Forget the verbatim encoding; the record is re-encoded from its fields
    pub fn discard_raw(&mut self) {
        self.raw = None;
    }
}

/// Equality of the decoded content; the verbatim encoding is ignored
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.channel == other.channel
            && self.arrival_time == other.arrival_time
            && self.payload == other.payload
            && self.extra == other.extra
    }
}

/// Message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Multi-transform message (the transform channel)
    Transforms { transforms: Vec<TransformStamped> },

    /// Message with a single header stamp
    Stamped {
        header: Header,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        body: Value,
    },

    /// Message without any header; never adjustable
    Unstamped {
        #[serde(default, skip_serializing_if = "Value::is_null")]
        body: Value,
    },
}

/// Payload shape, for logging and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Transforms,
    Stamped,
    Unstamped,
}

impl Payload {
    /// Shape of this payload
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Transforms { .. } => PayloadKind::Transforms,
            Payload::Stamped { .. } => PayloadKind::Stamped,
            Payload::Unstamped { .. } => PayloadKind::Unstamped,
        }
    }

    /// The single embedded header stamp, if this payload has one.
    ///
    /// Multi-transform payloads carry one stamp per sub-transform and
    /// therefore return `None`.
    pub fn header_stamp(&self) -> Option<Timestamp> {
        match self {
            Payload::Stamped { header, .. } => Some(header.stamp),
            _ => None,
        }
    }

    /// Sub-transforms, if this is a multi-transform payload
    pub fn transforms(&self) -> Option<&[TransformStamped]> {
        match self {
            Payload::Transforms { transforms } => Some(transforms),
            _ => None,
        }
    }

    /// Stamped payload with an empty body
    pub fn stamped(stamp: Timestamp) -> Self {
        Payload::Stamped {
            header: Header::at(stamp),
            body: Value::Null,
        }
    }
}

/// Message header
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Embedded payload timestamp
    pub stamp: Timestamp,

    /// Coordinate frame of the data
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub frame_id: String,

    /// Other header fields (`seq`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header with only a stamp
    pub fn at(stamp: Timestamp) -> Self {
        Self {
            stamp,
            ..Self::default()
        }
    }
}

/// One stamped transform of a multi-transform message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    /// Header (stamp + parent frame)
    pub header: Header,

    /// Child frame; classified on the transform channel
    pub child_frame_id: String,

    /// Rigid transform parent -> child
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransformStamped {
    /// Identity transform for `child_frame_id` at `stamp`
    pub fn identity(child_frame_id: impl Into<String>, stamp: Timestamp) -> Self {
        Self {
            header: Header::at(stamp),
            child_frame_id: child_frame_id.into(),
            transform: Some(Transform::default()),
            extra: Map::new(),
        }
    }
}

/// Rigid transform
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}
