//! Error types for the decoder and the trigger handler.

use std::fmt;

use thiserror::Error;

use crate::codec::Shape;
use crate::types::ValueKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TriggerError>;

/// Location inside a document at which a decode error happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "field `{name}`"),
            Self::Index(index) => write!(f, "element {index}"),
            Self::Key(key) => write!(f, "key {key:?}"),
        }
    }
}

/// Failure to coerce a tagged value into its declared shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected {expected}, found {found} value")]
    TypeMismatch { expected: Shape, found: ValueKind },

    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("integer {value} does not fit in {target}")]
    OutOfRange { value: i64, target: &'static str },

    #[error("{segment}: {source}")]
    At {
        segment: PathSegment,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn mismatch(expected: Shape, found: ValueKind) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Wrap this error with the location it was raised at.
    #[must_use]
    pub fn at(self, segment: PathSegment) -> Self {
        Self::At {
            segment,
            source: Box::new(self),
        }
    }

    /// Dotted path to the failing value, e.g. `cash_entries[1].uuid`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut current = self;
        while let Self::At { segment, source } = current {
            match segment {
                PathSegment::Field(name) => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(name);
                }
                PathSegment::Index(index) => path.push_str(&format!("[{index}]")),
                PathSegment::Key(key) => path.push_str(&format!("[{key:?}]")),
            }
            current = source;
        }
        path
    }

    /// The innermost error, stripped of location wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let Self::At { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Errors surfaced by a trigger invocation. None of them are retried locally.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("unexpected content type: {found} (expected {expected})")]
    ContentType { found: String, expected: String },

    #[error("failed to parse document event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to convert event data to record: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to connect to document store: {reason}")]
    Connection { reason: String },

    #[error("failed to create document in {collection}: {reason}")]
    Write { collection: String, reason: String },

    #[error("invocation cancelled")]
    Cancelled,

    #[error("invocation deadline exceeded")]
    DeadlineExceeded,

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
