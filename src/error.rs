//! Error types for TOON encoding and decoding.
//!
//! Both directions fail fast and atomically: a failed encode returns no
//! partial text, a failed decode returns no partial value. Decode errors
//! carry the 1-based line the problem was detected on.

use std::fmt;
use thiserror::Error;

/// All errors the codec can produce.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Encode-time: the value lies outside the encodable model
    /// (currently only non-finite numbers).
    #[error("unsupported value: {0}")]
    UnsupportedType(String),

    /// The traversal guard tripped. Owned value trees cannot be cyclic,
    /// so the depth bound is the cycle/stack guard for both directions.
    #[error("nesting depth exceeds the limit of {limit} levels")]
    DepthLimit { limit: usize },

    /// Decode-time: malformed TOON text.
    #[error("format error at line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// Custom error, mainly for serde interop.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported-type error for values the model excludes.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::UnsupportedType(msg.into())
    }

    /// Creates a depth-limit error for the given bound.
    pub fn depth_limit(limit: usize) -> Self {
        Error::DepthLimit { limit }
    }

    /// Creates a format error at a 1-based input line.
    pub fn format(line: usize, msg: impl Into<String>) -> Self {
        Error::Format {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The offending input line for decode errors, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Format { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
