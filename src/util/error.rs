//! Error types for timebase conversions.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

/// Main error type for sampler construction and conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The sampler does not define this direction/shape combination
    #[error("Unsupported conversion: {sampler} has no {direction} rule for {shape}")]
    UnsupportedConversion {
        sampler: &'static str,
        direction: &'static str,
        shape: String,
    },

    /// Duration cannot be reduced to whole milliseconds
    #[error("Sub-millisecond precision loss: {0} is not a whole number of milliseconds")]
    SubMillisecondPrecision(Duration),

    /// Event ordinal outside the stored sequence
    #[error("Event ordinal {index} out of range (count: {count})")]
    OutOfRange { index: i64, count: usize },

    /// Sampler parameter violates its invariant
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed sampler configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create an unsupported conversion error.
    pub fn unsupported(sampler: &'static str, direction: &'static str, shape: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            sampler,
            direction,
            shape: shape.into(),
        }
    }
}

/// Result type alias for timebase operations.
pub type Result<T> = std::result::Result<T, Error>;
