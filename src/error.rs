//! Error types for frame stream processing.
//!
//! This module provides the error taxonomy for the etherstream decoder.
//! All errors implement the `std::error::Error` trait and carry enough
//! structured context to log and classify them.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: The byte source failed. Fatal, always surfaced to consumers.
//! - **Truncated Frames**: A captured run was too short to hold a header and check field.
//! - **Ambiguous Length Fields**: The type/length field fell in the undefined `1501..=1535` range.
//! - **Configuration Errors**: Invalid thresholds or an unreadable configuration document.
//!
//! ## Recovery
//!
//! Only transport errors cross the processor boundary. Decode errors are
//! resolved internally by dropping the offending byte run:
//!
//! ```rust
//! use etherstream::StreamError;
//!
//! let error = StreamError::truncated(9, 14);
//! assert!(error.is_recoverable());
//!
//! let error = StreamError::transport("link down");
//! assert!(error.is_fatal());
//! ```

use thiserror::Error;

/// Result type alias for stream operations.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// Main error type for frame stream operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StreamError {
    #[error("Byte source transport failed: {reason}")]
    Transport {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Truncated frame: captured {captured} bytes, need at least {required}")]
    TruncatedFrame { captured: usize, required: usize },

    #[error("Ambiguous type/length field {value} ({value:#06x})")]
    AmbiguousLengthField { value: u16 },

    #[error("Invalid configuration: {details}")]
    Config { details: String },
}

impl StreamError {
    /// Returns whether this error terminates the processor.
    pub fn is_fatal(&self) -> bool {
        match self {
            StreamError::Transport { .. } => true,
            StreamError::TruncatedFrame { .. } => false,
            StreamError::AmbiguousLengthField { .. } => false,
            StreamError::Config { .. } => true,
        }
    }

    /// Returns whether the processor can drop the offending run and keep scanning.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StreamError::TruncatedFrame { .. } | StreamError::AmbiguousLengthField { .. })
    }

    /// Helper constructor for transport errors.
    pub fn transport(reason: impl Into<String>) -> Self {
        StreamError::Transport { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport errors with source.
    pub fn transport_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        StreamError::Transport { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for truncated frame errors.
    pub fn truncated(captured: usize, required: usize) -> Self {
        StreamError::TruncatedFrame { captured, required }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        StreamError::Config { details: details.into() }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Transport { reason: err.to_string(), source: Some(Box::new(err)) }
    }
}

impl From<serde_yaml_ng::Error> for StreamError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        StreamError::Config { details: err.to_string() }
    }
}
