//! Error types for bitpress operations.
//!
//! A single error type covers every codec in the workspace: I/O failures from
//! the underlying source or sink, malformed bit streams found while decoding,
//! and misuse of the bit writer's flushing protocol.

use std::io;
use thiserror::Error;

/// The main error type for bitpress operations.
#[derive(Debug, Error)]
pub enum BitpressError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bit stream is structurally inconsistent with its declared parameters.
    #[error("Malformed bit stream at bit {position}: {message}")]
    MalformedBits {
        /// Bit position where the problem was detected.
        position: u64,
        /// Description of the problem.
        message: String,
    },

    /// A physical flush was forced while a partial byte was pending.
    #[error("Protocol violation: flush requested with {pending_bits} pending bits (not a multiple of 8)")]
    ProtocolViolation {
        /// Number of bits waiting in the writer's buffer.
        pending_bits: usize,
    },

    /// A fixed-width or self-delimited field ran past the end of the stream.
    #[error("Unexpected end of stream at bit {position}")]
    UnexpectedEof {
        /// Bit position where the stream ended.
        position: u64,
    },

    /// A configuration value was rejected before any I/O took place.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: u64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// An integer does not fit in the bit width it is written with.
    #[error("Value {value} does not fit in {width} bits")]
    ValueTooWide {
        /// The value that was written.
        value: u64,
        /// The declared field width.
        width: u8,
    },
}

/// Result type alias for bitpress operations.
pub type Result<T> = std::result::Result<T, BitpressError>;

impl BitpressError {
    /// Create a malformed bit stream error.
    pub fn malformed(position: u64, message: impl Into<String>) -> Self {
        Self::MalformedBits {
            position,
            message: message.into(),
        }
    }

    /// Create a protocol violation error.
    pub fn protocol_violation(pending_bits: usize) -> Self {
        Self::ProtocolViolation { pending_bits }
    }

    /// Create an unexpected end-of-stream error.
    pub fn unexpected_eof(position: u64) -> Self {
        Self::UnexpectedEof { position }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, value: u64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Create a value-too-wide error.
    pub fn value_too_wide(value: u64, width: u8) -> Self {
        Self::ValueTooWide { value, width }
    }

    /// Whether this error reports a corrupt input rather than an I/O failure.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedBits { .. } | Self::UnexpectedEof { .. }
        )
    }
}
