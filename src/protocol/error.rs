//! sercmd error types

use std::fmt;

use thiserror::Error;

/// Bounded text fields tracked by the frame parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The command token
    Command,
    /// A parameter key
    ParamKey,
    /// A parameter value
    ParamValue,
}

impl Field {
    /// Field name as it appears in `ERR` frames
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::ParamKey => "Param key",
            Self::ParamValue => "Param value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// sercmd protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// A bounded field overflowed while a message was being parsed
    #[error("{field} too long: {len} chars (max {max})")]
    FieldOverflow {
        /// Which field overflowed
        field: Field,
        /// Observed length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// The accumulated message exceeded the configured maximum
    #[error("message too long: {len} chars (max {max})")]
    MessageTooLong {
        /// Observed length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// No byte arrived within the inter-byte window mid-message
    #[error("inter-byte timeout: {elapsed_ms}ms since last byte (window {timeout_ms}ms)")]
    Timeout {
        /// Milliseconds since the last byte
        elapsed_ms: u64,
        /// Configured window
        timeout_ms: u64,
    },

    /// Configuration rejected at construction
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// IO error from the underlying link
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
