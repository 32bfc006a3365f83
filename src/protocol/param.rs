//! Key/value parameters

use std::fmt;

use super::{Config, DEFAULT_MAX_KEY_LEN, DEFAULT_MAX_VALUE_LEN};

/// A single `key=value` parameter.
///
/// Construction helpers truncate silently at the configured bounds; the live
/// parser instead aborts the message when a field overflows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    /// Parameter key
    pub key: String,
    /// Parameter value
    pub value: String,
}

impl Param {
    /// Create a parameter, truncating at the default key/value bounds.
    #[must_use]
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: truncated(key, DEFAULT_MAX_KEY_LEN),
            value: truncated(value, DEFAULT_MAX_VALUE_LEN),
        }
    }

    /// Create a parameter, truncating at the bounds of `config`.
    #[must_use]
    pub fn bounded(key: &str, value: &str, config: &Config) -> Self {
        Self {
            key: truncated(key, config.max_key_len),
            value: truncated(value, config.max_value_len),
        }
    }

    /// Pre-sized empty parameter slot for the parser arena.
    pub(crate) fn with_capacity(key_cap: usize, value_cap: usize) -> Self {
        Self {
            key: String::with_capacity(key_cap),
            value: String::with_capacity(value_cap),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

fn truncated(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
