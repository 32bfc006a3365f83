//! Manager configuration
//!
//! All grammar bytes and capacity bounds are fixed at construction; the
//! manager copies the config once and never mutates it.

use std::time::Duration;

use super::{
    DEFAULT_COMMAND_SEPARATOR, DEFAULT_INTER_BYTE_TIMEOUT, DEFAULT_MAX_COMMAND_LEN,
    DEFAULT_MAX_KEY_LEN, DEFAULT_MAX_MESSAGE_LEN, DEFAULT_MAX_PARAMS, DEFAULT_MAX_VALUE_LEN,
    DEFAULT_PARAM_SEPARATOR, DEFAULT_TERMINATOR, Error, Result,
};

/// Wire grammar and capacity configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Byte marking end-of-message.
    pub terminator: u8,
    /// Byte separating the command from parameters, and parameters from each other.
    pub command_separator: u8,
    /// Byte separating a parameter key from its value.
    pub param_separator: u8,
    /// Window after the most recent byte before an in-progress message is discarded.
    pub inter_byte_timeout: Duration,
    /// Maximum accumulated command-scope length.
    pub max_message_len: usize,
    /// Maximum command token length.
    pub max_command_len: usize,
    /// Maximum number of parameters per message.
    pub max_params: usize,
    /// Maximum parameter key length.
    pub max_key_len: usize,
    /// Maximum parameter value length.
    pub max_value_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminator: DEFAULT_TERMINATOR,
            command_separator: DEFAULT_COMMAND_SEPARATOR,
            param_separator: DEFAULT_PARAM_SEPARATOR,
            inter_byte_timeout: DEFAULT_INTER_BYTE_TIMEOUT,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            max_command_len: DEFAULT_MAX_COMMAND_LEN,
            max_params: DEFAULT_MAX_PARAMS,
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if:
    /// - any two of terminator / command separator / param separator collide
    /// - a grammar byte is not printable-range ASCII control or punctuation
    ///   (the grammar is a text protocol; bytes above 0x7F are data)
    /// - any capacity bound is zero
    pub fn validate(&self) -> Result<()> {
        if self.terminator == self.command_separator
            || self.terminator == self.param_separator
            || self.command_separator == self.param_separator
        {
            return Err(Error::InvalidConfig("grammar bytes must be distinct"));
        }

        for byte in [self.terminator, self.command_separator, self.param_separator] {
            if !byte.is_ascii() || byte == 0 {
                return Err(Error::InvalidConfig("grammar bytes must be non-NUL ASCII"));
            }
        }

        if self.max_message_len == 0
            || self.max_command_len == 0
            || self.max_params == 0
            || self.max_key_len == 0
            || self.max_value_len == 0
        {
            return Err(Error::InvalidConfig("capacity bounds must be non-zero"));
        }

        Ok(())
    }
}
