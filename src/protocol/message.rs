//! Completed-frame view handed to handlers

use super::Param;

/// A completed, parsed message.
///
/// Borrows the parser's buffers; valid for the duration of one dispatch.
/// Exactly one message is in flight at a time, so there is nothing to queue
/// or clone on the hot path.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    command: &'a str,
    params: &'a [Param],
    raw: &'a str,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(command: &'a str, params: &'a [Param], raw: &'a str) -> Self {
        Self {
            command,
            params,
            raw,
        }
    }

    /// The trimmed command token.
    #[must_use]
    pub fn command(&self) -> &'a str {
        self.command
    }

    /// Parameters in wire order. Never longer than the configured maximum.
    #[must_use]
    pub fn params(&self) -> &'a [Param] {
        self.params
    }

    /// Number of parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Parameter at `index`, if present.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&'a Param> {
        self.params.get(index)
    }

    /// Value of the first parameter whose key matches exactly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// The exact received text, terminator included.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }
}
