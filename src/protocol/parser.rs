//! Incremental frame parser
//!
//! A resumable state machine advanced one byte at a time by an explicit
//! [`FrameParser::consume`] call. State and partial buffers persist across
//! polling calls, so bytes may arrive a few at a time over many calls and
//! the parser picks up exactly where it left off.
//!
//! All buffers are pre-sized from the [`Config`] at construction; steady-state
//! parsing performs no allocation.

use tracing::{debug, trace};

use super::{Config, Error, Field, Frame, Param, Result};

/// Where the parser is inside the current message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between messages
    Idle,
    /// Accumulating the command token
    Command,
    /// Accumulating a parameter key
    ParamKey,
    /// Accumulating a parameter value
    ParamValue,
}

/// Outcome of consuming one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Message still in progress
    Pending,
    /// Terminator seen; the completed frame is readable until the next message starts
    Complete,
}

/// Incremental parser for the line-delimited command grammar.
#[derive(Debug)]
pub struct FrameParser {
    state: State,

    terminator: u8,
    command_separator: u8,
    param_separator: u8,
    max_message_len: usize,
    max_command_len: usize,
    max_params: usize,
    max_key_len: usize,
    max_value_len: usize,

    /// Exact received text, terminator included
    raw: String,
    raw_budget: usize,
    /// Command-scope accumulation (text before the first separator)
    text: String,
    text_chars: usize,
    /// Trimmed command token range within `text`
    cmd_start: usize,
    cmd_end: usize,

    /// Fixed arena of parameter slots; `param_count` of them are live
    params: Vec<Param>,
    param_count: usize,
    key_chars: usize,
    value_chars: usize,
    /// Set while dropping a parameter past the capacity limit
    discarding: bool,

    timed_out: bool,
}

impl FrameParser {
    /// Create a parser with buffers pre-sized from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        // Raw records the whole message including parameters, so its budget is
        // the command-scope bound plus the worst-case parameter payload.
        let raw_budget = config.max_message_len
            + config.max_params * (config.max_key_len + config.max_value_len + 2)
            + 8;

        let params = (0..config.max_params)
            .map(|_| Param::with_capacity(config.max_key_len, config.max_value_len))
            .collect();

        Self {
            state: State::Idle,
            terminator: config.terminator,
            command_separator: config.command_separator,
            param_separator: config.param_separator,
            max_message_len: config.max_message_len,
            max_command_len: config.max_command_len,
            max_params: config.max_params,
            max_key_len: config.max_key_len,
            max_value_len: config.max_value_len,
            raw: String::with_capacity(raw_budget + 4),
            raw_budget,
            text: String::with_capacity(config.max_message_len + 8),
            text_chars: 0,
            cmd_start: 0,
            cmd_end: 0,
            params,
            param_count: 0,
            key_chars: 0,
            value_chars: 0,
            discarding: false,
            timed_out: false,
        }
    }

    /// Consume one input byte and advance the state machine.
    ///
    /// Never blocks. Returns [`Step::Complete`] when the terminator closes a
    /// message; the frame is then readable via [`FrameParser::frame`] until
    /// the next message starts.
    ///
    /// # Errors
    ///
    /// A bound violation ([`Error::FieldOverflow`], [`Error::MessageTooLong`])
    /// aborts the in-progress message: the parser resets to idle and the
    /// partial message is discarded. The caller decides how to report it.
    pub fn consume(&mut self, byte: u8) -> Result<Step> {
        if self.state == State::Idle {
            self.begin_message();
        }

        // The raw record always comes first, bounded by its own budget.
        if self.raw.len() < self.raw_budget {
            self.raw.push(byte as char);
        }

        if byte == self.terminator {
            return match self.finalize() {
                Ok(()) => {
                    trace!(
                        command = &self.text[self.cmd_start..self.cmd_end],
                        params = self.param_count,
                        "frame complete"
                    );
                    self.state = State::Idle;
                    Ok(Step::Complete)
                }
                Err(err) => {
                    self.abort(&err);
                    Err(err)
                }
            };
        }

        if byte == self.command_separator {
            self.open_param();
            return Ok(Step::Pending);
        }

        if byte == self.param_separator {
            // Key -> value transition. Anywhere else (inside the command or a
            // value, or while discarding) the byte is consumed and dropped.
            if self.state == State::ParamKey && !self.discarding {
                self.state = State::ParamValue;
            }
            return Ok(Step::Pending);
        }

        match self.state {
            State::Command => {
                self.text.push(byte as char);
                self.text_chars += 1;
                if self.text_chars > self.max_message_len {
                    let err = Error::MessageTooLong {
                        len: self.text_chars,
                        max: self.max_message_len,
                    };
                    self.abort(&err);
                    return Err(err);
                }
            }
            State::ParamKey if !self.discarding => {
                if self.key_chars >= self.max_key_len {
                    let err = Error::FieldOverflow {
                        field: Field::ParamKey,
                        len: self.key_chars + 1,
                        max: self.max_key_len,
                    };
                    self.abort(&err);
                    return Err(err);
                }
                self.params[self.param_count - 1].key.push(byte as char);
                self.key_chars += 1;
            }
            State::ParamValue if !self.discarding => {
                if self.value_chars >= self.max_value_len {
                    let err = Error::FieldOverflow {
                        field: Field::ParamValue,
                        len: self.value_chars + 1,
                        max: self.max_value_len,
                    };
                    self.abort(&err);
                    return Err(err);
                }
                self.params[self.param_count - 1].value.push(byte as char);
                self.value_chars += 1;
            }
            // Discarded overflow parameter, or idle cannot be reached here
            _ => {}
        }

        Ok(Step::Pending)
    }

    /// Whether a message is currently in progress.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.state != State::Idle
    }

    /// Whether the last in-progress message was discarded by a timeout.
    /// Cleared when the next message starts.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Discard the in-progress message after an inter-byte timeout.
    pub fn mark_timed_out(&mut self) {
        self.timed_out = true;
        self.state = State::Idle;
        self.discarding = false;
    }

    /// Reset to idle, dropping any in-progress message.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.discarding = false;
    }

    /// The most recently completed command token.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.text[self.cmd_start..self.cmd_end]
    }

    /// Parameters of the most recently completed message.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params[..self.param_count]
    }

    /// Exact text of the most recently completed message, terminator included.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Borrowed view of the most recently completed frame.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        Frame::new(self.command(), self.params(), self.raw())
    }

    fn begin_message(&mut self) {
        self.raw.clear();
        self.text.clear();
        self.text_chars = 0;
        self.cmd_start = 0;
        self.cmd_end = 0;
        self.param_count = 0;
        self.key_chars = 0;
        self.value_chars = 0;
        self.discarding = false;
        self.timed_out = false;
        self.state = State::Command;
    }

    fn open_param(&mut self) {
        if self.param_count < self.max_params {
            self.params[self.param_count].clear();
            self.param_count += 1;
            self.discarding = false;
        } else {
            // Capacity reached: the separator is consumed but no slot opens,
            // and every byte of the overflow parameter is dropped.
            trace!(max = self.max_params, "parameter capacity reached; dropping overflow parameter");
            self.discarding = true;
        }
        self.key_chars = 0;
        self.value_chars = 0;
        self.state = State::ParamKey;
    }

    /// Resolve the command token from the accumulated scope text.
    fn finalize(&mut self) -> Result<()> {
        let text = self.text.as_str();
        let start = text.len() - text.trim_start().len();
        let mut end = text.trim_end().len().max(start);

        // A sender that doubles the terminator leaves one embedded in the
        // scope text; strip it before locating the separator.
        if text[start..end].ends_with(self.terminator as char) {
            end -= 1;
        }

        let cmd_end = match text[start..end].find(self.command_separator as char) {
            Some(offset) => start + offset,
            None => end,
        };
        let cmd_end = start + text[start..cmd_end].trim_end().len();

        let token_chars = text[start..cmd_end].chars().count();
        if token_chars > self.max_command_len {
            return Err(Error::FieldOverflow {
                field: Field::Command,
                len: token_chars,
                max: self.max_command_len,
            });
        }

        self.cmd_start = start;
        self.cmd_end = cmd_end;
        Ok(())
    }

    fn abort(&mut self, err: &Error) {
        debug!(%err, "aborting in-progress message");
        self.state = State::Idle;
        self.discarding = false;
    }
}
