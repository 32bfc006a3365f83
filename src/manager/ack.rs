//! Acknowledgement formatting
//!
//! Thin templating over [`Reply::send_command`]: handlers acknowledge a
//! command with `ACK:<command>=ok` (or an error text after the `=`), plus any
//! extra key/value pairs.

use super::{CommandManager, Reply};
use crate::protocol::{Param, Result};
use crate::transport::Link;

const ACK_HEADER: &str = "ACK";

impl Reply<'_> {
    /// Acknowledge `command` as completed: `ACK:<command>=ok`.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_ack_ok(&mut self, command: &str, params: &[Param]) -> Result<()> {
        if command.is_empty() {
            return Ok(());
        }
        self.send_command(ACK_HEADER, &format!("{command}=ok"), "", params)
    }

    /// Acknowledge `command` as failed: `ACK:<command>=<error>`.
    ///
    /// An empty `error` falls back to the literal `error`.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_ack_err(&mut self, command: &str, error: &str, params: &[Param]) -> Result<()> {
        if command.is_empty() {
            return Ok(());
        }
        let error = if error.is_empty() { "error" } else { error };
        self.send_command(ACK_HEADER, &format!("{command}={error}"), "", params)
    }
}

impl<L: Link> CommandManager<L> {
    /// Acknowledge `command` as completed: `ACK:<command>=ok`.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_ack_ok(&mut self, command: &str, params: &[Param]) -> Result<()> {
        if command.is_empty() {
            return Ok(());
        }
        self.send_command(ACK_HEADER, &format!("{command}=ok"), "", params)
    }

    /// Acknowledge `command` as failed: `ACK:<command>=<error>`.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_ack_err(&mut self, command: &str, error: &str, params: &[Param]) -> Result<()> {
        if command.is_empty() {
            return Ok(());
        }
        let error = if error.is_empty() { "error" } else { error };
        self.send_command(ACK_HEADER, &format!("{command}={error}"), "", params)
    }
}
