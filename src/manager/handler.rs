//! Handler registry and dispatch
//!
//! Application logic plugs in as [`CommandHandler`] implementations. The
//! registry keeps the built-in debug toggle at priority zero, followed by the
//! user-supplied handlers in registration order; dispatch is a linear scan,
//! which is all a handful of handlers on a device link ever needs.

use tracing::{debug, trace};

use crate::protocol::{Frame, FrameKind, FrameWriter, Param, Result};
use crate::transport::Link;

/// Reserved command token claimed by the built-in debug toggle.
pub const DEBUG_COMMAND: &str = "DEBUG";

/// A unit of application logic bound to one or more command tokens.
pub trait CommandHandler {
    /// Command tokens this handler claims (case-sensitive exact match).
    fn supported_commands(&self) -> &[&str];

    /// Process a completed message.
    ///
    /// Returns `true` when the message was fully handled; `false` lets the
    /// scan continue to later handlers and, ultimately, the fallback.
    fn handle(&mut self, reply: &mut Reply<'_>, frame: &Frame<'_>) -> bool;
}

/// Send surface handed to handlers during dispatch.
///
/// Borrows the manager's formatter, link, and debug flag for the duration of
/// one `handle` call, so handlers can reply without owning the manager.
pub struct Reply<'a> {
    pub(crate) writer: &'a mut FrameWriter,
    pub(crate) link: &'a mut dyn Link,
    pub(crate) debug: &'a mut bool,
}

impl Reply<'_> {
    /// Write a command frame.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_command(
        &mut self,
        header: &str,
        message: &str,
        identifier: &str,
        params: &[Param],
    ) -> Result<()> {
        self.writer
            .command_frame(&mut *self.link, header, message, identifier, params)
    }

    /// Write a `DEBUG` frame; suppressed while debug mode is off.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_debug(&mut self, text: &str, identifier: &str) -> Result<()> {
        if !*self.debug {
            return Ok(());
        }
        self.writer
            .message_frame(&mut *self.link, FrameKind::Debug, text, identifier)
    }

    /// Write an `ERR` frame; always emitted.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_error(&mut self, text: &str, identifier: &str) -> Result<()> {
        self.writer
            .message_frame(&mut *self.link, FrameKind::Error, text, identifier)
    }

    /// Current debug-mode state.
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        *self.debug
    }

    /// Switch debug mode on or off.
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        *self.debug = enabled;
    }
}

/// Built-in handler for the reserved `DEBUG` command.
///
/// `DEBUG;` reports the current state; `DEBUG:ON;` / `DEBUG:OFF;` set it.
/// Always replies with the resulting state.
#[derive(Debug, Default)]
pub(crate) struct DebugToggle;

impl CommandHandler for DebugToggle {
    fn supported_commands(&self) -> &[&str] {
        &[DEBUG_COMMAND]
    }

    fn handle(&mut self, reply: &mut Reply<'_>, frame: &Frame<'_>) -> bool {
        if frame.param_count() == 1 {
            let param = &frame.params()[0];
            // `DEBUG:ON` parses as a bare key; `DEBUG:mode=on` as a value.
            let token = if param.value.is_empty() {
                &param.key
            } else {
                &param.value
            };
            reply.set_debug_enabled(token.trim().eq_ignore_ascii_case("ON"));
        }

        let state = if reply.debug_enabled() { "ON" } else { "OFF" };
        if let Err(err) = reply.send_command(DEBUG_COMMAND, state, "", &[]) {
            debug!(error = ?err, "failed to send debug-state reply");
        }
        true
    }
}

/// Ordered handler set with the built-in toggle pinned first.
pub(crate) struct Registry {
    builtin: DebugToggle,
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            builtin: DebugToggle,
            handlers: Vec::new(),
        }
    }

    /// Replace the user-supplied handler set atomically.
    pub(crate) fn replace(&mut self, handlers: Vec<Box<dyn CommandHandler>>) {
        self.handlers = handlers;
    }

    /// Scan handlers in priority order; `true` if one claimed the frame.
    pub(crate) fn dispatch(&mut self, reply: &mut Reply<'_>, frame: &Frame<'_>) -> bool {
        let command = frame.command();

        // Internal handlers outrank user handlers, so the reserved token
        // cannot be shadowed.
        if claims(&self.builtin, command) && self.builtin.handle(reply, frame) {
            return true;
        }

        for handler in &mut self.handlers {
            if claims(handler.as_ref(), command) {
                trace!(command, "handler claimed command");
                if handler.handle(reply, frame) {
                    return true;
                }
            }
        }

        false
    }
}

fn claims(handler: &dyn CommandHandler, command: &str) -> bool {
    handler.supported_commands().iter().any(|c| *c == command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Config, FrameParser, Step};
    use crate::transport::MemoryLink;

    fn parse(parser: &mut FrameParser, wire: &[u8]) {
        for &b in wire {
            if parser.consume(b).unwrap() == Step::Complete {
                return;
            }
        }
        panic!("wire input did not complete a frame");
    }

    struct Recorder {
        tokens: &'static [&'static str],
        calls: usize,
    }

    impl CommandHandler for Recorder {
        fn supported_commands(&self) -> &[&str] {
            self.tokens
        }

        fn handle(&mut self, _reply: &mut Reply<'_>, _frame: &Frame<'_>) -> bool {
            self.calls += 1;
            true
        }
    }

    #[test]
    fn test_debug_toggle_on_off() {
        let config = Config::default();
        let mut parser = FrameParser::new(&config);
        let mut writer = FrameWriter::new(&config);
        let mut link = MemoryLink::new();
        let mut debug = false;
        let mut toggle = DebugToggle;

        parse(&mut parser, b"DEBUG:ON;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        assert!(toggle.handle(&mut reply, &frame));
        assert!(debug);
        assert_eq!(link.take_output(), b"DEBUG:ON;");

        parse(&mut parser, b"DEBUG:OFF;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        toggle.handle(&mut reply, &frame);
        assert!(!debug);
        assert_eq!(link.take_output(), b"DEBUG:OFF;");
    }

    #[test]
    fn test_debug_query_reports_state() {
        let config = Config::default();
        let mut parser = FrameParser::new(&config);
        let mut writer = FrameWriter::new(&config);
        let mut link = MemoryLink::new();
        let mut debug = false;
        let mut toggle = DebugToggle;

        parse(&mut parser, b"DEBUG;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        toggle.handle(&mut reply, &frame);

        assert!(!debug);
        assert_eq!(link.take_output(), b"DEBUG:OFF;");
    }

    #[test]
    fn test_value_preferred_over_key() {
        let config = Config::default();
        let mut parser = FrameParser::new(&config);
        let mut writer = FrameWriter::new(&config);
        let mut link = MemoryLink::new();
        let mut debug = false;

        parse(&mut parser, b"DEBUG:mode=on;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        DebugToggle.handle(&mut reply, &frame);
        assert!(debug);
    }

    #[test]
    fn test_builtin_outranks_user_handler() {
        let config = Config::default();
        let mut parser = FrameParser::new(&config);
        let mut writer = FrameWriter::new(&config);
        let mut link = MemoryLink::new();
        let mut debug = false;
        let mut registry = Registry::new();
        registry.replace(vec![Box::new(Recorder {
            tokens: &[DEBUG_COMMAND],
            calls: 0,
        })]);

        parse(&mut parser, b"DEBUG:ON;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        assert!(registry.dispatch(&mut reply, &frame));

        // The built-in answered; the shadowing user handler never ran.
        assert!(debug);
        assert_eq!(link.take_output(), b"DEBUG:ON;");
    }

    #[test]
    fn test_unclaimed_command_reported() {
        let config = Config::default();
        let mut parser = FrameParser::new(&config);
        let mut writer = FrameWriter::new(&config);
        let mut link = MemoryLink::new();
        let mut debug = false;
        let mut registry = Registry::new();

        parse(&mut parser, b"NOPE;");
        let frame = parser.frame();
        let mut reply = Reply {
            writer: &mut writer,
            link: &mut link,
            debug: &mut debug,
        };
        assert!(!registry.dispatch(&mut reply, &frame));
    }
}
