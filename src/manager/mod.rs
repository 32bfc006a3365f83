//! Command manager
//!
//! Owns the parser, formatter, handler registry, and the link. One control
//! loop calls [`CommandManager::read_commands`] repeatedly; completed
//! messages dispatch inline to the first claiming handler. Exclusive `&mut`
//! access is the concurrency model: exactly one execution context drives the
//! manager, and the borrow checker enforces it.

mod ack;
mod handler;

pub use handler::{CommandHandler, DEBUG_COMMAND, Reply};

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

use crate::protocol::{
    Config, Error, Frame, FrameKind, FrameParser, FrameWriter, Param, Result, Step,
};
use crate::transport::{Clock, Link, MonotonicClock};
use handler::Registry;

/// Identifier attached to manager-originated `ERR` frames.
const COMPONENT: &str = "CommandManager";

/// Identifier attached to the raw-message debug echo.
const RAW_ECHO_TAG: &str = "CommandManager-raw";

type FallbackFn = Box<dyn FnMut(&mut Reply<'_>, &Frame<'_>)>;

/// Incremental parser, dispatcher, and formatter behind one polling surface.
pub struct CommandManager<L: Link> {
    link: L,
    clock: Box<dyn Clock>,
    config: Config,
    parser: FrameParser,
    writer: FrameWriter,
    registry: Registry,
    fallback: Option<FallbackFn>,
    debug: bool,
    last_byte_at: Option<Duration>,
}

impl<L: Link> CommandManager<L> {
    /// Create a manager over `link` with a wall clock.
    ///
    /// All buffers are sized from `config` here; steady-state operation does
    /// not allocate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a rejected configuration.
    pub fn new(link: L, config: Config) -> Result<Self> {
        Self::with_clock(link, config, Box::new(MonotonicClock::new()))
    }

    /// Create a manager with an explicit time source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a rejected configuration.
    pub fn with_clock(link: L, config: Config, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: FrameParser::new(&config),
            writer: FrameWriter::new(&config),
            registry: Registry::new(),
            fallback: None,
            debug: false,
            last_byte_at: None,
            link,
            clock,
            config,
        })
    }

    /// Replace the user handler set atomically.
    ///
    /// The built-in `DEBUG` toggle stays pinned ahead of every user handler.
    pub fn register_handlers(&mut self, handlers: Vec<Box<dyn CommandHandler>>) {
        self.registry.replace(handlers);
    }

    /// Install the notifier invoked when no handler claims a message.
    pub fn set_fallback<F>(&mut self, fallback: F)
    where
        F: FnMut(&mut Reply<'_>, &Frame<'_>) + 'static,
    {
        self.fallback = Some(Box::new(fallback));
    }

    /// Drain available bytes through the parser, dispatching each completed
    /// message inline.
    ///
    /// Returns promptly: work is bounded by `link.available()`. Parse-level
    /// failures (field overflow, oversized message, inter-byte timeout) are
    /// reported on the wire as `ERR` frames and the partial message is
    /// discarded; they never surface here.
    ///
    /// Returns the number of messages dispatched this poll.
    ///
    /// # Errors
    ///
    /// Only link write failures propagate.
    pub fn read_commands(&mut self) -> Result<usize> {
        let mut completed = 0;

        while self.link.available() > 0 {
            let Some(byte) = self.link.read_byte() else {
                break;
            };
            self.last_byte_at = Some(self.clock.now());

            match self.parser.consume(byte) {
                Ok(Step::Pending) => {}
                Ok(Step::Complete) => {
                    self.dispatch()?;
                    completed += 1;
                }
                Err(err) => self.report_parse_error(&err)?,
            }
        }

        // A half-received message only ever clears through this path, so a
        // stalled sender cannot wedge the parser.
        if self.parser.in_progress() {
            if let Some(last) = self.last_byte_at {
                let elapsed = self.clock.now().saturating_sub(last);
                if elapsed > self.config.inter_byte_timeout {
                    let err = Error::Timeout {
                        elapsed_ms: elapsed.as_millis() as u64,
                        timeout_ms: self.config.inter_byte_timeout.as_millis() as u64,
                    };
                    self.parser.mark_timed_out();
                    self.report_parse_error(&err)?;
                }
            }
        }

        Ok(completed)
    }

    /// Write a command frame: `HEADER[:MESSAGE][:KEY=VALUE...][: (ID)]`.
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
            .command_frame(&mut self.link, header, message, identifier, params)
    }

    /// Write a `DEBUG` frame; suppressed while debug mode is off.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_debug(&mut self, text: &str, identifier: &str) -> Result<()> {
        if !self.debug {
            return Ok(());
        }
        self.writer
            .message_frame(&mut self.link, FrameKind::Debug, text, identifier)
    }

    /// Write an `ERR` frame; always emitted.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn send_error(&mut self, text: &str, identifier: &str) -> Result<()> {
        self.writer
            .message_frame(&mut self.link, FrameKind::Error, text, identifier)
    }

    /// Command token of the most recently completed message.
    #[must_use]
    pub fn command(&self) -> &str {
        self.parser.command()
    }

    /// Parameter at `index` from the most recently completed message.
    #[must_use]
    pub fn args(&self, index: usize) -> Option<&Param> {
        self.parser.params().get(index)
    }

    /// Parameter count of the most recently completed message.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.parser.params().len()
    }

    /// Exact text of the most recently completed message, terminator included.
    #[must_use]
    pub fn raw_message(&self) -> &str {
        self.parser.raw()
    }

    /// Whether the last in-progress message was discarded by a timeout.
    /// Clears when the next message starts.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.parser.is_timed_out()
    }

    /// Current debug-mode state.
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Switch debug mode on or off.
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the underlying link.
    #[must_use]
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    fn dispatch(&mut self) -> Result<()> {
        let frame = self.parser.frame();
        trace!(
            command = frame.command(),
            params = frame.param_count(),
            "dispatching frame"
        );

        let mut reply = Reply {
            writer: &mut self.writer,
            link: &mut self.link,
            debug: &mut self.debug,
        };

        // Raw echo onto the debug channel before any handler runs.
        reply.send_debug(frame.raw(), RAW_ECHO_TAG)?;

        if !self.registry.dispatch(&mut reply, &frame) {
            if let Some(fallback) = self.fallback.as_mut() {
                fallback(&mut reply, &frame);
            } else {
                debug!(command = frame.command(), "no handler claimed command");
                reply.send_debug("Unhandled command", frame.command())?;
            }
        }

        Ok(())
    }

    fn report_parse_error(&mut self, err: &Error) -> Result<()> {
        self.writer
            .message_frame(&mut self.link, FrameKind::Error, &err.to_string(), COMPONENT)
    }
}

impl<L: Link> fmt::Debug for CommandManager<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("debug", &self.debug)
            .field("in_progress", &self.parser.in_progress())
            .finish_non_exhaustive()
    }
}
