//! sercmd - Line-delimited command protocol core for serial device links
//!
//! An incremental parser, handler dispatcher, and frame formatter for the
//! `COMMAND:key=value:key=value;` text grammar used on microcontroller
//! command links. Built for a single polling loop: bytes may arrive a few at
//! a time across many calls, fixed-capacity buffers never overflow, and
//! malformed or stalled input always recovers to a clean idle state.
//!
//! # Quick Start
//!
//! ```rust
//! use sercmd::{CommandHandler, CommandManager, Config, Frame, MemoryLink, Reply};
//!
//! struct Motor;
//!
//! impl CommandHandler for Motor {
//!     fn supported_commands(&self) -> &[&str] {
//!         &["MOVE"]
//!     }
//!
//!     fn handle(&mut self, reply: &mut Reply<'_>, frame: &Frame<'_>) -> bool {
//!         let _direction = frame.get("dir").unwrap_or("stop");
//!         let _ = reply.send_ack_ok(frame.command(), &[]);
//!         true
//!     }
//! }
//!
//! let mut manager = CommandManager::new(MemoryLink::new(), Config::default())?;
//! manager.register_handlers(vec![Box::new(Motor)]);
//!
//! // The control loop offers newly arrived bytes; here they come at once.
//! manager.link_mut().push_incoming(b"MOVE:dir=left;");
//! manager.read_commands()?;
//! assert_eq!(manager.link_mut().take_output(), b"ACK:MOVE=ok;");
//! # Ok::<(), sercmd::Error>(())
//! ```
//!
//! # Features
//!
//! - **Resumable parsing** - a state machine advanced one byte per call, never
//!   a blocking read
//! - **Bounded everything** - command, keys, values, and the message itself
//!   have fixed limits; overflow aborts the message, not the process
//! - **Built-in `DEBUG` toggle** - `DEBUG:ON;` / `DEBUG:OFF;` gate diagnostic
//!   frames, always answered ahead of user handlers
//! - **Transport-agnostic** - anything with `available()/read()/write()`
//!   semantics plugs in via the [`Link`] trait

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod manager;
pub mod protocol;
pub mod transport;

pub use manager::{CommandHandler, CommandManager, DEBUG_COMMAND, Reply};
pub use protocol::{Config, Error, Field, Frame, FrameParser, Param, Result, Step};
pub use transport::{Clock, Link, ManualClock, MemoryLink, MonotonicClock};
