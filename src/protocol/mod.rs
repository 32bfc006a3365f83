//! sercmd protocol core
//!
//! Wire grammar, incremental frame parsing, and frame formatting.

mod config;
mod error;
mod message;
mod param;
mod parser;
mod writer;

pub use config::Config;
pub use error::{Error, Field, Result};
pub use message::Frame;
pub use param::Param;
pub use parser::{FrameParser, Step};
pub use writer::{FrameKind, FrameWriter};

use std::time::Duration;

/// Default end-of-message byte
pub const DEFAULT_TERMINATOR: u8 = b';';

/// Default command/parameter separator byte
pub const DEFAULT_COMMAND_SEPARATOR: u8 = b':';

/// Default key/value separator byte
pub const DEFAULT_PARAM_SEPARATOR: u8 = b'=';

/// Default inter-byte timeout while a message is in progress
pub const DEFAULT_INTER_BYTE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default maximum accumulated command-scope length
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 128;

/// Default maximum command token length
pub const DEFAULT_MAX_COMMAND_LEN: usize = 20;

/// Default maximum parameters per message
pub const DEFAULT_MAX_PARAMS: usize = 5;

/// Default maximum parameter key length
pub const DEFAULT_MAX_KEY_LEN: usize = 10;

/// Default maximum parameter value length
pub const DEFAULT_MAX_VALUE_LEN: usize = 64;
