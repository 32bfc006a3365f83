//! Outgoing frame formatter
//!
//! Serializes command / debug / error frames back into the wire grammar.
//! Frames are assembled in a reused scratch buffer and handed to the link in
//! a single write, so a frame is never interleaved on the wire.

use bytes::{BufMut, BytesMut};

use super::{Config, Param, Result};
use crate::transport::Link;

/// Fixed message-type tokens for diagnostic frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `DEBUG:` diagnostic frame, gated on debug mode
    Debug,
    /// `ERR:` error frame, always emitted
    Error,
}

impl FrameKind {
    /// Wire token for this frame kind.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Error => "ERR",
        }
    }
}

/// Serializer for outgoing frames.
#[derive(Debug)]
pub struct FrameWriter {
    terminator: u8,
    command_separator: u8,
    param_separator: u8,
    scratch: BytesMut,
}

impl FrameWriter {
    /// Create a writer with a scratch buffer pre-sized from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let budget = config.max_message_len
            + config.max_params * (config.max_key_len + config.max_value_len + 2)
            + 32;
        Self {
            terminator: config.terminator,
            command_separator: config.command_separator,
            param_separator: config.param_separator,
            scratch: BytesMut::with_capacity(budget),
        }
    }

    /// Write a command frame: `HEADER[:MESSAGE][:KEY=VALUE...][: (ID)]` + terminator.
    ///
    /// Trailing terminators are stripped from `message` first. An empty
    /// `header` suppresses the frame entirely.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn command_frame(
        &mut self,
        link: &mut dyn Link,
        header: &str,
        message: &str,
        identifier: &str,
        params: &[Param],
    ) -> Result<()> {
        if header.is_empty() {
            return Ok(());
        }

        let message = message.trim_end_matches(self.terminator as char);

        self.scratch.clear();
        self.scratch.put_slice(header.as_bytes());

        if !message.is_empty() || !params.is_empty() {
            self.scratch.put_u8(self.command_separator);
        }

        if !message.is_empty() {
            self.scratch.put_slice(message.as_bytes());
            if !params.is_empty() {
                self.scratch.put_u8(self.command_separator);
            }
        }

        for (index, param) in params.iter().enumerate() {
            self.scratch.put_slice(param.key.as_bytes());
            self.scratch.put_u8(self.param_separator);
            self.scratch.put_slice(param.value.as_bytes());
            if index + 1 < params.len() {
                self.scratch.put_u8(self.command_separator);
            }
        }

        self.put_identifier(identifier);
        self.scratch.put_u8(self.terminator);

        link.write(&self.scratch)?;
        Ok(())
    }

    /// Write a `DEBUG:`/`ERR:` diagnostic frame.
    ///
    /// Empty `text` suppresses the frame. The terminator is appended unless
    /// `text` already ends with it. Debug-mode gating is the caller's call;
    /// the writer formats unconditionally.
    ///
    /// # Errors
    ///
    /// Propagates link write failures.
    pub fn message_frame(
        &mut self,
        link: &mut dyn Link,
        kind: FrameKind,
        text: &str,
        identifier: &str,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        self.scratch.clear();
        self.scratch.put_slice(kind.token().as_bytes());
        self.scratch.put_u8(b':');
        self.scratch.put_slice(text.as_bytes());
        self.put_identifier(identifier);

        if !text.ends_with(self.terminator as char) {
            self.scratch.put_u8(self.terminator);
        }

        link.write(&self.scratch)?;
        Ok(())
    }

    fn put_identifier(&mut self, identifier: &str) {
        if !identifier.is_empty() {
            self.scratch.put_slice(b": (");
            self.scratch.put_slice(identifier.as_bytes());
            self.scratch.put_slice(b")");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryLink;

    fn output(link: &mut MemoryLink) -> String {
        String::from_utf8(link.take_output()).unwrap()
    }

    #[test]
    fn test_command_frame_with_params() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());
        let params = [Param::new("x", "1"), Param::new("y", "2")];

        writer
            .command_frame(&mut link, "ACK", "MOVE=ok", "", &params)
            .unwrap();
        assert_eq!(output(&mut link), "ACK:MOVE=ok:x=1:y=2;");
    }

    #[test]
    fn test_bare_command_has_no_separator() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer.command_frame(&mut link, "PING", "", "", &[]).unwrap();
        assert_eq!(output(&mut link), "PING;");
    }

    #[test]
    fn test_params_without_message() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .command_frame(&mut link, "CFG", "", "", &[Param::new("baud", "9600")])
            .unwrap();
        assert_eq!(output(&mut link), "CFG:baud=9600;");
    }

    #[test]
    fn test_identifier_suffix() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .command_frame(&mut link, "DEBUG", "ON", "mgr", &[])
            .unwrap();
        assert_eq!(output(&mut link), "DEBUG:ON: (mgr);");
    }

    #[test]
    fn test_trailing_terminators_stripped() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .command_frame(&mut link, "LOG", "hello;;", "", &[])
            .unwrap();
        assert_eq!(output(&mut link), "LOG:hello;");
    }

    #[test]
    fn test_empty_header_suppressed() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer.command_frame(&mut link, "", "text", "", &[]).unwrap();
        assert!(link.output().is_empty());
    }

    #[test]
    fn test_debug_frame_shape() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .message_frame(&mut link, FrameKind::Debug, "hello", "id")
            .unwrap();
        assert_eq!(output(&mut link), "DEBUG:hello: (id);");
    }

    #[test]
    fn test_error_frame_keeps_existing_terminator() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .message_frame(&mut link, FrameKind::Error, "boom;", "")
            .unwrap();
        assert_eq!(output(&mut link), "ERR:boom;");
    }

    #[test]
    fn test_empty_text_suppressed() {
        let mut link = MemoryLink::new();
        let mut writer = FrameWriter::new(&Config::default());

        writer
            .message_frame(&mut link, FrameKind::Error, "", "id")
            .unwrap();
        assert!(link.output().is_empty());
    }
}
