//! Controller side of a GTP session.

use crate::{Command, GtpError, Response, ResponseFramer};
use std::io::{BufRead, Write};

/// Protocol version every engine must report.
pub const PROTOCOL_VERSION: u32 = 2;

/// A synchronous request/response channel to a GTP engine.
///
/// Each call writes one command and reads until the response terminator,
/// so no second command is issued while one is outstanding.
pub struct GtpConnection<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    framer: ResponseFramer,
}

impl<R: BufRead, W: Write> GtpConnection<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            framer: ResponseFramer::new(),
        }
    }

    /// Writes a command line and flushes.
    pub fn send_command(&mut self, command: &Command) -> Result<(), GtpError> {
        writeln!(self.writer, "{}", command.to_line())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads lines until a complete response has been framed.
    ///
    /// # Errors
    ///
    /// [`GtpError::Disconnected`] if the stream ends first, or
    /// [`GtpError::MalformedResponse`] if the response is not framed
    /// correctly.
    pub fn read_response(&mut self) -> Result<Response, GtpError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                self.framer.reset();
                return Err(GtpError::Disconnected);
            }
            if let Some(response) = self.framer.push_line(&line)? {
                return Ok(response);
            }
        }
    }

    /// Sends a command and waits for its response.
    pub fn exchange(&mut self, command: &Command) -> Result<Response, GtpError> {
        self.send_command(command)?;
        self.read_response()
    }

    /// Sends `verb` with `args` and returns the success payload.
    pub fn command(&mut self, verb: &str, args: &[&str]) -> Result<Vec<String>, GtpError> {
        let command = Command::with_args(verb, args.iter().copied());
        self.exchange(&command)?.into_payload()
    }

    /// Checks that the engine speaks protocol version 2.
    pub fn handshake(&mut self) -> Result<(), GtpError> {
        let lines = match self.command("protocol_version", &[]) {
            Ok(lines) => lines,
            Err(GtpError::Engine(msg)) => return Err(GtpError::Handshake(msg)),
            Err(e) => return Err(e),
        };
        match lines.as_slice() {
            [version] if version.trim().parse::<u32>() == Ok(PROTOCOL_VERSION) => Ok(()),
            _ => Err(GtpError::Handshake(format!(
                "expected protocol version {}, got {:?}",
                PROTOCOL_VERSION, lines
            ))),
        }
    }

    /// Returns the underlying reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
