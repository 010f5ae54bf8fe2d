//! GTP (Go Text Protocol) version 2 library.
//!
//! This crate provides types and framing for both sides of the protocol:
//! [`GtpConnection`] for controllers that drive an engine, and
//! [`GtpEngine`] for writing engines.
//!
//! # Protocol
//!
//! - A command is one line: `[id] verb arg1 arg2 ...`
//! - A response is `=` (success) or `?` (failure), optionally the echoed
//!   id, then the payload; it is terminated by an empty line
//! - Anything after `#` on a line is a comment
//!
//! # Required Commands
//!
//! `protocol_version`, `name`, `version`, `known_command`,
//! `list_commands`, `quit`, `boardsize`, `clear_board`, `komi`, `play`,
//! `genmove`, `final_score`, `showboard`, `time_settings`,
//! `fixed_handicap`.

mod command;
mod connection;
mod response;

pub use command::Command;
pub use connection::{GtpConnection, PROTOCOL_VERSION};
pub use response::{clean_line, Response, ResponseFramer, Status, COMMENT_MARKER};

use std::io::{BufRead, Write};
use thiserror::Error;

/// Commands every engine in this workspace understands.
pub const KNOWN_COMMANDS: &[&str] = &[
    "protocol_version",
    "name",
    "version",
    "known_command",
    "list_commands",
    "quit",
    "boardsize",
    "clear_board",
    "komi",
    "play",
    "genmove",
    "final_score",
    "showboard",
    "time_settings",
    "fixed_handicap",
];

#[derive(Error, Debug)]
pub enum GtpError {
    /// The engine answered with a failure response.
    #[error("Engine error: {0}")]
    Engine(String),
    /// The byte stream did not follow GTP framing.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The engine did not report the expected protocol version.
    #[error("Handshake failed: {0}")]
    Handshake(String),
    /// The engine closed its output before finishing a response.
    #[error("Engine closed the connection")]
    Disconnected,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Simple GTP engine wrapper for writing bots.
pub struct GtpEngine<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> GtpEngine<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next command from the controller.
    ///
    /// Blank and comment-only lines are skipped. Returns `None` once the
    /// input is closed.
    pub fn read_command(&mut self) -> Result<Option<Command>, GtpError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            if let Some(command) = Command::parse(&line) {
                return Ok(Some(command));
            }
        }
    }

    /// Send a response to the controller.
    pub fn respond(&mut self, response: &Response) -> Result<(), GtpError> {
        self.writer.write_all(response.to_gtp().as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Send a success response answering `command`.
    pub fn send_success(&mut self, command: &Command, payload: &str) -> Result<(), GtpError> {
        self.respond(&Response::success(payload).with_id(command.id))
    }

    /// Send a failure response answering `command`.
    pub fn send_failure(&mut self, command: &Command, message: &str) -> Result<(), GtpError> {
        self.respond(&Response::failure(message).with_id(command.id))
    }
}

/// Create a GTP engine using stdin/stdout.
pub fn stdio_engine() -> GtpEngine<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    GtpEngine::new(std::io::BufReader::new(std::io::stdin()), std::io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn engine_reads_commands_and_skips_blank_lines() {
        let input = "\n# setup\nboardsize 9\n3 genmove b\n";
        let mut engine = GtpEngine::new(Cursor::new(input), Vec::new());

        let first = engine.read_command().unwrap().unwrap();
        assert_eq!(first.verb, "boardsize");
        assert_eq!(first.args, vec!["9"]);

        let second = engine.read_command().unwrap().unwrap();
        assert_eq!(second.id, Some(3));
        assert_eq!(second.verb, "genmove");

        assert!(engine.read_command().unwrap().is_none());
    }

    #[test]
    fn engine_echoes_ids() {
        let mut engine = GtpEngine::new(Cursor::new(""), Vec::new());
        let mut command = Command::new("name");
        engine.send_success(&command, "random").unwrap();
        command.id = Some(9);
        engine.send_failure(&command, "nope").unwrap();
        let GtpEngine { writer, .. } = engine;
        assert_eq!(String::from_utf8(writer).unwrap(), "= random\n\n?9 nope\n\n");
    }

    #[test]
    fn engine_output_frames_on_controller_side() {
        let mut engine = GtpEngine::new(Cursor::new(""), Vec::new());
        let command = Command::new("showboard");
        engine.send_success(&command, "\n . .\n . .").unwrap();
        let GtpEngine { writer, .. } = engine;

        let mut conn = GtpConnection::new(Cursor::new(writer), Vec::new());
        let response = conn.read_response().unwrap();
        assert_eq!(response.lines, vec![" . .", " . ."]);
    }

    #[test]
    fn known_commands_cover_required_set() {
        for verb in ["protocol_version", "genmove", "final_score", "fixed_handicap"] {
            assert!(KNOWN_COMMANDS.contains(&verb));
        }
    }

    #[test]
    fn error_display() {
        assert_eq!(
            GtpError::Engine("illegal move".to_string()).to_string(),
            "Engine error: illegal move"
        );
        assert_eq!(
            GtpError::Disconnected.to_string(),
            "Engine closed the connection"
        );
    }
}
