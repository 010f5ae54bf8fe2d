//! GTP response representation and framing.
//!
//! A response is one or more lines terminated by an empty line. The first
//! line starts with `=` for success or `?` for failure, optionally followed
//! by the id of the command it answers.

use crate::GtpError;

/// Marker that starts a comment on any protocol line.
pub const COMMENT_MARKER: char = '#';

/// Removes a trailing comment and normalizes whitespace.
///
/// Every run of whitespace (tabs and carriage returns included) becomes a
/// single space and trailing whitespace is dropped. A leading run is kept as
/// one space so that a response line not starting with a status character
/// is still detected.
pub fn clean_line(raw: &str) -> String {
    let content = match raw.find(COMMENT_MARKER) {
        Some(i) => &raw[..i],
        None => raw,
    };
    let mut line = String::with_capacity(content.len());
    let mut in_space = false;
    for c in content.chars() {
        if c.is_whitespace() {
            if !in_space {
                line.push(' ');
            }
            in_space = true;
        } else {
            line.push(c);
            in_space = false;
        }
    }
    line.truncate(line.trim_end().len());
    line
}

/// Outcome reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    fn marker(self) -> char {
        match self {
            Status::Success => '=',
            Status::Failure => '?',
        }
    }
}

/// A complete engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    /// Id echoed from the command, if the engine sent one.
    pub id: Option<u32>,
    /// Payload lines with the status marker removed. Empty for
    /// acknowledgement-only responses.
    pub lines: Vec<String>,
}

impl Response {
    /// Creates a success response.
    pub fn success(payload: &str) -> Self {
        Response {
            status: Status::Success,
            id: None,
            lines: payload_lines(payload),
        }
    }

    /// Creates a failure response.
    pub fn failure(message: &str) -> Self {
        Response {
            status: Status::Failure,
            id: None,
            lines: payload_lines(message),
        }
    }

    /// Sets the echoed command id.
    pub fn with_id(mut self, id: Option<u32>) -> Self {
        self.id = id;
        self
    }

    /// Classifies cleaned response lines (terminator excluded).
    pub fn from_lines(mut lines: Vec<String>) -> Result<Self, GtpError> {
        let first = match lines.first() {
            Some(first) => first,
            None => {
                return Err(GtpError::MalformedResponse(
                    "empty response".to_string(),
                ))
            }
        };
        let status = match first.chars().next() {
            Some('=') => Status::Success,
            Some('?') => Status::Failure,
            _ => return Err(GtpError::MalformedResponse(lines.join("\n"))),
        };

        let rest = &first[1..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let id = rest[..digits].parse().ok();
        let rest = &rest[digits..];
        let rest = rest.strip_prefix(' ').unwrap_or(rest).to_string();

        if rest.is_empty() {
            lines.remove(0);
        } else {
            lines[0] = rest;
        }
        Ok(Response { status, id, lines })
    }

    /// Returns the payload of a success, or the engine's message as
    /// [`GtpError::Engine`].
    pub fn into_payload(self) -> Result<Vec<String>, GtpError> {
        match self.status {
            Status::Success => Ok(self.lines),
            Status::Failure => Err(GtpError::Engine(self.lines.join("\n"))),
        }
    }

    /// Formats the response for the wire, terminator included.
    pub fn to_gtp(&self) -> String {
        let mut out = String::new();
        out.push(self.status.marker());
        if let Some(id) = self.id {
            out.push_str(&id.to_string());
        }
        if !self.lines.is_empty() {
            out.push(' ');
            out.push_str(&self.lines.join("\n"));
        }
        out.push_str("\n\n");
        out
    }
}

fn payload_lines(payload: &str) -> Vec<String> {
    if payload.is_empty() {
        Vec::new()
    } else {
        payload.lines().map(str::to_string).collect()
    }
}

/// Accumulates raw lines until a response is complete.
///
/// Lines are cleaned as they arrive. The first empty line ends the
/// response; an empty line with nothing before it is a framing error.
#[derive(Debug, Default)]
pub struct ResponseFramer {
    lines: Vec<String>,
}

impl ResponseFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no partial response is buffered.
    pub fn is_idle(&self) -> bool {
        self.lines.is_empty()
    }

    /// Discards any partial response.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Feeds one raw line. Returns the response once its terminator arrives.
    pub fn push_line(&mut self, raw: &str) -> Result<Option<Response>, GtpError> {
        let line = clean_line(raw);
        if !line.is_empty() {
            self.lines.push(line);
            return Ok(None);
        }
        let lines = std::mem::take(&mut self.lines);
        Response::from_lines(lines).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(raw: &[&str]) -> Result<Option<Response>, GtpError> {
        let mut framer = ResponseFramer::new();
        let mut last = Ok(None);
        for line in raw {
            last = framer.push_line(line);
            if !matches!(last, Ok(None)) {
                break;
            }
        }
        last
    }

    #[test]
    fn clean_line_strips_comments_and_whitespace() {
        assert_eq!(clean_line("= D4   # best move\n"), "= D4");
        assert_eq!(clean_line("=\tB+3.5\r\n"), "= B+3.5");
        assert_eq!(clean_line("#only comment\n"), "");
        assert_eq!(clean_line("   \n"), "");
        assert_eq!(clean_line("  = x"), " = x");
    }

    #[test]
    fn success_single_line() {
        let response = frame(&["= GNU Go\n", "\n"]).unwrap().unwrap();
        assert_eq!(response.status, Status::Success);
        assert_eq!(response.lines, vec!["GNU Go"]);
        assert_eq!(response.id, None);
    }

    #[test]
    fn acknowledgement_has_empty_payload() {
        let response = frame(&["=\n", "\n"]).unwrap().unwrap();
        assert!(response.lines.is_empty());
        let response = frame(&["= \n", "\n"]).unwrap().unwrap();
        assert!(response.lines.is_empty());
    }

    #[test]
    fn multi_line_payload() {
        let response = frame(&["= \n", "   A B\n", " 2 . . 2\n", "\n"])
            .unwrap()
            .unwrap();
        assert_eq!(response.lines, vec![" A B", " 2 . . 2"]);
    }

    #[test]
    fn id_is_parsed() {
        let response = frame(&["=42 pass\n", "\n"]).unwrap().unwrap();
        assert_eq!(response.id, Some(42));
        assert_eq!(response.lines, vec!["pass"]);
    }

    #[test]
    fn failure_becomes_engine_error() {
        let response = frame(&["? illegal move\n", "\n"]).unwrap().unwrap();
        assert_eq!(response.status, Status::Failure);
        match response.into_payload() {
            Err(GtpError::Engine(msg)) => assert_eq!(msg, "illegal move"),
            other => panic!("Expected Engine error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_status_is_malformed() {
        assert!(matches!(
            frame(&["bestmove e2e4\n", "\n"]),
            Err(GtpError::MalformedResponse(_))
        ));
        assert!(matches!(
            frame(&[" = D4\n", "\n"]),
            Err(GtpError::MalformedResponse(_))
        ));
    }

    #[test]
    fn terminator_without_lines_is_malformed() {
        assert!(matches!(
            frame(&["\n"]),
            Err(GtpError::MalformedResponse(_))
        ));
    }

    #[test]
    fn framer_is_reusable() {
        let mut framer = ResponseFramer::new();
        assert!(framer.push_line("= a\n").unwrap().is_none());
        assert!(!framer.is_idle());
        assert!(framer.push_line("\n").unwrap().is_some());
        assert!(framer.is_idle());
        assert!(framer.push_line("= b\n").unwrap().is_none());
        let second = framer.push_line("\n").unwrap().unwrap();
        assert_eq!(second.lines, vec!["b"]);
    }

    #[test]
    fn to_gtp_formats() {
        assert_eq!(Response::success("").to_gtp(), "=\n\n");
        assert_eq!(Response::success("D4").to_gtp(), "= D4\n\n");
        assert_eq!(
            Response::failure("unknown command").with_id(Some(3)).to_gtp(),
            "?3 unknown command\n\n"
        );
        assert_eq!(Response::success("a\nb").to_gtp(), "= a\nb\n\n");
    }
}
