//! GTP command representation and parsing.

use crate::response::clean_line;

/// A command sent from controller to engine.
///
/// Serialized as one line: an optional numeric id, the verb, then the
/// arguments, separated by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Optional id echoed back by the engine in its response.
    pub id: Option<u32>,
    /// Command name, e.g. `genmove`.
    pub verb: String,
    /// Arguments in order.
    pub args: Vec<String>,
}

impl Command {
    /// Creates a command without arguments.
    pub fn new(verb: impl Into<String>) -> Self {
        Command {
            id: None,
            verb: verb.into(),
            args: Vec::new(),
        }
    }

    /// Creates a command with the given arguments.
    pub fn with_args<I, S>(verb: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command {
            id: None,
            verb: verb.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Returns the command line without the trailing newline.
    pub fn to_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        if let Some(id) = self.id {
            parts.push(id.to_string());
        }
        parts.push(self.verb.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Parses a line received by an engine.
    ///
    /// Comments and surplus whitespace are removed first. Returns `None` for
    /// lines that are empty afterwards.
    pub fn parse(input: &str) -> Option<Self> {
        let line = clean_line(input);
        let mut parts = line.split_whitespace();
        let mut first = parts.next()?;

        let mut id = None;
        if first.bytes().all(|b| b.is_ascii_digit()) {
            id = first.parse().ok();
            first = parts.next()?;
        }

        Some(Command {
            id,
            verb: first.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_line())
    }
}
