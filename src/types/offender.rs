use serde::Serialize;
use std::fmt::Display;

/// A line/column pair inside the analyzed stylesheet. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Line number
    pub line: usize,
    /// Column number
    pub column: usize,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where an offender starts in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start of the offending code
    pub start: Position,
}

/// A single violation of a metric's rule, as produced by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Offender {
    /// Human-readable description
    pub message: String,
    /// Source position, if the analyzer knows it
    pub position: Option<Span>,
}

impl Offender {
    /// Create an offender which points at `start`
    pub fn new<S: Into<String>>(message: S, start: Position) -> Self {
        Self {
            message: message.into(),
            position: Some(Span { start }),
        }
    }

    /// Create an offender without position data
    pub fn unpositioned<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }
}

/// The flat, single-line form used in reports:
/// `message` or `message @ line:column`.
impl Display for Offender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(Span { start }) => write!(f, "{} @ {start}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
