//! Source positions carried by AST nodes
//!
//! The IC front end records a line (and sometimes a column) per node. The
//! backend only reads them back for `--annotate` comments and located errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File, line and column of a node; line 0 means the position is unknown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }

    /// Start of `line` in an unnamed source
    pub fn at_line(line: u32) -> Self {
        Self::new("<input>", line, 1)
    }

    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// First and last position of a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    #[serde(default)]
    pub end: SourceLocation,
}

impl SourceSpan {
    /// Span that starts and ends at `location`
    pub fn at(location: SourceLocation) -> Self {
        Self {
            end: location.clone(),
            start: location,
        }
    }

    pub fn line(line: u32) -> Self {
        Self::at(SourceLocation::at_line(line))
    }

    pub fn line_number(&self) -> u32 {
        self.start.line
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end.line > self.start.line {
            write!(f, "{}:{}-{}", self.start.filename, self.start.line, self.end.line)
        } else {
            write!(f, "{}:{}", self.start.filename, self.start.line)
        }
    }
}
