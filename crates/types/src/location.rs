//! Position and location types for diagnostics.

use serde::{Deserialize, Serialize};

/// Position inside a single GraphQL document (1-indexed line and column).
///
/// Columns count characters, not bytes, so positions stay meaningful for
/// documents that contain non-ASCII descriptions or string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            ord => ord,
        }
    }
}

/// Where a raw document starts inside its host source file.
///
/// Extracted documents (a `graphql` template literal inside a component,
/// for example) are parsed on their own, so every position reported by the
/// parser has to be shifted by the literal's base position. Both fields are
/// 0-indexed; a pure `.graphql` file has an offset of `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceOffset {
    /// Line of the literal's first character in the host file (0-indexed)
    pub line: u32,
    /// Column of the literal's first character in the host file (0-indexed)
    pub column: u32,
}

impl SourceOffset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Translate a position inside the document into host-file coordinates.
    ///
    /// The line offset applies to every line. The column offset only applies
    /// to the first line of the document, since later lines start at the
    /// host file's own column 1.
    #[must_use]
    pub const fn apply(self, inner: Position) -> Position {
        let column = if inner.line <= 1 {
            inner.column + self.column
        } else {
            inner.column
        };
        Position {
            line: inner.line + self.line,
            column,
        }
    }
}

/// A located point in a host source file, as surfaced to users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filepath: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Create a new location.
    #[must_use]
    pub fn new(filepath: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            filepath: filepath.into(),
            line,
            column,
        }
    }

    /// Create a location from a resolved [`Position`].
    #[must_use]
    pub fn at(filepath: impl Into<String>, position: Position) -> Self {
        Self::new(filepath, position.line, position.column)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filepath, self.line, self.column)
    }
}
