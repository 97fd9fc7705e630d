//! Recoverable markup parse errors.

use litho_carton::SourceRange;
use serde::Serialize;

/// Error code for a markup parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    EofInTag,
    EofInComment,
    MissingEndTagName,
    /// `</x>` with no matching open element
    UnexpectedEndTag,
}

/// A recoverable parse error. Parsing always produces a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?} at {}..{}", range.start, range.end)]
pub struct ParseError {
    pub code: ErrorCode,
    pub range: SourceRange,
}

impl ParseError {
    pub fn new(code: ErrorCode, range: SourceRange) -> Self {
        Self { code, range }
    }
}
