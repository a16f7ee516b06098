//! Error type for expression parsing.

use thiserror::Error;

/// Errors produced while parsing a match expression.
///
/// Evaluation itself cannot fail: once an expression parses, applying it to
/// any document is total.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The expression string is malformed.
    #[error("parse error at {pos}: {message}")]
    Parse {
        /// Byte offset into the expression where parsing stopped.
        pos: usize,
        /// Description of what was expected.
        message: String,
    },
}

impl MatchError {
    /// Create a parse error at the given position.
    #[inline]
    pub fn parse(pos: usize, message: impl Into<String>) -> Self {
        MatchError::Parse {
            pos,
            message: message.into(),
        }
    }

    /// Byte offset of the failure in the expression string.
    #[inline]
    pub fn pos(&self) -> usize {
        match self {
            MatchError::Parse { pos, .. } => *pos,
        }
    }
}
