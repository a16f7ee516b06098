//! Error types for the patch engine.

use thiserror::Error;

/// Result alias used across the crate.
pub type GraftResult<T> = Result<T, GraftError>;

/// Errors surfaced by the patch engine.
///
/// The deep accessors are total and the operations cannot fail once their
/// expressions parse, so the expression boundary is the only failure
/// surface. Non-numeric `inc`/`dec` targets and shape-mismatched writes
/// are documented skips, not errors.
#[derive(Debug, Error)]
pub enum GraftError {
    /// A match expression failed to parse.
    #[error("invalid path expression: {0}")]
    Expression(#[from] graft_match::MatchError),
}
