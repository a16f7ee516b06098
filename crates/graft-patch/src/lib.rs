//! Structural JSON editing: pure, path-addressed patch operations over
//! `serde_json` values.
//!
//! Locations are addressed two ways: concrete [`Path`]s (object keys and
//! array indices), consumed by the deep primitives [`get_deep`],
//! [`set_deep`], and [`unset_deep`]; and match expressions (the
//! `graft-match` grammar), resolved by [`match_entries`] into concrete
//! paths with captured values.
//!
//! On top of those sit six operations keyed by expressions: [`set`],
//! [`set_if_missing`], [`unset`], [`insert`], [`inc`], and [`dec`], plus a
//! serializable [`Patch`] that bundles operations and applies them in
//! sequence. Nothing mutates its input; every operation returns a new
//! document.
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"employees": [
//!     {"name": "ada", "wage": 100},
//!     {"name": "gus", "wage": 90001},
//! ]});
//!
//! // Replace every employee over 50000; the write lands at the match.
//! let out = graft_patch::set(&doc, [("employees[wage > 50000]", json!({"bonus": true}))])
//!     .unwrap();
//! assert_eq!(
//!     out,
//!     json!({"employees": [
//!         {"name": "ada", "wage": 100},
//!         {"bonus": true},
//!     ]})
//! );
//! ```

mod deep;
mod error;
mod matching;
mod ops;
mod patch;
mod path;

pub use deep::{get_deep, set_deep, unset_deep};
pub use error::{GraftError, GraftResult};
pub use graft_match::{Expr, MatchError};
pub use matching::{match_entries, MatchEntry};
pub use ops::{dec, inc, insert, set, set_if_missing, unset, InsertPosition, Number};
pub use patch::{apply_patch, Anchor, InsertOp, Op, Patch};
pub use path::{ParsePathError, Path, Seg};

pub use serde_json::Value;
