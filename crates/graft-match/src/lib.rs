//! JSONPath-like match expressions, evaluated by marker substitution.
//!
//! An expression addresses a set of locations in a JSON document:
//! attribute chains (`user.name`), wildcards (`items.*`), indices and
//! slices (`arr[0]`, `arr[1:3]`), unions (`name[first, second]`),
//! comparison and existence filters (`employees[wage > 50000]`,
//! `employees[bonus?]`), and recursive descent (`doc..[key == "x"]`).
//!
//! Rather than returning locations directly, [`Expr::evaluate`] returns a
//! copy of the document with a caller-chosen marker value written at each
//! matched location, synthesizing containers for locations the document
//! does not contain yet. Callers recover concrete paths by diffing the
//! marked document against the original.
//!
//! ```
//! use serde_json::json;
//!
//! let expr = graft_match::parse("employees[wage > 50000]").unwrap();
//! let doc = json!({"employees": [{"wage": 100}, {"wage": 90001}]});
//! let marked = expr.evaluate(&doc, &json!("X"));
//! assert_eq!(marked, json!({"employees": [{"wage": 100}, "X"]}));
//! ```

mod ast;
mod error;
mod eval;
mod parser;

pub use ast::Expr;
pub use error::MatchError;

use serde_json::Value;

/// Parses a match expression.
pub fn parse(expression: &str) -> Result<Expr, MatchError> {
    parser::parse_expr(expression)
}

impl Expr {
    /// Returns a copy of `document` with `marker` written at every location
    /// this expression matches. Evaluation never fails.
    pub fn evaluate(&self, document: &Value, marker: &Value) -> Value {
        eval::evaluate_expr(self, document, marker)
    }
}

/// Parses `expression` and evaluates it against `document` in one call.
pub fn evaluate(expression: &str, document: &Value, marker: &Value) -> Result<Value, MatchError> {
    Ok(parse(expression)?.evaluate(document, marker))
}
