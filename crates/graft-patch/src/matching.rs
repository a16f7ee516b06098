//! Match extraction: resolving an expression to concrete paths and the
//! values found there.
//!
//! The evaluator is driven through its marker contract: it returns a copy
//! of the document with a sentinel written at every matched location, and
//! the concrete paths are recovered by diffing that copy against the
//! original. Synthesized locations surface as markers inside subtrees the
//! original does not have, which the diff picks up with a pre-order scan.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::deep::get_deep;
use crate::error::GraftResult;
use crate::path::{Path, Seg};

/// Improbable in user data; never observable by callers.
const DIFF_MARKER: &str = "___graft-diff-marker___";

/// One resolved match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// Concrete location the expression matched.
    pub path: Path,
    /// Value at that location in the document; `None` when the expression
    /// addressed a location the document does not contain yet.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
}

/// Resolves `expression` against `document` into a list of matches.
///
/// Entries come out in document order: array indices ascending, object
/// members in insertion order. The only failure is an expression that
/// does not parse.
///
/// # Examples
///
/// ```
/// use graft_patch::{match_entries, path};
/// use serde_json::json;
///
/// let doc = json!({"name": {"first": "espen", "last": "knut"}});
/// let entries = match_entries(&doc, "name.*").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].path, path!("name", "first"));
/// assert_eq!(entries[0].value, Some(json!("espen")));
/// ```
pub fn match_entries(document: &Value, expression: &str) -> GraftResult<Vec<MatchEntry>> {
    let expr = graft_match::parse(expression)?;
    let marker = Value::String(DIFF_MARKER.to_string());
    let marked = expr.evaluate(document, &marker);

    let mut paths = Vec::new();
    diff(
        Some(document),
        Some(&marked),
        &Path::root(),
        &marker,
        &mut paths,
    );

    let entries: Vec<MatchEntry> = paths
        .into_iter()
        .map(|path| {
            let value = get_deep(document, &path).cloned();
            MatchEntry { path, value }
        })
        .collect();

    trace!(expression, matches = entries.len(), "resolved expression");

    Ok(entries)
}

/// Walks `original` and `marked` together, collecting the path of every
/// marker. Equal subtrees are skipped whole; where the two sides differ in
/// type, the marked side is scanned alone (that is where synthesized
/// containers live).
fn diff(
    original: Option<&Value>,
    marked: Option<&Value>,
    path: &Path,
    marker: &Value,
    out: &mut Vec<Path>,
) {
    if marked.is_some_and(|m| m == marker) {
        out.push(path.clone());
        return;
    }
    if original == marked {
        return;
    }
    if json_type(original) != json_type(marked) {
        if let Some(marked) = marked {
            scan_markers(marked, path, marker, out);
        }
        return;
    }
    match (original, marked) {
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for i in 0..a.len().max(b.len()) {
                diff(
                    a.get(i),
                    b.get(i),
                    &path.with_segment(Seg::Index(i)),
                    marker,
                    out,
                );
            }
        }
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            for (key, value) in a {
                diff(
                    Some(value),
                    b.get(key),
                    &path.with_segment(Seg::key(key.as_str())),
                    marker,
                    out,
                );
            }
            for (key, value) in b {
                if !a.contains_key(key) {
                    diff(
                        None,
                        Some(value),
                        &path.with_segment(Seg::key(key.as_str())),
                        marker,
                        out,
                    );
                }
            }
        }
        // Same type and unequal can only be containers here; scalars
        // differing from the original would have been the marker.
        _ => {}
    }
}

/// Pre-order scan for markers inside a subtree the original side lacks.
fn scan_markers(value: &Value, path: &Path, marker: &Value, out: &mut Vec<Path>) {
    if value == marker {
        out.push(path.clone());
        return;
    }
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                scan_markers(item, &path.with_segment(Seg::Index(i)), marker, out);
            }
        }
        Value::Object(map) => {
            for (key, member) in map {
                scan_markers(member, &path.with_segment(Seg::key(key.as_str())), marker, out);
            }
        }
        _ => {}
    }
}

/// JSON type tag with absence as its own tag.
fn json_type(value: Option<&Value>) -> &'static str {
    match value {
        None => "absent",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
