//! Serializable patches: a sequence of operations applied in order.
//!
//! A [`Patch`] round-trips as a JSON array of operation objects, each
//! tagged by operation name:
//!
//! ```json
//! [
//!   {"set": {"user.name": "ada"}},
//!   {"insert": {"after": "log[-2]", "items": ["entry"]}},
//!   {"unset": ["draft"]}
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GraftResult;
use crate::ops::{self, InsertPosition, Number};

/// One patch operation, tagged by name in its serialized form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Op {
    /// Set a value at every match of each expression.
    Set(Map<String, Value>),
    /// Like `set`, but only where the current value is null or absent.
    SetIfMissing(Map<String, Value>),
    /// Remove every match of each expression.
    Unset(Vec<String>),
    /// Splice items into arrays relative to an anchor expression.
    Insert(InsertOp),
    /// Add an amount to every numeric match of each expression.
    Inc(Map<String, Value>),
    /// Subtract an amount from every numeric match of each expression.
    Dec(Map<String, Value>),
}

impl Op {
    /// A `set` op from expression/value pairs.
    pub fn set<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Op::Set(collect_entries(entries))
    }

    /// A `setIfMissing` op from expression/value pairs.
    pub fn set_if_missing<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Op::SetIfMissing(collect_entries(entries))
    }

    /// An `unset` op from expressions.
    pub fn unset<S, I>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Op::Unset(expressions.into_iter().map(Into::into).collect())
    }

    /// An `insert` op.
    pub fn insert(anchor: Anchor, items: Vec<Value>) -> Self {
        Op::Insert(InsertOp { anchor, items })
    }

    /// An `inc` op from expression/amount pairs.
    pub fn inc<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Op::Inc(collect_entries(entries))
    }

    /// A `dec` op from expression/amount pairs.
    pub fn dec<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Op::Dec(collect_entries(entries))
    }

    /// The tag used in the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Set(_) => "set",
            Op::SetIfMissing(_) => "setIfMissing",
            Op::Unset(_) => "unset",
            Op::Insert(_) => "insert",
            Op::Inc(_) => "inc",
            Op::Dec(_) => "dec",
        }
    }
}

fn collect_entries<K, V, I>(entries: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Arguments of [`Op::Insert`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertOp {
    /// Anchor expression and the side items land on.
    #[serde(flatten)]
    pub anchor: Anchor,
    /// Items spliced into the matched arrays.
    pub items: Vec<Value>,
}

/// Anchor of an insert: which side of the matched elements the items go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// Insert before the smallest matched index.
    Before(String),
    /// Insert just past the largest matched index.
    After(String),
    /// Drop the matched elements and insert at the smallest matched index.
    Replace(String),
}

impl Anchor {
    fn position(&self) -> InsertPosition<'_> {
        match self {
            Anchor::Before(e) => InsertPosition::Before(e),
            Anchor::After(e) => InsertPosition::After(e),
            Anchor::Replace(e) => InsertPosition::Replace(e),
        }
    }
}

/// An ordered sequence of operations.
///
/// Unlike the standalone operation functions, which all resolve their
/// expressions against their input, each operation in a patch observes the
/// output of the one before it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    ops: Vec<Op>,
}

impl Patch {
    /// An empty patch.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Append an operation, builder style.
    pub fn with_op(mut self, op: Op) -> Self {
        self.ops.push(op);
        self
    }

    /// Append an operation in place.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// The operations in application order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the patch has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromIterator<Op> for Patch {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Patch {
            ops: iter.into_iter().collect(),
        }
    }
}

/// Applies every operation of `patch` to `document`, in order.
///
/// # Examples
///
/// ```
/// use graft_patch::{apply_patch, Op, Patch};
/// use serde_json::json;
///
/// let patch = Patch::new()
///     .with_op(Op::set([("user.name", json!("ada"))]))
///     .with_op(Op::inc([("user.logins", json!(1))]));
/// let doc = json!({"user": {"logins": 41}});
/// let out = apply_patch(&doc, &patch).unwrap();
/// assert_eq!(out, json!({"user": {"name": "ada", "logins": 42}}));
/// ```
pub fn apply_patch(document: &Value, patch: &Patch) -> GraftResult<Value> {
    let mut result = document.clone();
    for op in patch.ops() {
        result = apply_op(&result, op)?;
    }
    debug!(ops = patch.len(), "applied patch");
    Ok(result)
}

fn apply_op(document: &Value, op: &Op) -> GraftResult<Value> {
    match op {
        Op::Set(entries) => ops::set(document, string_entries(entries)),
        Op::SetIfMissing(entries) => ops::set_if_missing(document, string_entries(entries)),
        Op::Unset(expressions) => ops::unset(document, expressions.iter().map(String::as_str)),
        Op::Insert(insert) => ops::insert(
            document,
            insert.anchor.position(),
            insert.items.iter().cloned(),
        ),
        Op::Inc(entries) => ops::inc(document, numeric_entries(entries)),
        Op::Dec(entries) => ops::dec(document, numeric_entries(entries)),
    }
}

fn string_entries(entries: &Map<String, Value>) -> impl Iterator<Item = (&str, Value)> + '_ {
    entries.iter().map(|(k, v)| (k.as_str(), v.clone()))
}

/// Non-numeric amounts are skipped, matching the operations' treatment of
/// non-numeric targets.
fn numeric_entries(entries: &Map<String, Value>) -> impl Iterator<Item = (&str, Number)> + '_ {
    entries
        .iter()
        .filter_map(|(k, v)| Some((k.as_str(), number_from_value(v)?)))
}

fn number_from_value(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Number::Int(i))
            } else {
                n.as_f64().map(Number::Float)
            }
        }
        _ => None,
    }
}
