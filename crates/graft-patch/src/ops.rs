//! The six patch operations.
//!
//! Every operation resolves its expressions against the input document
//! first, then folds writes over the deep primitives. All are pure; the
//! only failure is an expression that does not parse.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deep::{get_deep, remove_in_place, set_in_place};
use crate::error::GraftResult;
use crate::matching::match_entries;
use crate::path::{Path, Seg};

/// Amount argument for [`inc`] and [`dec`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The additive inverse. `Int(i64::MIN)` widens to `Float`, every
    /// other integer stays integral.
    pub fn negate(self) -> Number {
        match self {
            Number::Int(i) => match i.checked_neg() {
                Some(n) => Number::Int(n),
                None => Number::Float(-(i as f64)),
            },
            Number::Float(f) => Number::Float(-f),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i.into())
    }
}

impl From<u32> for Number {
    fn from(i: u32) -> Self {
        Number::Int(i.into())
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<f32> for Number {
    fn from(f: f32) -> Self {
        Number::Float(f.into())
    }
}

/// Where [`insert`] places its items relative to the matches of the
/// anchor expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertPosition<'a> {
    /// Before the smallest matched index.
    Before(&'a str),
    /// Just past the largest matched index.
    After(&'a str),
    /// Drop every matched element; the items land as one block at the
    /// smallest matched index.
    Replace(&'a str),
}

impl<'a> InsertPosition<'a> {
    /// The anchor expression.
    pub fn expression(&self) -> &'a str {
        match self {
            InsertPosition::Before(e) | InsertPosition::After(e) | InsertPosition::Replace(e) => e,
        }
    }
}

/// Sets a value at every location each expression matches.
///
/// All expressions are resolved against the input document before any
/// write applies, so no entry can observe another entry's effect. Writes
/// land in entry order, match order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let doc = json!({"name": {"first": "", "last": ""}});
/// let out = graft_patch::set(&doc, [("name.*", json!("changed"))]).unwrap();
/// assert_eq!(out, json!({"name": {"first": "changed", "last": "changed"}}));
/// ```
pub fn set<'a, I, V>(document: &Value, entries: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Into<Value>,
{
    let mut writes = Vec::new();
    for (expression, value) in entries {
        let value = value.into();
        for entry in match_entries(document, expression)? {
            writes.push((entry.path, value.clone()));
        }
    }
    Ok(apply_writes(document, writes))
}

/// Like [`set`], but a match is only written when the value currently
/// there is null or absent.
pub fn set_if_missing<'a, I, V>(document: &Value, entries: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: Into<Value>,
{
    let mut writes = Vec::new();
    for (expression, value) in entries {
        let value = value.into();
        for entry in match_entries(document, expression)? {
            if matches!(entry.value, None | Some(Value::Null)) {
                writes.push((entry.path, value.clone()));
            }
        }
    }
    Ok(apply_writes(document, writes))
}

/// Removes every match of each expression.
///
/// Matches are resolved against the input document, then removed one at a
/// time in match order. Removing several indices from the same array
/// therefore shifts the later removals: each one applies to the array as
/// the previous removals left it, not as it was matched.
pub fn unset<'a, I>(document: &Value, expressions: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut paths = Vec::new();
    for expression in expressions {
        for entry in match_entries(document, expression)? {
            paths.push(entry.path);
        }
    }
    let mut out = document.clone();
    for path in paths {
        remove_in_place(&mut out, path.segments());
    }
    Ok(out)
}

/// Splices `items` into arrays relative to the matches of an anchor
/// expression.
///
/// Only matches addressing an element of an existing array count; other
/// matches are ignored. Matches are grouped per array and each array is
/// spliced once, from its state in the input document. Anchors past the
/// end of an array clamp to its length, so `Before` on the append
/// position (`arr[-1]`) appends.
///
/// # Examples
///
/// ```
/// use graft_patch::InsertPosition;
/// use serde_json::json;
///
/// let doc = json!({"some": {"array": ["a", "b", "c"]}});
/// let out = graft_patch::insert(
///     &doc,
///     InsertPosition::Replace("some.array[1]"),
///     [json!("!")],
/// )
/// .unwrap();
/// assert_eq!(out, json!({"some": {"array": ["a", "!", "c"]}}));
/// ```
pub fn insert<I, V>(document: &Value, position: InsertPosition<'_>, items: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    struct Group {
        parent: Path,
        array: Vec<Value>,
        indices: Vec<usize>,
    }

    let items: Vec<Value> = items.into_iter().map(Into::into).collect();

    let mut groups: Vec<Group> = Vec::new();
    for entry in match_entries(document, position.expression())? {
        let Some(&Seg::Index(index)) = entry.path.last() else {
            continue;
        };
        let Some(parent) = entry.path.parent() else {
            continue;
        };
        let Some(Value::Array(array)) = get_deep(document, &parent) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.parent == parent) {
            Some(group) => group.indices.push(index),
            None => groups.push(Group {
                parent,
                array: array.clone(),
                indices: vec![index],
            }),
        }
    }

    let mut out = document.clone();
    for mut group in groups {
        group.indices.sort_unstable();
        let spliced = splice(&group.array, &group.indices, position, &items);
        set_in_place(&mut out, group.parent.segments(), Value::Array(spliced));
    }
    Ok(out)
}

/// Adds an amount to every numeric match of each expression.
///
/// Matches whose value is not a number (or absent) are skipped. The sum
/// is taken from the value captured at match time, so all expressions see
/// the input document. Integer plus integer stays integral while the sum
/// is representable and widens to float on overflow; a float on either
/// side makes the sum float. Sums with no JSON representation (infinite
/// or NaN) are skipped.
pub fn inc<'a, I, N>(document: &Value, entries: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = (&'a str, N)>,
    N: Into<Number>,
{
    let mut writes = Vec::new();
    for (expression, amount) in entries {
        let amount = amount.into();
        for entry in match_entries(document, expression)? {
            let Some(Value::Number(current)) = entry.value else {
                continue;
            };
            if let Some(sum) = add_amount(&current, amount) {
                writes.push((entry.path, Value::Number(sum)));
            }
        }
    }
    Ok(apply_writes(document, writes))
}

/// Subtracts an amount from every numeric match of each expression.
/// Exactly `inc` with each amount negated.
pub fn dec<'a, I, N>(document: &Value, entries: I) -> GraftResult<Value>
where
    I: IntoIterator<Item = (&'a str, N)>,
    N: Into<Number>,
{
    inc(
        document,
        entries
            .into_iter()
            .map(|(expression, amount)| (expression, amount.into().negate())),
    )
}

fn apply_writes(document: &Value, writes: Vec<(Path, Value)>) -> Value {
    let mut out = document.clone();
    for (path, value) in writes {
        set_in_place(&mut out, path.segments(), value);
    }
    out
}

fn add_amount(current: &serde_json::Number, amount: Number) -> Option<serde_json::Number> {
    if let (Some(a), Number::Int(b)) = (current.as_i64(), amount) {
        if let Some(sum) = a.checked_add(b) {
            return Some(serde_json::Number::from(sum));
        }
    }
    let a = current.as_f64()?;
    let b = match amount {
        Number::Int(i) => i as f64,
        Number::Float(f) => f,
    };
    serde_json::Number::from_f64(a + b)
}

fn splice(
    array: &[Value],
    indices: &[usize],
    position: InsertPosition<'_>,
    items: &[Value],
) -> Vec<Value> {
    let at = match position {
        InsertPosition::Before(_) | InsertPosition::Replace(_) => indices[0],
        InsertPosition::After(_) => indices[indices.len() - 1] + 1,
    }
    .min(array.len());

    let mut out = Vec::with_capacity(array.len() + items.len());
    out.extend(array[..at].iter().cloned());
    out.extend(items.iter().cloned());
    match position {
        InsertPosition::Replace(_) => out.extend(
            array
                .iter()
                .enumerate()
                .skip(at)
                .filter(|(i, _)| !indices.contains(i))
                .map(|(_, v)| v.clone()),
        ),
        _ => out.extend(array[at..].iter().cloned()),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_negate() {
        assert_eq!(Number::Int(3).negate(), Number::Int(-3));
        assert_eq!(Number::Float(1.5).negate(), Number::Float(-1.5));
        assert_eq!(
            Number::Int(i64::MIN).negate(),
            Number::Float(-(i64::MIN as f64))
        );
    }

    #[test]
    fn test_add_amount_prefers_integers() {
        let n = |v: Value| match v {
            Value::Number(n) => n,
            _ => unreachable!(),
        };
        assert_eq!(add_amount(&n(json!(2)), Number::Int(1)), Some(n(json!(3))));
        assert_eq!(
            add_amount(&n(json!(2)), Number::Float(0.5)),
            Some(n(json!(2.5)))
        );
        assert_eq!(
            add_amount(&n(json!(8.5)), Number::Int(1)),
            Some(n(json!(9.5)))
        );
    }

    #[test]
    fn test_add_amount_overflow_widens_to_float() {
        let max = serde_json::Number::from(i64::MAX);
        let sum = add_amount(&max, Number::Int(1)).unwrap();
        assert_eq!(sum.as_f64(), Some(i64::MAX as f64 + 1.0));
        assert!(sum.as_i64().is_none());
    }

    #[test]
    fn test_add_amount_unrepresentable_sum_is_none() {
        let big = serde_json::Number::from_f64(f64::MAX).unwrap();
        assert_eq!(add_amount(&big, Number::Float(f64::MAX)), None);
    }

    #[test]
    fn test_insert_position_expression() {
        assert_eq!(InsertPosition::Before("a[0]").expression(), "a[0]");
        assert_eq!(InsertPosition::After("a[0]").expression(), "a[0]");
        assert_eq!(InsertPosition::Replace("a[0]").expression(), "a[0]");
    }

    #[test]
    fn test_splice_clamps_past_the_end() {
        let array = vec![json!("a"), json!("b")];
        let items = vec![json!("x")];
        assert_eq!(
            splice(&array, &[9], InsertPosition::Before("_"), &items),
            vec![json!("a"), json!("b"), json!("x")]
        );
        assert_eq!(
            splice(&array, &[1], InsertPosition::After("_"), &items),
            vec![json!("a"), json!("b"), json!("x")]
        );
    }
}
