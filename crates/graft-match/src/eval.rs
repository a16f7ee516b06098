//! Expression evaluation: resolve an expression to a set of locations in a
//! document, then write a marker value at each one.
//!
//! Locations that the document does not contain can still be matched while
//! synthesis is enabled (see [`keeps_synthesis`]); writing the marker then
//! creates the minimal surrounding containers, so the marker always lands at
//! the position the expression addressed.

use serde_json::{Map, Value};

use crate::ast::{CompareOp, Expr, FieldPath, Literal, Segment, Selector};

/// One step of a resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Key(String),
    Index(usize),
}

/// Returns a copy of `document` with `marker` written at every location
/// `expr` matches.
pub(crate) fn evaluate_expr(expr: &Expr, document: &Value, marker: &Value) -> Value {
    let locations = resolve(expr, document);
    let mut marked = document.clone();
    let mut written: Vec<Vec<Step>> = Vec::new();
    for location in locations {
        // A location inside an already-marked subtree is subsumed by it.
        if written.iter().any(|w| is_prefix(w, &location)) {
            continue;
        }
        write_marker(&mut marked, &location, marker);
        written.push(location);
    }
    marked
}

/// Resolves `expr` against `document` into location paths, in match order.
fn resolve(expr: &Expr, document: &Value) -> Vec<Vec<Step>> {
    let mut locations: Vec<Vec<Step>> = vec![Vec::new()];
    let mut synthesizing = true;
    for segment in &expr.segments {
        if !keeps_synthesis(segment) {
            synthesizing = false;
        }
        let mut next = Vec::new();
        for location in &locations {
            step(segment, location, document, synthesizing, &mut next);
        }
        locations = next;
    }
    locations
}

/// Missing locations stay addressable only while the expression prefix is
/// definite: attribute segments and single-attribute or single-index
/// brackets. Wildcards, slices, filters, unions, and recursion match only
/// what exists, and nothing after them synthesizes either.
fn keeps_synthesis(segment: &Segment) -> bool {
    match segment {
        Segment::Attribute(_) => true,
        Segment::Bracket(selectors) => matches!(
            selectors.as_slice(),
            [Selector::Attribute(_)] | [Selector::Index(_)]
        ),
        Segment::Wildcard | Segment::Recursive => false,
    }
}

fn step(
    segment: &Segment,
    location: &[Step],
    document: &Value,
    synthesizing: bool,
    out: &mut Vec<Vec<Step>>,
) {
    let value = value_at(document, location);
    match segment {
        Segment::Attribute(name) => step_attribute(name, location, value, synthesizing, out),
        Segment::Wildcard => step_wildcard(location, value, out),
        Segment::Recursive => {
            if let Some(value) = value {
                descendants_or_self(location, value, out);
            }
        }
        Segment::Bracket(selectors) => {
            for selector in selectors {
                step_selector(selector, location, value, synthesizing, out);
            }
        }
    }
}

fn step_selector(
    selector: &Selector,
    location: &[Step],
    value: Option<&Value>,
    synthesizing: bool,
    out: &mut Vec<Vec<Step>>,
) {
    match selector {
        Selector::Attribute(name) => step_attribute(name, location, value, synthesizing, out),
        Selector::Wildcard => step_wildcard(location, value, out),
        Selector::Index(i) => step_index(*i, location, value, synthesizing, out),
        Selector::Slice { start, end } => {
            if let Some(Value::Array(items)) = value {
                let len = items.len();
                let lo = slice_bound(*start, len, 0);
                let hi = slice_bound(*end, len, len);
                for idx in lo..hi {
                    out.push(child(location, Step::Index(idx)));
                }
            }
        }
        Selector::Exists(path) => {
            filter(location, value, out, |candidate| {
                field_path_value(candidate, path).is_some()
            });
        }
        Selector::Compare { path, op, literal } => {
            filter(location, value, out, |candidate| {
                field_path_value(candidate, path).is_some_and(|v| compare(v, *op, literal))
            });
        }
    }
}

fn step_attribute(
    name: &str,
    location: &[Step],
    value: Option<&Value>,
    synthesizing: bool,
    out: &mut Vec<Vec<Step>>,
) {
    match value {
        Some(Value::Object(map)) => {
            if map.contains_key(name) || synthesizing {
                out.push(child(location, Step::Key(name.to_string())));
            }
        }
        // Keys do not address array elements.
        Some(Value::Array(_)) => {}
        // Scalar, null, or absent: the write replaces it with an object.
        _ => {
            if synthesizing {
                out.push(child(location, Step::Key(name.to_string())));
            }
        }
    }
}

fn step_index(
    i: i64,
    location: &[Step],
    value: Option<&Value>,
    synthesizing: bool,
    out: &mut Vec<Vec<Step>>,
) {
    match value {
        Some(Value::Array(items)) => {
            let idx = resolve_index(i, items.len());
            if idx < items.len() || synthesizing {
                out.push(child(location, Step::Index(idx)));
            }
        }
        // Indices do not address object members.
        Some(Value::Object(_)) => {}
        _ => {
            if synthesizing {
                out.push(child(location, Step::Index(resolve_index(i, 0))));
            }
        }
    }
}

fn step_wildcard(location: &[Step], value: Option<&Value>, out: &mut Vec<Vec<Step>>) {
    match value {
        Some(Value::Array(items)) => {
            for idx in 0..items.len() {
                out.push(child(location, Step::Index(idx)));
            }
        }
        Some(Value::Object(map)) => {
            for key in map.keys() {
                out.push(child(location, Step::Key(key.clone())));
            }
        }
        _ => {}
    }
}

/// Pre-order walk: the location itself, then every descendant.
fn descendants_or_self(location: &[Step], value: &Value, out: &mut Vec<Vec<Step>>) {
    out.push(location.to_vec());
    match value {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                descendants_or_self(&child(location, Step::Index(idx)), item, out);
            }
        }
        Value::Object(map) => {
            for (key, member) in map {
                descendants_or_self(&child(location, Step::Key(key.clone())), member, out);
            }
        }
        _ => {}
    }
}

/// On an array the filter selects elements; anywhere else it keeps or drops
/// the location itself, which is what makes stacked filters such as
/// `employees[a == 1][b == 2]` behave as an intersection.
fn filter<F>(location: &[Step], value: Option<&Value>, out: &mut Vec<Vec<Step>>, keep: F)
where
    F: Fn(&Value) -> bool,
{
    match value {
        Some(Value::Array(items)) => {
            for (idx, item) in items.iter().enumerate() {
                if keep(item) {
                    out.push(child(location, Step::Index(idx)));
                }
            }
        }
        Some(other) => {
            if keep(other) {
                out.push(location.to_vec());
            }
        }
        None => {}
    }
}

/// A negative index counts positions back from the end: `-1` is the append
/// position just past the last element, `-2` the last element itself.
fn resolve_index(i: i64, len: usize) -> usize {
    if i >= 0 {
        i as usize
    } else {
        (len as i64 + i + 1).max(0) as usize
    }
}

fn slice_bound(bound: Option<i64>, len: usize, default: usize) -> usize {
    match bound {
        None => default,
        Some(b) if b >= 0 => (b as usize).min(len),
        Some(b) => len.saturating_sub(b.unsigned_abs() as usize),
    }
}

fn field_path_value<'a>(value: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = value;
    for field in &path.fields {
        current = current.as_object()?.get(field)?;
    }
    Some(current)
}

/// An unresolved filter path has already been rejected by the caller; here
/// both sides exist. Mixed types are unequal and unordered, so only `!=`
/// can hold for them.
fn compare(value: &Value, op: CompareOp, literal: &Literal) -> bool {
    match (value, literal) {
        (Value::Number(n), Literal::Int(i)) => {
            n.as_f64().is_some_and(|lhs| compare_ord(&lhs, op, &(*i as f64)))
        }
        (Value::Number(n), Literal::Float(f)) => {
            n.as_f64().is_some_and(|lhs| compare_ord(&lhs, op, f))
        }
        (Value::String(s), Literal::String(lit)) => compare_ord(&s.as_str(), op, &lit.as_str()),
        (Value::Bool(b), Literal::Bool(lit)) => match op {
            CompareOp::Eq => b == lit,
            CompareOp::Ne => b != lit,
            _ => false,
        },
        (Value::Null, Literal::Null) => matches!(op, CompareOp::Eq),
        _ => matches!(op, CompareOp::Ne),
    }
}

fn compare_ord<T: PartialOrd>(lhs: &T, op: CompareOp, rhs: &T) -> bool {
    match op {
        CompareOp::Eq => lhs == rhs,
        CompareOp::Ne => lhs != rhs,
        CompareOp::Lt => lhs < rhs,
        CompareOp::Le => lhs <= rhs,
        CompareOp::Gt => lhs > rhs,
        CompareOp::Ge => lhs >= rhs,
    }
}

fn value_at<'a>(document: &'a Value, location: &[Step]) -> Option<&'a Value> {
    let mut current = document;
    for step in location {
        current = match (step, current) {
            (Step::Key(key), Value::Object(map)) => map.get(key)?,
            (Step::Index(idx), Value::Array(items)) => items.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

fn child(location: &[Step], step: Step) -> Vec<Step> {
    let mut out = location.to_vec();
    out.push(step);
    out
}

fn is_prefix(prefix: &[Step], location: &[Step]) -> bool {
    prefix.len() <= location.len() && location[..prefix.len()] == *prefix
}

/// Writes `marker` at `location`, creating missing containers on the way:
/// a key step turns scalars and null into an object, an index step turns
/// them into an array padded with nulls. A key step meeting an existing
/// array, or an index step meeting an existing object, leaves the document
/// untouched.
fn write_marker(target: &mut Value, location: &[Step], marker: &Value) {
    match location {
        [] => *target = marker.clone(),
        [Step::Key(key), rest @ ..] => {
            match target {
                Value::Object(_) => {}
                Value::Array(_) => return,
                _ => *target = Value::Object(Map::new()),
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                write_marker(slot, rest, marker);
            }
        }
        [Step::Index(idx), rest @ ..] => {
            match target {
                Value::Array(_) => {}
                Value::Object(_) => return,
                _ => *target = Value::Array(Vec::new()),
            }
            if let Value::Array(items) = target {
                if items.len() <= *idx {
                    items.resize(idx + 1, Value::Null);
                }
                write_marker(&mut items[*idx], rest, marker);
            }
        }
    }
}
