//! Deep accessors: total read, write, and remove primitives over
//! `(document, path)` pairs.
//!
//! All three are pure. `set_deep` and `unset_deep` clone the document once
//! and then edit in place; the in-place forms are shared with the patch
//! operations so a multi-write fold clones only once.

use serde_json::{Map, Value};

use crate::path::{Path, Seg};

/// Reads the value at `path`.
///
/// Returns `None` when any step fails: a missing key, an out-of-range
/// index, or a segment applied to the wrong container shape. The root path
/// returns the document itself.
///
/// # Examples
///
/// ```
/// use graft_patch::{get_deep, path};
/// use serde_json::json;
///
/// let doc = json!({"users": [{"name": "ada"}]});
/// assert_eq!(get_deep(&doc, &path!("users", 0, "name")), Some(&json!("ada")));
/// assert_eq!(get_deep(&doc, &path!("users", 1, "name")), None);
/// ```
pub fn get_deep<'a>(document: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = document;
    for seg in path.segments() {
        current = match (seg, current) {
            (Seg::Key(key), Value::Object(map)) => map.get(key)?,
            (Seg::Index(idx), Value::Array(items)) => items.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Returns a copy of `document` with `value` written at `path`.
///
/// Missing containers along the path are created: a key segment turns an
/// absent, null, or scalar location into an object; an index segment turns
/// it into an array, padding any gap with nulls. A key segment meeting an
/// existing array, or an index segment meeting an existing object, returns
/// the document unchanged. The root path replaces the whole document.
///
/// # Examples
///
/// ```
/// use graft_patch::{path, set_deep};
/// use serde_json::json;
///
/// let out = set_deep(&json!({}), &path!("arr", 3), json!("x"));
/// assert_eq!(out, json!({"arr": [null, null, null, "x"]}));
///
/// // An index cannot address an object: no-op.
/// let doc = json!({"a": {"b": 1}});
/// assert_eq!(set_deep(&doc, &path!("a", 0), json!("x")), doc);
/// ```
pub fn set_deep(document: &Value, path: &Path, value: Value) -> Value {
    let mut out = document.clone();
    set_in_place(&mut out, path.segments(), value);
    out
}

/// Returns a copy of `document` with the value at `path` removed.
///
/// Exact-path removal: if `path` does not resolve, the result equals the
/// input. Removing an array element splices it out; later elements shift
/// left. The root path is returned unchanged.
///
/// # Examples
///
/// ```
/// use graft_patch::{path, unset_deep};
/// use serde_json::json;
///
/// let doc = json!({"arr": ["a", "b", "c"]});
/// assert_eq!(unset_deep(&doc, &path!("arr", 1)), json!({"arr": ["a", "c"]}));
/// assert_eq!(unset_deep(&doc, &path!("missing")), doc);
/// ```
pub fn unset_deep(document: &Value, path: &Path) -> Value {
    let mut out = document.clone();
    remove_in_place(&mut out, path.segments());
    out
}

pub(crate) fn set_in_place(target: &mut Value, segments: &[Seg], value: Value) {
    match segments {
        [] => *target = value,
        [Seg::Key(key), rest @ ..] => {
            match target {
                Value::Object(_) => {}
                Value::Array(_) => return,
                _ => *target = Value::Object(Map::new()),
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                set_in_place(slot, rest, value);
            }
        }
        [Seg::Index(idx), rest @ ..] => {
            match target {
                Value::Array(_) => {}
                Value::Object(_) => return,
                _ => *target = Value::Array(Vec::new()),
            }
            if let Value::Array(items) = target {
                if items.len() <= *idx {
                    items.resize(idx + 1, Value::Null);
                }
                set_in_place(&mut items[*idx], rest, value);
            }
        }
    }
}

pub(crate) fn remove_in_place(target: &mut Value, segments: &[Seg]) {
    match segments {
        [] => {}
        [Seg::Key(key)] => {
            if let Value::Object(map) = target {
                // shift_remove keeps the order of the remaining members.
                map.shift_remove(key);
            }
        }
        [Seg::Index(idx)] => {
            if let Value::Array(items) = target {
                if *idx < items.len() {
                    items.remove(*idx);
                }
            }
        }
        [Seg::Key(key), rest @ ..] => {
            if let Value::Object(map) = target {
                if let Some(child) = map.get_mut(key) {
                    remove_in_place(child, rest);
                }
            }
        }
        [Seg::Index(idx), rest @ ..] => {
            if let Value::Array(items) = target {
                if let Some(child) = items.get_mut(*idx) {
                    remove_in_place(child, rest);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_get_deep_walks_objects_and_arrays() {
        let doc = json!({"a": {"b": [1, {"c": true}]}});
        assert_eq!(get_deep(&doc, &Path::root()), Some(&doc));
        assert_eq!(get_deep(&doc, &path!("a", "b", 0)), Some(&json!(1)));
        assert_eq!(get_deep(&doc, &path!("a", "b", 1, "c")), Some(&json!(true)));
    }

    #[test]
    fn test_get_deep_absent_is_none() {
        let doc = json!({"a": [1], "s": "str"});
        assert_eq!(get_deep(&doc, &path!("missing")), None);
        assert_eq!(get_deep(&doc, &path!("a", 1)), None);
        // Shape mismatches degrade to absent, not errors.
        assert_eq!(get_deep(&doc, &path!("a", "key")), None);
        assert_eq!(get_deep(&doc, &path!("s", 0)), None);
        assert_eq!(get_deep(&doc, &path!("s", "k")), None);
    }

    #[test]
    fn test_set_deep_replaces_at_root() {
        assert_eq!(set_deep(&json!({"a": 1}), &Path::root(), json!(2)), json!(2));
    }

    #[test]
    fn test_set_deep_updates_existing() {
        let doc = json!({"users": [{"name": "ada"}]});
        let out = set_deep(&doc, &path!("users", 0, "name"), json!("gus"));
        assert_eq!(out, json!({"users": [{"name": "gus"}]}));
        // The input is untouched.
        assert_eq!(doc, json!({"users": [{"name": "ada"}]}));
    }

    #[test]
    fn test_set_deep_synthesizes_containers() {
        assert_eq!(
            set_deep(&json!({}), &path!("a", "b"), json!(1)),
            json!({"a": {"b": 1}})
        );
        // Scalars and null are replaced by the needed container.
        assert_eq!(
            set_deep(&json!({"a": 5}), &path!("a", "b"), json!(1)),
            json!({"a": {"b": 1}})
        );
        assert_eq!(
            set_deep(&json!({"a": null}), &path!("a", 0), json!(1)),
            json!({"a": [1]})
        );
    }

    #[test]
    fn test_set_deep_pads_arrays_with_null() {
        assert_eq!(
            set_deep(&json!({}), &path!("arr", 3), json!("x")),
            json!({"arr": [null, null, null, "x"]})
        );
        assert_eq!(
            set_deep(&json!({"arr": [1]}), &path!("arr", 2), json!("x")),
            json!({"arr": [1, null, "x"]})
        );
    }

    #[test]
    fn test_set_deep_shape_mismatch_is_a_no_op() {
        let doc = json!({"arr": [1, 2], "obj": {"k": 1}});
        assert_eq!(set_deep(&doc, &path!("arr", "key"), json!(9)), doc);
        assert_eq!(set_deep(&doc, &path!("obj", 0), json!(9)), doc);
        // Also mid-path, not just at the leaf.
        assert_eq!(set_deep(&doc, &path!("arr", "key", 0), json!(9)), doc);
    }

    #[test]
    fn test_unset_deep_removes_object_key() {
        let doc = json!({"a": 1, "b": 2, "c": 3});
        let out = unset_deep(&doc, &path!("b"));
        assert_eq!(out, json!({"a": 1, "c": 3}));
        // Remaining keys keep their order.
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"a":1,"c":3}"#);
    }

    #[test]
    fn test_unset_deep_splices_array_element() {
        let doc = json!({"arr": ["a", "b", "c"]});
        assert_eq!(unset_deep(&doc, &path!("arr", 1)), json!({"arr": ["a", "c"]}));
        assert_eq!(unset_deep(&doc, &path!("arr", 9)), doc);
    }

    #[test]
    fn test_unset_deep_absent_path_is_unchanged() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(unset_deep(&doc, &path!("a", "x", "y")), doc);
        assert_eq!(unset_deep(&doc, &path!("q")), doc);
        assert_eq!(unset_deep(&doc, &Path::root()), doc);
    }

    #[test]
    fn test_unset_deep_is_idempotent_for_key_paths() {
        let doc = json!({"a": {"b": 1, "c": 2}});
        let once = unset_deep(&doc, &path!("a", "b"));
        let twice = unset_deep(&once, &path!("a", "b"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_get_after_set_round_trip() {
        let doc = json!({});
        let path = path!("x", 0, "y", 2);
        let out = set_deep(&doc, &path, json!("v"));
        assert_eq!(get_deep(&out, &path), Some(&json!("v")));
    }
}
