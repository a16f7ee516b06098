//! Operation-level tests for graft-patch.

use graft_patch::{
    apply_patch, dec, inc, insert, set, set_if_missing, unset, Anchor, GraftError, InsertPosition,
    Op, Patch,
};
use serde_json::json;

// ============================================================================
// set
// ============================================================================

#[test]
fn test_set_writes_every_expression() {
    let doc = json!({"foo": {"bar": "baz"}});
    let out = set(
        &doc,
        [
            ("foo.bar", json!("changed")),
            ("foo.someValue", json!(true)),
            ("foo.someOtherValue", json!(true)),
        ],
    )
    .unwrap();
    assert_eq!(
        out,
        json!({"foo": {
            "bar": "changed",
            "someValue": true,
            "someOtherValue": true,
        }})
    );
}

#[test]
fn test_set_with_filter_expression() {
    let doc = json!({"employees": [{"wage": 10}, {"wage": 90000}]});
    let out = set(&doc, [("employees[wage > 50000]", json!({"bonus": true}))]).unwrap();
    assert_eq!(
        out,
        json!({"employees": [{"wage": 10}, {"bonus": true}]})
    );
}

#[test]
fn test_set_resolves_all_expressions_before_writing() {
    // The filter in the second expression sees the original document, so
    // the first write cannot turn `a` into a match.
    let doc = json!({"a": {"flag": false}, "b": {"flag": true}});
    let out = set(
        &doc,
        [("a.flag", json!(true)), ("*[flag == true]", json!("seen"))],
    )
    .unwrap();
    assert_eq!(out, json!({"a": {"flag": true}, "b": "seen"}));
}

#[test]
fn test_set_synthesizes_missing_paths() {
    let out = set(&json!({}), [("users[0].name", json!("ada"))]).unwrap();
    assert_eq!(out, json!({"users": [{"name": "ada"}]}));
}

// ============================================================================
// setIfMissing
// ============================================================================

#[test]
fn test_set_if_missing_touches_only_null_and_absent() {
    let doc = json!({"foo": {"bar": "baz", "wasNull": null}});
    let out = set_if_missing(
        &doc,
        [
            ("foo.bar", json!("won't change")),
            ("foo.someValue", json!(true)),
            ("foo.someOtherValue", json!(true)),
            ("foo.wasNull", json!("changed")),
            ("foo.wasUndefined", json!("changed")),
        ],
    )
    .unwrap();
    assert_eq!(
        out,
        json!({"foo": {
            "bar": "baz",
            "wasNull": "changed",
            "someValue": true,
            "someOtherValue": true,
            "wasUndefined": "changed",
        }})
    );
}

// ============================================================================
// unset
// ============================================================================

#[test]
fn test_unset_removes_every_match() {
    let doc = json!({"foo": {
        "myArray": [{"value": "one"}, {"value": "two"}, {"value": "three"}],
        "stays": true,
        "thisGetsDeleted": "beep",
    }});
    let out = unset(&doc, ["foo.myArray[1]", "foo.thisGetsDeleted"]).unwrap();
    assert_eq!(
        out,
        json!({"foo": {
            "myArray": [{"value": "one"}, {"value": "three"}],
            "stays": true,
        }})
    );
}

#[test]
fn test_unset_multiple_indices_shifts_later_removals() {
    // Matches resolve against the input, removals apply one at a time:
    // removing index 0 shifts the array, so the match at index 2 removes
    // what started at index 3.
    let doc = json!({"arr": ["a", "b", "c", "d"]});
    let out = unset(&doc, ["arr[0, 2]"]).unwrap();
    assert_eq!(out, json!({"arr": ["b", "c"]}));
}

#[test]
fn test_unset_absent_match_is_identity() {
    let doc = json!({"a": 1});
    assert_eq!(unset(&doc, ["b.c"]).unwrap(), doc);
}

// ============================================================================
// insert
// ============================================================================

#[test]
fn test_insert_before() {
    let doc = json!({"some": {"array": ["a", "b", "c"]}});
    let out = insert(&doc, InsertPosition::Before("some.array[0]"), [json!("!")]).unwrap();
    assert_eq!(out, json!({"some": {"array": ["!", "a", "b", "c"]}}));
}

#[test]
fn test_insert_after() {
    let doc = json!({"some": {"array": ["a", "b", "c"]}});
    let out = insert(&doc, InsertPosition::After("some.array[0]"), [json!("!")]).unwrap();
    assert_eq!(out, json!({"some": {"array": ["a", "!", "b", "c"]}}));
}

#[test]
fn test_insert_replace() {
    let doc = json!({"some": {"array": ["a", "b", "c"]}});
    let out = insert(&doc, InsertPosition::Replace("some.array[0]"), [json!("!")]).unwrap();
    assert_eq!(out, json!({"some": {"array": ["!", "b", "c"]}}));
}

#[test]
fn test_insert_replace_slice() {
    let doc = json!({"some": {"array": ["a", "b", "c", "d", "e"]}});
    let out = insert(
        &doc,
        InsertPosition::Replace("some.array[2:]"),
        [json!("!"), json!("~")],
    )
    .unwrap();
    assert_eq!(out, json!({"some": {"array": ["a", "b", "!", "~"]}}));
}

#[test]
fn test_insert_replace_non_consecutive() {
    // Every matched element is dropped; the items land as one block at
    // the smallest matched index.
    let doc = json!({"some": {"array": ["a", "b", "c", "d", "e", "f"]}});
    let out = insert(
        &doc,
        InsertPosition::Replace("some.array[1,3,5]"),
        [json!("!"), json!("~")],
    )
    .unwrap();
    assert_eq!(out, json!({"some": {"array": ["a", "!", "~", "c", "e"]}}));
}

#[test]
fn test_insert_after_filter_match() {
    let doc = json!({"some": {"array": [{"key": "abc-123"}, {"key": "last"}]}});
    let out = insert(
        &doc,
        InsertPosition::After("some.array[key == \"abc-123\"]"),
        [json!("!"), json!("~")],
    )
    .unwrap();
    assert_eq!(
        out,
        json!({"some": {"array": [{"key": "abc-123"}, "!", "~", {"key": "last"}]}})
    );
}

#[test]
fn test_insert_orders_indices_numerically() {
    let doc = json!({"arr": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]});
    let out = insert(&doc, InsertPosition::Replace("arr[2, 10]"), [json!("x")]).unwrap();
    assert_eq!(out, json!({"arr": [0, 1, "x", 3, 4, 5, 6, 7, 8, 9, 11]}));
}

#[test]
fn test_insert_splices_each_matched_array_once() {
    let doc = json!({"grid": [[1, 2], [3, 4]]});
    let out = insert(&doc, InsertPosition::Before("grid.*[0]"), [json!("x")]).unwrap();
    assert_eq!(out, json!({"grid": [["x", 1, 2], ["x", 3, 4]]}));
}

#[test]
fn test_insert_before_append_position_appends() {
    let doc = json!({"some": {"array": ["a", "b", "c"]}});
    let out = insert(&doc, InsertPosition::Before("some.array[-1]"), [json!("!")]).unwrap();
    assert_eq!(out, json!({"some": {"array": ["a", "b", "c", "!"]}}));
}

#[test]
fn test_insert_anchor_past_the_end_clamps() {
    let doc = json!({"arr": [1, 2]});
    let out = insert(&doc, InsertPosition::After("arr[9]"), [json!("x")]).unwrap();
    assert_eq!(out, json!({"arr": [1, 2, "x"]}));
}

#[test]
fn test_insert_ignores_matches_outside_arrays() {
    // The match is an object member, not an array element.
    let doc = json!({"some": {"array": [1]}});
    assert_eq!(
        insert(&doc, InsertPosition::Before("some.array"), [json!("x")]).unwrap(),
        doc
    );
    // The anchor resolves to nothing at all.
    assert_eq!(
        insert(&doc, InsertPosition::Before("other[0]"), [json!("x")]).unwrap(),
        doc
    );
}

// ============================================================================
// inc / dec
// ============================================================================

#[test]
fn test_inc_adds_to_every_numeric_match() {
    let doc = json!({"some": {"foo": 2, "bar": 8.5, "baz": -3}});
    let out = inc(&doc, [("some.*", 1)]).unwrap();
    assert_eq!(out, json!({"some": {"foo": 3, "bar": 9.5, "baz": -2}}));
}

#[test]
fn test_dec_subtracts_from_every_numeric_match() {
    let doc = json!({"some": {"foo": 2, "bar": 8.5, "baz": -3}});
    let out = dec(&doc, [("some.*", 1)]).unwrap();
    assert_eq!(out, json!({"some": {"foo": 1, "bar": 7.5, "baz": -4}}));
}

#[test]
fn test_inc_skips_non_numeric_matches() {
    let doc = json!({"a": 1, "b": "s", "c": null, "d": [1]});
    let out = inc(&doc, [("*", 1)]).unwrap();
    assert_eq!(out, json!({"a": 2, "b": "s", "c": null, "d": [1]}));
}

#[test]
fn test_inc_skips_absent_matches() {
    let doc = json!({"a": 1});
    assert_eq!(inc(&doc, [("missing.path", 1)]).unwrap(), doc);
}

#[test]
fn test_inc_integer_overflow_widens_to_float() {
    let doc = json!({"n": i64::MAX});
    let out = inc(&doc, [("n", 1)]).unwrap();
    assert_eq!(out["n"].as_f64(), Some(i64::MAX as f64 + 1.0));
    assert!(out["n"].as_i64().is_none());
}

#[test]
fn test_dec_is_negated_inc() {
    let doc = json!({"some": {"foo": 2, "bar": 8.5}});
    assert_eq!(
        dec(&doc, [("some.*", 2.5)]).unwrap(),
        inc(&doc, [("some.*", -2.5)]).unwrap()
    );
}

// ============================================================================
// cross-cutting
// ============================================================================

#[test]
fn test_operations_never_mutate_their_input() {
    let doc = json!({"some": {"array": [1, 2], "n": 5, "flag": null}});
    let snapshot = doc.clone();

    set(&doc, [("some.n", json!(9))]).unwrap();
    set_if_missing(&doc, [("some.flag", json!(true))]).unwrap();
    unset(&doc, ["some.array[0]"]).unwrap();
    insert(&doc, InsertPosition::After("some.array[0]"), [json!(9)]).unwrap();
    inc(&doc, [("some.n", 1)]).unwrap();
    dec(&doc, [("some.n", 1)]).unwrap();

    assert_eq!(doc, snapshot);
}

#[test]
fn test_malformed_expressions_error() {
    let doc = json!({});
    assert!(matches!(
        set(&doc, [("a[", json!(1))]),
        Err(GraftError::Expression(_))
    ));
    assert!(matches!(
        unset(&doc, ["a b"]),
        Err(GraftError::Expression(_))
    ));
    assert!(matches!(
        insert(&doc, InsertPosition::Replace("a[]"), [json!(1)]),
        Err(GraftError::Expression(_))
    ));
}

#[test]
fn test_patch_runs_mixed_operations_in_sequence() {
    let doc = json!({"todo": {"items": ["write", "ship"], "done": 0}});
    let patch = Patch::new()
        .with_op(Op::insert(
            Anchor::After("todo.items[-2]".into()),
            vec![json!("review")],
        ))
        .with_op(Op::set_if_missing([("todo.owner", json!("ada"))]))
        .with_op(Op::inc([("todo.done", json!(1))]))
        .with_op(Op::unset(["todo.items[0]"]));
    let out = apply_patch(&doc, &patch).unwrap();
    assert_eq!(
        out,
        json!({"todo": {
            "items": ["ship", "review"],
            "done": 1,
            "owner": "ada",
        }})
    );
}
