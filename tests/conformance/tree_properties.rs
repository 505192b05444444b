//! Naming operation contracts.

use crate::test_utils::{child_names, rabc};
use hiermem::{BindingKind, DirError, NamespaceTree, ObjectValue, TreeOptions};
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn list_reports_exactly_the_direct_children() {
    let tree = rabc();
    assert_eq!(child_names(&tree, ""), ["A", "B"]);
    assert_eq!(child_names(&tree, "A"), ["C"]);
    assert!(child_names(&tree, "A/C").is_empty());
}

#[test]
fn bind_collides_and_rebind_replaces() {
    let mut tree = rabc();
    let err = tree.bind("A", ObjectValue::from(1i64), None).unwrap_err();
    assert!(err.is_name_already_bound());
    assert_eq!(tree.lookup("A").unwrap().kind(), BindingKind::Context);

    tree.rebind("A", ObjectValue::from(1i64), None).unwrap();
    assert_eq!(
        tree.lookup("A").unwrap().as_object(),
        Some(&ObjectValue::from(1i64))
    );
    assert!(matches!(
        tree.lookup("A/C").unwrap_err(),
        DirError::NotContext { .. }
    ));
    assert_eq!(child_names(&tree, ""), ["A", "B"]);
}

#[test]
fn unbind_then_lookup_fails() {
    let mut tree = rabc();
    tree.unbind("A/C").unwrap();
    assert!(tree.lookup("A/C").unwrap_err().is_name_not_found());
}

#[test]
fn unbind_of_unknown_leaf_is_a_no_op() {
    let mut tree = rabc();
    tree.unbind("A/nothing").unwrap();
    assert_eq!(child_names(&tree, "A"), ["C"]);
    assert!(tree.unbind("nothing/x").unwrap_err().is_name_not_found());
}

#[test]
fn rename_failure_modes() {
    let mut tree = rabc();
    assert!(tree.rename("", "B").unwrap_err().is_invalid_name());
    assert!(tree.rename("A", "").unwrap_err().is_invalid_name());
    assert!(tree.rename("A/C", "D").unwrap_err().is_invalid_name());
    assert!(tree.rename("A", "B").unwrap_err().is_name_already_bound());
    assert!(tree.rename("Z", "Y").unwrap_err().is_name_not_found());

    tree.rename("A", "Q").unwrap();
    assert_eq!(child_names(&tree, ""), ["Q", "B"]);
    assert_eq!(child_names(&tree, "Q"), ["C"]);
}

#[test]
fn objects_keep_their_json_value() {
    let mut tree = rabc();
    let value = serde_json::json!({"host": "ldap.example.org", "port": 389});
    tree.bind("B/server", ObjectValue::from(value.clone()), None)
        .unwrap();
    let node = tree.lookup("b/SERVER").unwrap();
    assert_eq!(node.as_object().map(|v| v.as_inner()), Some(&value));
    assert_eq!(node.kind(), BindingKind::Object);
}

#[test]
fn names_compare_case_insensitively_by_default() {
    let mut tree = rabc();
    assert!(tree.lookup("a/c").is_ok());
    assert!(tree
        .create_subcontext("b", None)
        .unwrap_err()
        .is_name_already_bound());

    let mut strict = NamespaceTree::with_options(TreeOptions::new().ignore_case(false));
    strict.create_subcontext("B", None).unwrap();
    strict.create_subcontext("b", None).unwrap();
    assert_eq!(child_names(&strict, ""), ["B", "b"]);
}

proptest! {
    #[test]
    fn list_matches_bound_names(names in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
        let mut tree = NamespaceTree::new();
        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for name in &names {
            let result = tree.bind(name, ObjectValue::from(name.as_str()), None);
            if seen.insert(name.clone()) {
                prop_assert!(result.is_ok());
                expected.push(name.clone());
            } else {
                prop_assert!(result.unwrap_err().is_name_already_bound());
            }
        }
        prop_assert_eq!(child_names(&tree, ""), expected);
    }

    #[test]
    fn unbind_removes_only_the_target(
        names in proptest::collection::hash_set("[a-z]{1,6}", 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut tree = NamespaceTree::new();
        for name in &names {
            tree.create_subcontext(name, None).unwrap();
        }
        let target = pick.get(&names).clone();
        tree.unbind(&target).unwrap();

        let expected: Vec<String> = names.iter().filter(|n| **n != target).cloned().collect();
        prop_assert_eq!(child_names(&tree, ""), expected);
        prop_assert!(tree.lookup(&target).unwrap_err().is_name_not_found());
    }
}
