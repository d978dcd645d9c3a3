//! Deep-merge logic
//!
//! - Objects: deep-merge by key (recursive)
//! - Arrays: REPLACE (patch wins entirely, no concatenation)
//! - Scalars: override (patch wins)
//! - Null: override (null can override any value)

use crate::tree::Tree;

/// Deep merge `patch` onto `base`, consuming both.
pub fn deep_merge(base: Tree, patch: Tree) -> Tree {
    match (base, patch) {
        // Both objects: deep merge
        (Tree::Object(mut base_map), Tree::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, patch_value)
                } else {
                    patch_value
                };
                base_map.insert(key, merged);
            }
            Tree::Object(base_map)
        }

        // Arrays, scalars and mismatched kinds: patch wins
        (_, patch) => patch,
    }
}

/// Deep merge without consuming either side.
///
/// The result is freshly built; neither argument is observed to change.
pub fn merge_onto(base: &Tree, patch: &Tree) -> Tree {
    deep_merge(base.clone(), patch.clone())
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Tree>) -> Tree {
    layers.into_iter().fold(Tree::empty(), deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> Tree {
        Tree::from(value)
    }

    #[test]
    fn test_scalar_override() {
        let result = deep_merge(tree(json!({"hp": 8})), tree(json!({"hp": 12})));
        assert_eq!(result.get("hp").and_then(Tree::as_i64), Some(12));
    }

    #[test]
    fn test_object_deep_merge() {
        let base = tree(json!({"stats": {"ac": 10, "hp": 8}}));
        let patch = tree(json!({"stats": {"ac": 11}}));
        let result = deep_merge(base, patch);

        assert_eq!(result.get_path("stats.ac").and_then(Tree::as_i64), Some(11));
        assert_eq!(result.get_path("stats.hp").and_then(Tree::as_i64), Some(8));
    }

    #[test]
    fn test_array_replace() {
        let base = tree(json!({"quest_hooks": ["a", "b", "c"]}));
        let patch = tree(json!({"quest_hooks": []}));
        let result = deep_merge(base, patch);

        assert_eq!(result.to_json(), json!({"quest_hooks": []}));
    }

    #[test]
    fn test_add_new_key() {
        let result = deep_merge(tree(json!({"a": 1})), tree(json!({"b": 2})));
        assert_eq!(result.to_json(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_null_override() {
        let result = deep_merge(tree(json!({"value": 100})), tree(json!({"value": null})));
        assert!(result.get("value").is_some_and(Tree::is_null));
    }

    #[test]
    fn test_object_replaces_scalar_and_vice_versa() {
        let result = deep_merge(tree(json!({"a": 1, "b": {"x": 1}})), tree(json!({"a": {"y": 2}, "b": 3})));
        assert_eq!(result.to_json(), json!({"a": {"y": 2}, "b": 3}));
    }

    #[test]
    fn test_merge_onto_leaves_inputs_untouched() {
        let base = tree(json!({"stats": {"ac": 10}}));
        let patch = tree(json!({"stats": {"hp": 8}}));
        let base_before = base.clone();
        let patch_before = patch.clone();

        let result = merge_onto(&base, &patch);

        assert_eq!(base, base_before);
        assert_eq!(patch, patch_before);
        assert_eq!(result.to_json(), json!({"stats": {"ac": 10, "hp": 8}}));
    }

    #[test]
    fn test_merge_layers() {
        let result = merge_layers(vec![
            tree(json!({"timeout": 100, "cache": {"mode": "off"}})),
            tree(json!({"timeout": 200})),
            tree(json!({"cache": {"mode": "on"}})),
            tree(json!({"timeout": 50})),
        ]);

        assert_eq!(result.get("timeout").and_then(Tree::as_i64), Some(50));
        assert_eq!(result.get_path("cache.mode").and_then(Tree::as_str), Some("on"));
    }

    #[test]
    fn test_merge_layers_empty() {
        assert_eq!(merge_layers(vec![]), Tree::empty());
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = tree(json!({"level1": {"level2": {"a": 1, "b": 2}}}));
        let patch = tree(json!({"level1": {"level2": {"b": 3, "c": 4}}}));
        let result = deep_merge(base, patch);

        assert_eq!(result.to_json(), json!({"level1": {"level2": {"a": 1, "b": 3, "c": 4}}}));
    }

    fn leaf() -> impl Strategy<Value = Tree> {
        prop_oneof![
            any::<i64>().prop_map(Tree::from),
            any::<bool>().prop_map(Tree::from),
            "[a-z]{0,8}".prop_map(Tree::from),
        ]
    }

    fn arb_tree() -> impl Strategy<Value = Tree> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Tree::Object),
            ]
        })
    }

    fn arb_object() -> impl Strategy<Value = Tree> {
        prop::collection::btree_map("[a-f]", arb_tree(), 0..5).prop_map(Tree::Object)
    }

    proptest! {
        /// Keys the patch does not name survive unchanged
        #[test]
        fn merge_preserves_untouched_keys(base in arb_object(), patch in arb_object()) {
            let merged = merge_onto(&base, &patch);
            for (key, value) in base.as_object().unwrap() {
                if patch.get(key).is_none() {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Every key named by the patch is present in the result
        #[test]
        fn merge_contains_patch_keys(base in arb_object(), patch in arb_object()) {
            let merged = merge_onto(&base, &patch);
            for key in patch.keys() {
                prop_assert!(merged.get(key).is_some());
            }
        }

        /// Applying the same patch twice changes nothing further
        #[test]
        fn merge_is_idempotent(base in arb_object(), patch in arb_object()) {
            let once = merge_onto(&base, &patch);
            let twice = merge_onto(&once, &patch);
            prop_assert_eq!(once, twice);
        }

        /// Patches over disjoint top-level keys commute
        #[test]
        fn disjoint_patches_commute(base in arb_object(), left in arb_object(), right in arb_object()) {
            let right: Tree = right
                .as_object()
                .unwrap()
                .iter()
                .filter(|(k, _)| left.get(k).is_none())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            let lr = merge_layers(vec![base.clone(), left.clone(), right.clone()]);
            let rl = merge_layers(vec![base, right, left]);
            prop_assert_eq!(lr, rl);
        }
    }
}
