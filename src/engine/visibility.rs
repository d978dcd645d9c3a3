//! Visibility filter
//!
//! Top-level only. Players see a field only if its rule says so; a field
//! with no rule is hidden.

use std::collections::BTreeMap;

use playkit_tree::Tree;

use crate::model::{Role, VisibilityRule};

/// Split of top-level keys made by the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSplit {
    pub kept: Vec<String>,
    pub dropped: Vec<String>,
}

pub fn filter_visibility(resolved: &Tree, rules: &BTreeMap<String, VisibilityRule>, role: Role) -> Tree {
    filter_with_split(resolved, rules, role).0
}

/// Like [`filter_visibility`] but also reports which keys were kept
pub fn filter_with_split(
    resolved: &Tree,
    rules: &BTreeMap<String, VisibilityRule>,
    role: Role,
) -> (Tree, FieldSplit) {
    if role.is_elevated() {
        let split = FieldSplit {
            kept: resolved.keys().iter().map(|k| k.to_string()).collect(),
            dropped: Vec::new(),
        };
        return (resolved.clone(), split);
    }

    let Some(fields) = resolved.as_object() else {
        return (Tree::empty(), FieldSplit::default());
    };

    let mut split = FieldSplit::default();
    let visible: BTreeMap<String, Tree> = fields
        .iter()
        .filter(|(key, _)| {
            let keep = rules.get(key.as_str()).is_some_and(VisibilityRule::player_visible);
            if keep {
                split.kept.push(key.to_string());
            } else {
                split.dropped.push(key.to_string());
            }
            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    (Tree::Object(visible), split)
}
