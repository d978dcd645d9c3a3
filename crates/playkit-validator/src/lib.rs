//! Consistency validation for active overlay sets.
//!
//! A campaign activates some subset of a play kit's overlays. The set is
//! valid when it has no duplicates, every id is defined, and no two active
//! overlays exclude each other. All checks run; every violation present is
//! reported in a single pass.

mod overlay;
mod result;

pub use overlay::{Overlay, OverlayCatalog, OverlayCatalogError, OverlayKind};
pub use result::{ValidationResult, Violation};

use std::collections::HashSet;

use playkit_tree::Tree;

/// Validate a raw configured value for a campaign's active overlays.
///
/// `Null` is treated as the empty set. Any other value that isn't an array
/// is rejected with `InvalidShape` alone; non-string elements are each
/// reported and the remaining string ids are still checked.
pub fn validate_overlay_set(input: &Tree, catalog: &OverlayCatalog) -> ValidationResult {
    if input.is_null() {
        return ValidationResult::from_violations(Vec::new());
    }

    let Some(items) = input.as_array() else {
        return ValidationResult::from_violations(vec![Violation::InvalidShape(format!(
            "got {}",
            input.kind_name()
        ))]);
    };

    let mut violations = Vec::new();
    let mut ids = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(id) => ids.push(id.to_string()),
            None => violations.push(Violation::InvalidShape(format!(
                "element {} is {}, expected string",
                index,
                item.kind_name()
            ))),
        }
    }

    violations.extend(check_ids(&ids, catalog));
    ValidationResult::from_violations(violations)
}

/// Validate an already-typed list of active overlay ids.
pub fn validate_active_overlays(ids: &[String], catalog: &OverlayCatalog) -> ValidationResult {
    ValidationResult::from_violations(check_ids(ids, catalog))
}

fn check_ids(ids: &[String], catalog: &OverlayCatalog) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Check duplicates (first one only)
    let mut seen = HashSet::new();
    if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
        violations.push(Violation::DuplicateOption(dup.clone()));
    }

    let distinct = distinct_in_order(ids);

    // Check unknown ids
    let unknown: Vec<String> = distinct
        .iter()
        .filter(|id| !catalog.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        violations.push(Violation::UnknownOption(unknown));
    }

    // Check mutual exclusion, in both declared directions
    for option in &distinct {
        let conflicts: Vec<String> = distinct
            .iter()
            .filter(|other| *other != option && catalog.are_exclusive(option, other))
            .map(|other| other.to_string())
            .collect();
        if !conflicts.is_empty() {
            violations.push(Violation::MutuallyExclusiveOptions {
                option: option.to_string(),
                conflicts,
            });
        }
    }

    violations
}

fn distinct_in_order(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn catalog() -> OverlayCatalog {
        OverlayCatalog::from_overlays(vec![
            Overlay::new("recently-bubbled", "Recently Bubbled", OverlayKind::Major)
                .excluding(&["100-years-bubbled"]),
            Overlay::new("100-years-bubbled", "100 Years Bubbled", OverlayKind::Major)
                .excluding(&["recently-bubbled"]),
            Overlay::new("elemental-maelstorm", "Elemental Maelstorm", OverlayKind::Flavor),
            Overlay::new("political-lockdown", "Political Lockdown", OverlayKind::Flavor),
        ])
        .unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accept_empty_set() {
        let result = validate_active_overlays(&[], &catalog());
        assert!(result.accepted);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_accept_null_input() {
        assert!(validate_overlay_set(&Tree::null(), &catalog()).accepted);
    }

    #[test]
    fn test_accept_compatible_set() {
        let result = validate_active_overlays(&ids(&["recently-bubbled", "elemental-maelstorm"]), &catalog());
        assert!(result.accepted, "unexpected violations: {:?}", result.violations);
    }

    #[test]
    fn test_reject_mutually_exclusive_names_both() {
        let result = validate_active_overlays(&ids(&["recently-bubbled", "100-years-bubbled"]), &catalog());
        assert!(!result.accepted);
        assert_eq!(
            result.violations,
            vec![
                Violation::MutuallyExclusiveOptions {
                    option: "recently-bubbled".to_string(),
                    conflicts: ids(&["100-years-bubbled"]),
                },
                Violation::MutuallyExclusiveOptions {
                    option: "100-years-bubbled".to_string(),
                    conflicts: ids(&["recently-bubbled"]),
                },
            ]
        );
    }

    #[test]
    fn test_one_sided_exclusion_still_conflicts() {
        let catalog = OverlayCatalog::from_overlays(vec![
            Overlay::new("a", "A", OverlayKind::Major).excluding(&["b"]),
            Overlay::new("b", "B", OverlayKind::Major),
        ])
        .unwrap();

        // Order does not matter: b never declared the exclusion
        let result = validate_active_overlays(&ids(&["b", "a"]), &catalog);
        assert!(!result.accepted);
        assert!(result.violations.iter().any(|v| matches!(
            v,
            Violation::MutuallyExclusiveOptions { option, conflicts }
                if option == "b" && conflicts == &ids(&["a"])
        )));
    }

    #[test]
    fn test_reject_unknown_lists_every_id() {
        let result = validate_active_overlays(
            &ids(&["recently-bubbled", "non-existent-overlay", "also-missing"]),
            &catalog(),
        );
        assert_eq!(
            result.violations,
            vec![Violation::UnknownOption(ids(&["non-existent-overlay", "also-missing"]))]
        );
    }

    #[test]
    fn test_reject_first_duplicate() {
        let result = validate_active_overlays(
            &ids(&["recently-bubbled", "elemental-maelstorm", "elemental-maelstorm", "recently-bubbled"]),
            &catalog(),
        );
        assert_eq!(
            result.violations,
            vec![Violation::DuplicateOption("elemental-maelstorm".to_string())]
        );
        assert!(result.messages()[0].contains("duplicate"));
    }

    #[test]
    fn test_duplicate_does_not_self_conflict() {
        let result = validate_active_overlays(&ids(&["recently-bubbled", "recently-bubbled"]), &catalog());
        assert_eq!(result.violations.len(), 1);
        assert!(matches!(result.violations[0], Violation::DuplicateOption(_)));
    }

    #[test]
    fn test_accumulates_independent_violations() {
        let result = validate_active_overlays(
            &ids(&["recently-bubbled", "ghost", "100-years-bubbled", "ghost"]),
            &catalog(),
        );
        let codes = result.codes();
        assert!(codes.contains(&"DUPLICATE_OPTION:ghost".to_string()));
        assert!(codes.contains(&"UNKNOWN_OPTION:ghost".to_string()));
        assert!(codes
            .iter()
            .any(|c| c.starts_with("MUTUALLY_EXCLUSIVE:recently-bubbled")));
    }

    #[test]
    fn test_reject_scalar_shape() {
        let result = validate_overlay_set(&Tree::from("not-an-array"), &catalog());
        assert_eq!(
            result.violations,
            vec![Violation::InvalidShape("got string".to_string())]
        );
        assert!(result.messages()[0].contains("must be an array"));
    }

    #[test]
    fn test_reject_non_string_elements_and_keep_checking() {
        let input = Tree::from(json!(["recently-bubbled", 7, "ghost"]));
        let result = validate_overlay_set(&input, &catalog());
        assert_eq!(
            result.violations,
            vec![
                Violation::InvalidShape("element 1 is integer, expected string".to_string()),
                Violation::UnknownOption(ids(&["ghost"])),
            ]
        );
    }
}
