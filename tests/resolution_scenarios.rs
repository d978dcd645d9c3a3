//! End-to-end resolution against the fixture play kit
//!
//! Each campaign in `tests/fixtures/playkit/campaigns.toml` exercises one
//! path through the resolver: plain merge, stacked fragments, replacement,
//! DM edit, and suppression.

mod fixtures;

use std::collections::BTreeMap;

use fixtures::{fixture_catalog, ids};
use playkit::{
    filter_visibility, validate_active_overlays, BaseEntity, Campaign, Catalog, DmOverride, Fragment, GatePolicy,
    OverlayCatalog, RecordingObserver, ResolutionEvent, ResolutionPath, ResolutionSource, ResolveError, Resolver,
    Role, Tree, Violation, VisibilityRule,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn bran_core() -> serde_json::Value {
    json!({
        "name": "Bran",
        "race": "Human",
        "role": "Bartender",
        "description": "A weathered bartender with kind eyes",
        "stats": {"ac": 10, "hp": 8}
    })
}

// =============================================================================
// Scenarios A-E
// =============================================================================

#[test]
fn scenario_a_no_overlays_returns_base() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog).resolve("npc-bran", "no-overlays", Role::Dm).unwrap();

    assert_eq!(resolved.path, ResolutionPath::Merged);
    assert_eq!(resolved.data.to_json(), bran_core());
}

#[test]
fn scenario_b_single_overlay_adds_fragment() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog).resolve("npc-bran", "recent", Role::Dm).unwrap();

    let mut expected = bran_core();
    expected["personality"] = json!("Skeptical of outsiders");
    expected["items"] = json!(["magical-mace"]);
    assert_eq!(resolved.data.to_json(), expected);
}

#[test]
fn scenario_c_exclusive_overlays_rejected() {
    let catalog = fixture_catalog();
    let result = validate_active_overlays(&ids(&["recently-bubbled", "100-years-bubbled"]), catalog.overlays());

    assert!(!result.accepted);
    let messages = result.messages();
    assert!(messages.contains(&"recently-bubbled is mutually exclusive with 100-years-bubbled".to_string()));
    assert!(messages.contains(&"100-years-bubbled is mutually exclusive with recently-bubbled".to_string()));
}

#[test]
fn scenario_d_replace_ignores_base_and_fragments() {
    let catalog = fixture_catalog();
    let expected = json!({
        "name": "Elena",
        "race": "Human",
        "role": "Bartender",
        "description": "Bran's granddaughter, young and energetic",
        "stats": {"ac": 11, "hp": 12}
    });

    for role in [Role::Dm, Role::Player] {
        let resolved = Resolver::new(&catalog).resolve("npc-bran", "century", role).unwrap();
        assert_eq!(resolved.path, ResolutionPath::Replaced);
        assert_eq!(resolved.data.to_json(), expected, "role {}", role);
    }
}

#[test]
fn scenario_e_player_sees_only_public_fields() {
    let tree = Tree::from(json!({"name": "Bran", "stats": {"ac": 10}}));
    let mut policy = BTreeMap::new();
    policy.insert("name".to_string(), VisibilityRule::PublicWhenDiscovered);
    policy.insert("stats".to_string(), VisibilityRule::DmOnly);

    assert_eq!(filter_visibility(&tree, &policy, Role::Player).to_json(), json!({"name": "Bran"}));
}

// =============================================================================
// Fixture campaigns
// =============================================================================

#[test]
fn test_stacked_fragments() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog).resolve("npc-bran", "recent-storm", Role::Dm).unwrap();

    assert_eq!(
        resolved.data.get("description").and_then(Tree::as_str),
        Some("A weathered bartender with kind eyes and a burn scar on his left cheek")
    );
    assert_eq!(resolved.data.get("quest_hooks").unwrap().to_json(), json!(["recover-roof-materials"]));
    assert_eq!(resolved.data.get("items").unwrap().to_json(), json!(["magical-mace"]));
}

#[test]
fn test_player_view_of_stacked_fragments() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve("npc-bran", "recent-storm", Role::Player)
        .unwrap();

    // race and items carry no rule; personality, stats and quest_hooks are DM-only
    assert_eq!(
        resolved.data.to_json(),
        json!({
            "name": "Bran",
            "role": "Bartender",
            "description": "A weathered bartender with kind eyes and a burn scar on his left cheek"
        })
    );
}

#[test]
fn test_dm_edit_clears_quest_hooks() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog).resolve("npc-bran", "storm", Role::Dm).unwrap();

    assert_eq!(resolved.path, ResolutionPath::Edited);
    assert_eq!(resolved.data.get("quest_hooks").unwrap().to_json(), json!([]));
    assert_eq!(
        resolved.data.get("description").and_then(Tree::as_str),
        Some("A weathered bartender with kind eyes and a burn scar on his left cheek")
    );
}

#[test]
fn test_location_replacement() {
    let catalog = fixture_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve("loc-forgotten-stag", "lockdown", Role::Player)
        .unwrap();

    assert_eq!(resolved.data.get("type").and_then(Tree::as_str), Some("Ruins"));
    assert_eq!(resolved.data.get("name").and_then(Tree::as_str), Some("Former Forgotten Stag"));
}

#[test]
fn test_disabled_entity_reports_not_found() {
    let catalog = fixture_catalog();
    let err = Resolver::new(&catalog).resolve("npc-bran", "lockdown", Role::Dm).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Entity not found");
}

#[test]
fn test_missing_campaign_and_entity_are_distinct() {
    let catalog = fixture_catalog();
    let resolver = Resolver::new(&catalog);

    let campaign = resolver.resolve("npc-bran", "no-such-campaign", Role::Dm).unwrap_err();
    let entity = resolver.resolve("npc-nobody", "recent", Role::Dm).unwrap_err();

    assert_eq!(campaign, ResolveError::CampaignNotFound("no-such-campaign".to_string()));
    assert_eq!(entity, ResolveError::EntityNotFound("npc-nobody".to_string()));
    assert_ne!(campaign.user_message(), entity.user_message());
}

// =============================================================================
// Validator completeness
// =============================================================================

#[test]
fn test_validator_reports_every_violation() {
    let catalog = fixture_catalog();
    let result = validate_active_overlays(
        &ids(&["recently-bubbled", "100-years-bubbled", "no-such-overlay"]),
        catalog.overlays(),
    );

    assert!(result
        .violations
        .contains(&Violation::UnknownOption(ids(&["no-such-overlay"]))));
    assert!(result
        .violations
        .iter()
        .any(|v| matches!(v, Violation::MutuallyExclusiveOptions { .. })));
}

#[test]
fn test_empty_set_is_valid() {
    let catalog = fixture_catalog();
    assert!(validate_active_overlays(&[], catalog.overlays()).accepted);
}

// =============================================================================
// Override precedence and integrity
// =============================================================================

fn single_npc_catalog(overrides: Vec<DmOverride>) -> Result<Catalog, playkit::CatalogError> {
    let npc = BaseEntity::new("npc-bran", "npc", "Bran")
        .with_core_data(Tree::from(json!({"name": "Bran"})))
        .with_rule("name", VisibilityRule::PublicWhenDiscovered);
    Catalog::build(
        OverlayCatalog::new(),
        vec![npc],
        vec![Campaign::new("c1", "Campaign", &[])],
        overrides,
    )
}

#[test]
fn test_disable_wins_over_edit() {
    let catalog = single_npc_catalog(vec![
        DmOverride::edit("c1", "npc-bran", Tree::from(json!({"name": "Bronn"}))),
        DmOverride::disable("c1", "npc-bran"),
    ])
    .unwrap();

    assert!(matches!(
        Resolver::new(&catalog).resolve("npc-bran", "c1", Role::Dm),
        Err(ResolveError::Suppressed { .. })
    ));
}

#[test]
fn test_replace_wins_over_disable() {
    let catalog = single_npc_catalog(vec![
        DmOverride::disable("c1", "npc-bran"),
        DmOverride::replace("c1", "npc-bran", Tree::from(json!({"name": "Elena"}))),
    ])
    .unwrap();

    let resolved = Resolver::new(&catalog).resolve("npc-bran", "c1", Role::Dm).unwrap();
    assert_eq!(resolved.data.to_json(), json!({"name": "Elena"}));
}

#[test]
fn test_duplicate_override_rejected_at_load() {
    let err = single_npc_catalog(vec![
        DmOverride::replace("c1", "npc-bran", Tree::from(json!({"name": "Elena"}))),
        DmOverride::replace("c1", "npc-bran", Tree::from(json!({"name": "Mira"}))),
    ])
    .unwrap_err();

    assert!(err.to_string().contains("more than one 'replace' override"));
}

/// Source that skips load-time checks, to reach the resolver's own guard
struct UncheckedSource {
    entity: BaseEntity,
    campaign: Campaign,
    overrides: Vec<DmOverride>,
}

impl ResolutionSource for UncheckedSource {
    fn entity(&self, entity_id: &str) -> Option<&BaseEntity> {
        (self.entity.entity_id == entity_id).then_some(&self.entity)
    }

    fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        (self.campaign.id == campaign_id).then_some(&self.campaign)
    }

    fn overrides(&self, campaign_id: &str, entity_id: &str) -> Vec<&DmOverride> {
        self.overrides
            .iter()
            .filter(|o| o.applies_to(campaign_id, entity_id))
            .collect()
    }
}

#[test]
fn test_resolver_refuses_ambiguous_overrides() {
    let source = UncheckedSource {
        entity: BaseEntity::new("npc-bran", "npc", "Bran"),
        campaign: Campaign::new("c1", "Campaign", &[]),
        overrides: vec![
            DmOverride::edit("c1", "npc-bran", Tree::from(json!({"a": 1}))),
            DmOverride::edit("c1", "npc-bran", Tree::from(json!({"a": 2}))),
        ],
    };

    let err = Resolver::new(&source).resolve("npc-bran", "c1", Role::Dm).unwrap_err();
    assert!(matches!(err, ResolveError::AmbiguousOverride { .. }));
    assert!(!err.is_not_found());
}

// =============================================================================
// Empty-gate policy
// =============================================================================

fn unconditional_fragment_catalog() -> Catalog {
    let npc = BaseEntity::new("npc-mira", "npc", "Mira")
        .with_core_data(Tree::from(json!({"name": "Mira"})))
        .with_fragment(Fragment::new(&[], Tree::from(json!({"mood": "cheerful"}))));
    Catalog::build(OverlayCatalog::new(), vec![npc], vec![Campaign::new("c1", "Campaign", &[])], vec![]).unwrap()
}

#[test]
fn test_empty_gate_never_applies_by_default() {
    let catalog = unconditional_fragment_catalog();
    let resolver = Resolver::new(&catalog);
    assert_eq!(resolver.gate_policy(), GatePolicy::NeverApply);

    let resolved = resolver.resolve("npc-mira", "c1", Role::Dm).unwrap();
    assert_eq!(resolved.data.to_json(), json!({"name": "Mira"}));
}

#[test]
fn test_empty_gate_always_policy_applies() {
    let catalog = unconditional_fragment_catalog();
    let resolved = Resolver::new(&catalog)
        .with_gate_policy(GatePolicy::AlwaysApply)
        .resolve("npc-mira", "c1", Role::Dm)
        .unwrap();
    assert_eq!(resolved.data.to_json(), json!({"name": "Mira", "mood": "cheerful"}));
}

// =============================================================================
// Determinism and concurrency
// =============================================================================

#[test]
fn test_resolution_is_byte_identical() {
    let catalog = fixture_catalog();
    let resolver = Resolver::new(&catalog);

    let first = resolver.resolve("npc-bran", "recent-storm", Role::Player).unwrap();
    let second = resolver.resolve("npc-bran", "recent-storm", Role::Player).unwrap();

    assert_eq!(
        serde_json::to_vec(&first.data).unwrap(),
        serde_json::to_vec(&second.data).unwrap()
    );
    assert_eq!(first.digest().unwrap(), second.digest().unwrap());
}

#[test]
fn test_concurrent_resolution_shares_catalog() {
    let catalog = fixture_catalog();
    let expected = Resolver::new(&catalog)
        .resolve("npc-bran", "recent-storm", Role::Player)
        .unwrap()
        .digest()
        .unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    Resolver::new(&catalog)
                        .resolve("npc-bran", "recent-storm", Role::Player)
                        .unwrap()
                        .digest()
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_trace_records_skipped_fragment() {
    let catalog = fixture_catalog();
    let recorder = RecordingObserver::new();
    Resolver::new(&catalog)
        .with_observer(&recorder)
        .resolve("npc-bran", "recent", Role::Dm)
        .unwrap();

    let skipped: Vec<usize> = recorder
        .events()
        .iter()
        .filter_map(|e| match e {
            ResolutionEvent::FragmentSkipped { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![1]);
    assert!(recorder.render().contains("inactive overlays [elemental-maelstorm]"));
}
