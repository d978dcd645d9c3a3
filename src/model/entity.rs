//! Base entities and their conditional fragments

use std::collections::{BTreeMap, HashMap, HashSet};

use playkit_tree::Tree;
use serde::{Deserialize, Serialize};

use super::visibility::VisibilityRule;

/// A gated patch merged onto an entity's core data when every
/// required overlay is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub required_overlays: Vec<String>,

    #[serde(default)]
    pub data: Tree,
}

impl Fragment {
    pub fn new(required_overlays: &[&str], data: Tree) -> Self {
        Self {
            required_overlays: required_overlays.iter().map(|s| s.to_string()).collect(),
            data,
        }
    }
}

/// The canonical, overlay-independent definition of a resolvable thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseEntity {
    /// Stable identifier (e.g. "npc-bran")
    pub entity_id: String,

    /// Category tag (e.g. "npc", "location")
    pub entity_type: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub core_data: Tree,

    /// Applied in stored order; later fragments win on conflicts
    #[serde(default)]
    pub conditional_fragments: Vec<Fragment>,

    /// Top-level field name -> rule. Fields with no rule are hidden from players.
    #[serde(default)]
    pub visibility_rules: BTreeMap<String, VisibilityRule>,

    /// Entity this one supersedes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,

    /// Overlays this entity is meant to appear under. Stored only.
    #[serde(default)]
    pub show_when: Vec<String>,
}

impl BaseEntity {
    pub fn new(entity_id: &str, entity_type: &str, name: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            entity_type: entity_type.to_string(),
            name: name.to_string(),
            core_data: Tree::empty(),
            conditional_fragments: Vec::new(),
            visibility_rules: BTreeMap::new(),
            replaces: None,
            show_when: Vec::new(),
        }
    }

    pub fn with_core_data(mut self, core_data: Tree) -> Self {
        self.core_data = core_data;
        self
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.conditional_fragments.push(fragment);
        self
    }

    pub fn with_rule(mut self, field: &str, rule: VisibilityRule) -> Self {
        self.visibility_rules.insert(field.to_string(), rule);
        self
    }

    pub fn replacing(mut self, target: &str) -> Self {
        self.replaces = Some(target.to_string());
        self
    }

    /// Field-level checks that need no other entities
    pub fn check_fields(&self) -> Vec<EntityIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("entity_id", &self.entity_id),
            ("entity_type", &self.entity_type),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                issues.push(EntityIssue::BlankField {
                    entity_id: self.entity_id.clone(),
                    field: field.to_string(),
                });
            }
        }
        issues
    }
}

/// Integrity problems among a set of entities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIssue {
    #[error("Entity '{entity_id}': {field} can't be blank")]
    BlankField { entity_id: String, field: String },

    #[error("Entity '{0}': entity_id has already been taken")]
    DuplicateId(String),

    #[error("Entity '{entity_id}': replaces must reference an existing entity_id ({target} not found)")]
    ReplacesMissing { entity_id: String, target: String },

    #[error("Entity '{0}': replaces cannot replace itself")]
    ReplacesSelf(String),

    #[error("Entity '{entity_id}': '{target}' is already replaced by '{existing}'")]
    DuplicateReplacement {
        entity_id: String,
        target: String,
        existing: String,
    },
}

/// Check a whole entity set, collecting every issue.
///
/// Covers field presence, id uniqueness, and the `replaces` reference:
/// it must name another existing entity, and at most one entity may
/// replace any given target.
pub fn check_integrity<'a, I>(entities: I) -> Vec<EntityIssue>
where
    I: IntoIterator<Item = &'a BaseEntity>,
{
    let entities: Vec<&BaseEntity> = entities.into_iter().collect();
    let mut issues = Vec::new();

    let mut ids = HashSet::new();
    for entity in &entities {
        issues.extend(entity.check_fields());
        if !ids.insert(entity.entity_id.as_str()) {
            issues.push(EntityIssue::DuplicateId(entity.entity_id.clone()));
        }
    }

    let mut replaced_by: HashMap<&str, &str> = HashMap::new();
    for entity in &entities {
        let Some(target) = entity.replaces.as_deref() else {
            continue;
        };

        if target == entity.entity_id {
            issues.push(EntityIssue::ReplacesSelf(entity.entity_id.clone()));
            continue;
        }
        if !ids.contains(target) {
            issues.push(EntityIssue::ReplacesMissing {
                entity_id: entity.entity_id.clone(),
                target: target.to_string(),
            });
        }
        if let Some(existing) = replaced_by.insert(target, entity.entity_id.as_str()) {
            issues.push(EntityIssue::DuplicateReplacement {
                entity_id: entity.entity_id.clone(),
                target: target.to_string(),
                existing: existing.to_string(),
            });
            // keep the first claimant on record
            replaced_by.insert(target, existing);
        }
    }

    issues
}
