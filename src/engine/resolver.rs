//! Resolution orchestrator
//!
//! A single entry point turns (entity, campaign, role) into the view that
//! role should see:
//! 1. look up the campaign, then the entity
//! 2. collect overrides; a second override of one kind is an error
//! 3. replace: return its data as-is, for every role
//! 4. disable: report the entity as suppressed
//! 5. merge satisfied fragments onto core data, then apply any edit
//! 6. filter top-level fields for the viewer's role

use std::fmt;

use playkit_tree::{DigestError, Tree};
use serde::Serialize;

use super::fragments::{merge_fragments, GatePolicy, DEFAULT_EMPTY_GATE_POLICY};
use super::overrides::{apply_override, OverrideOutcome, OverrideSet};
use super::visibility::filter_with_split;
use crate::catalog::ResolutionSource;
use crate::error::ResolveError;
use crate::model::{BaseEntity, Role};
use crate::trace::{NoopObserver, ResolutionEvent, ResolutionObserver};

static NOOP: NoopObserver = NoopObserver;

/// Which path produced the resolved data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPath {
    /// A replace override, returned verbatim
    Replaced,
    /// Fragments merged, then an edit override merged on top
    Edited,
    /// Fragments merged, no override
    Merged,
}

impl ResolutionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPath::Replaced => "replaced",
            ResolutionPath::Edited => "edited",
            ResolutionPath::Merged => "merged",
        }
    }
}

impl fmt::Display for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntity {
    pub entity_id: String,
    pub campaign_id: String,
    pub role: Role,
    pub path: ResolutionPath,
    pub data: Tree,
}

impl ResolvedEntity {
    /// Digest of the resolved data only
    pub fn digest(&self) -> Result<String, DigestError> {
        self.data.digest()
    }
}

pub struct Resolver<'a, S: ResolutionSource + ?Sized> {
    source: &'a S,
    gate_policy: GatePolicy,
    observer: &'a dyn ResolutionObserver,
}

impl<'a, S: ResolutionSource + ?Sized> Resolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            gate_policy: DEFAULT_EMPTY_GATE_POLICY,
            observer: &NOOP,
        }
    }

    pub fn with_gate_policy(mut self, policy: GatePolicy) -> Self {
        self.gate_policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ResolutionObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn gate_policy(&self) -> GatePolicy {
        self.gate_policy
    }

    pub fn resolve(&self, entity_id: &str, campaign_id: &str, role: Role) -> Result<ResolvedEntity, ResolveError> {
        let campaign = self
            .source
            .campaign(campaign_id)
            .ok_or_else(|| ResolveError::CampaignNotFound(campaign_id.to_string()))?;

        self.observer.on_event(&ResolutionEvent::Started {
            entity_id: entity_id.to_string(),
            campaign_id: campaign_id.to_string(),
            active_overlays: campaign.active_overlays.clone(),
            role,
        });

        let entity = self
            .source
            .entity(entity_id)
            .ok_or_else(|| ResolveError::EntityNotFound(entity_id.to_string()))?;

        self.observer.on_event(&ResolutionEvent::EntityFound {
            entity_id: entity.entity_id.clone(),
            entity_type: entity.entity_type.clone(),
            name: entity.name.clone(),
            core_keys: key_list(&entity.core_data),
        });

        let overrides = OverrideSet::collect(self.source.overrides(campaign_id, entity_id))?;

        let outcome = if overrides.is_terminal() {
            apply_override(&Tree::empty(), &overrides)
        } else {
            let merged = merge_fragments(
                &entity.core_data,
                &entity.conditional_fragments,
                &campaign.active_overlays,
                self.gate_policy,
                self.observer,
            );
            apply_override(&merged, &overrides)
        };

        if let Some(kind) = outcome.kind() {
            self.observer.on_event(&ResolutionEvent::OverrideApplied { kind });
        }

        let (path, data) = match outcome {
            OverrideOutcome::Suppressed => {
                self.observer.on_event(&ResolutionEvent::Suppressed {
                    entity_id: entity.entity_id.clone(),
                    campaign_id: campaign.id.clone(),
                });
                return Err(ResolveError::Suppressed {
                    campaign: campaign_id.to_string(),
                    entity: entity_id.to_string(),
                });
            }
            OverrideOutcome::Replaced(data) => (ResolutionPath::Replaced, data),
            OverrideOutcome::Merged(tree) => (ResolutionPath::Edited, self.filter(tree, entity, role)),
            OverrideOutcome::Unchanged(tree) => (ResolutionPath::Merged, self.filter(tree, entity, role)),
        };

        self.observer.on_event(&ResolutionEvent::Completed {
            path,
            keys: key_list(&data),
        });

        Ok(ResolvedEntity {
            entity_id: entity.entity_id.clone(),
            campaign_id: campaign.id.clone(),
            role,
            path,
            data,
        })
    }

    fn filter(&self, tree: Tree, entity: &BaseEntity, role: Role) -> Tree {
        if role.is_elevated() {
            return tree;
        }

        let (filtered, split) = filter_with_split(&tree, &entity.visibility_rules, role);
        self.observer.on_event(&ResolutionEvent::VisibilityFiltered {
            kept: split.kept,
            dropped: split.dropped,
        });
        filtered
    }
}

fn key_list(tree: &Tree) -> Vec<String> {
    tree.keys().iter().map(|k| k.to_string()).collect()
}
