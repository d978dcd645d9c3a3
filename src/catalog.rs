//! Lookup seam for the resolver and its in-memory implementation
//!
//! The resolver never loads anything itself; it asks a [`ResolutionSource`]
//! for the campaign, entity, and overrides of one request. [`Catalog`] is
//! a validated snapshot of a whole play kit and the source used by the CLI
//! and the tests.

use std::collections::BTreeMap;

use playkit_validator::OverlayCatalog;

use crate::engine::OverrideSet;
use crate::error::ResolveError;
use crate::model::{check_integrity, BaseEntity, Campaign, CampaignError, DmOverride, EntityIssue};

/// What the resolver needs from its surroundings
pub trait ResolutionSource: Send + Sync {
    fn entity(&self, entity_id: &str) -> Option<&BaseEntity>;

    fn campaign(&self, campaign_id: &str) -> Option<&Campaign>;

    /// Every override stored for the pair, in load order
    fn overrides(&self, campaign_id: &str, entity_id: &str) -> Vec<&DmOverride>;
}

/// One reason a catalog was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogProblem {
    #[error("{0}")]
    Entity(#[from] EntityIssue),

    #[error("{0}")]
    Campaign(#[from] CampaignError),

    #[error("Campaign '{0}': id has already been taken")]
    DuplicateCampaign(String),

    #[error("Override for entity '{entity}' references unknown campaign '{campaign}'")]
    OverrideUnknownCampaign { campaign: String, entity: String },

    #[error("Override in campaign '{campaign}' references unknown entity '{entity}'")]
    OverrideUnknownEntity { campaign: String, entity: String },

    #[error("{0}")]
    Override(#[from] ResolveError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Play kit is invalid ({} problem(s)): {}", .problems.len(), join_problems(.problems))]
    Invalid { problems: Vec<CatalogProblem> },
}

impl CatalogError {
    pub fn from_problems(problems: Vec<CatalogProblem>) -> Self {
        CatalogError::Invalid { problems }
    }

    pub fn problems(&self) -> &[CatalogProblem] {
        match self {
            CatalogError::Invalid { problems } => problems,
        }
    }

    pub fn into_problems(self) -> Vec<CatalogProblem> {
        match self {
            CatalogError::Invalid { problems } => problems,
        }
    }
}

fn join_problems(problems: &[CatalogProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validated, immutable-once-built snapshot of a play kit
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overlays: OverlayCatalog,
    entities: BTreeMap<String, BaseEntity>,
    campaigns: BTreeMap<String, Campaign>,
    /// campaign id -> entity id -> overrides
    overrides: BTreeMap<String, BTreeMap<String, Vec<DmOverride>>>,
}

impl Catalog {
    /// Build a catalog, reporting every integrity problem at once
    pub fn build(
        overlays: OverlayCatalog,
        entities: Vec<BaseEntity>,
        campaigns: Vec<Campaign>,
        overrides: Vec<DmOverride>,
    ) -> Result<Self, CatalogError> {
        let mut problems: Vec<CatalogProblem> = check_integrity(&entities)
            .into_iter()
            .map(CatalogProblem::Entity)
            .collect();

        let mut catalog = Catalog {
            overlays,
            ..Default::default()
        };

        for entity in entities {
            catalog.entities.entry(entity.entity_id.clone()).or_insert(entity);
        }

        for campaign in campaigns {
            if catalog.campaigns.contains_key(&campaign.id) {
                problems.push(CatalogProblem::DuplicateCampaign(campaign.id.clone()));
                continue;
            }
            if let Err(e) = campaign.validate(&catalog.overlays) {
                problems.push(CatalogProblem::Campaign(e));
            }
            catalog.campaigns.insert(campaign.id.clone(), campaign);
        }

        for o in overrides {
            if let Some(problem) = catalog.dangling_reference(&o) {
                problems.push(problem);
                continue;
            }
            catalog
                .overrides
                .entry(o.campaign_id.clone())
                .or_default()
                .entry(o.entity_id.clone())
                .or_default()
                .push(o);
        }

        for per_entity in catalog.overrides.values() {
            for group in per_entity.values() {
                if let Err(e) = OverrideSet::collect(group) {
                    problems.push(CatalogProblem::Override(e));
                }
            }
        }

        if problems.is_empty() {
            tracing::debug!(
                entities = catalog.entities.len(),
                campaigns = catalog.campaigns.len(),
                overlays = catalog.overlays.len(),
                "catalog built"
            );
            Ok(catalog)
        } else {
            for problem in &problems {
                tracing::warn!("{}", problem);
            }
            Err(CatalogError::from_problems(problems))
        }
    }

    /// Insert or update an entity by id.
    ///
    /// The updated entity set must still pass integrity checks; on failure
    /// the catalog is left unchanged. Returns the previous definition.
    pub fn upsert_entity(&mut self, entity: BaseEntity) -> Result<Option<BaseEntity>, CatalogError> {
        let issues = check_integrity(
            self.entities
                .values()
                .filter(|e| e.entity_id != entity.entity_id)
                .chain(std::iter::once(&entity)),
        );
        if !issues.is_empty() {
            return Err(CatalogError::from_problems(
                issues.into_iter().map(CatalogProblem::Entity).collect(),
            ));
        }

        tracing::debug!(entity = %entity.entity_id, "upsert entity");
        Ok(self.entities.insert(entity.entity_id.clone(), entity))
    }

    pub fn add_campaign(&mut self, campaign: Campaign) -> Result<(), CatalogError> {
        if self.campaigns.contains_key(&campaign.id) {
            return Err(CatalogError::from_problems(vec![CatalogProblem::DuplicateCampaign(
                campaign.id,
            )]));
        }
        campaign
            .validate(&self.overlays)
            .map_err(|e| CatalogError::from_problems(vec![CatalogProblem::Campaign(e)]))?;

        self.campaigns.insert(campaign.id.clone(), campaign);
        Ok(())
    }

    /// Store an override, refusing a second one of the same kind
    pub fn put_override(&mut self, o: DmOverride) -> Result<(), CatalogError> {
        if let Some(problem) = self.dangling_reference(&o) {
            return Err(CatalogError::from_problems(vec![problem]));
        }

        let group = self
            .overrides
            .entry(o.campaign_id.clone())
            .or_default()
            .entry(o.entity_id.clone())
            .or_default();

        OverrideSet::collect(group.iter().chain(std::iter::once(&o)))
            .map_err(|e| CatalogError::from_problems(vec![CatalogProblem::Override(e)]))?;

        group.push(o);
        Ok(())
    }

    fn dangling_reference(&self, o: &DmOverride) -> Option<CatalogProblem> {
        if !self.campaigns.contains_key(&o.campaign_id) {
            return Some(CatalogProblem::OverrideUnknownCampaign {
                campaign: o.campaign_id.clone(),
                entity: o.entity_id.clone(),
            });
        }
        if !self.entities.contains_key(&o.entity_id) {
            return Some(CatalogProblem::OverrideUnknownEntity {
                campaign: o.campaign_id.clone(),
                entity: o.entity_id.clone(),
            });
        }
        None
    }

    pub fn overlays(&self) -> &OverlayCatalog {
        &self.overlays
    }

    pub fn entities(&self) -> impl Iterator<Item = &BaseEntity> {
        self.entities.values()
    }

    pub fn campaigns(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.values()
    }

    pub fn override_count(&self) -> usize {
        self.overrides
            .values()
            .flat_map(|per_entity| per_entity.values())
            .map(Vec::len)
            .sum()
    }

    /// Counts of (overlays, entities, campaigns, overrides)
    pub fn summary(&self) -> (usize, usize, usize, usize) {
        (
            self.overlays.len(),
            self.entities.len(),
            self.campaigns.len(),
            self.override_count(),
        )
    }
}

impl ResolutionSource for Catalog {
    fn entity(&self, entity_id: &str) -> Option<&BaseEntity> {
        self.entities.get(entity_id)
    }

    fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.get(campaign_id)
    }

    fn overrides(&self, campaign_id: &str, entity_id: &str) -> Vec<&DmOverride> {
        self.overrides
            .get(campaign_id)
            .and_then(|per_entity| per_entity.get(entity_id))
            .map(|group| group.iter().collect())
            .unwrap_or_default()
    }
}
