//! Resolution errors

use crate::model::OverrideKind;

/// Why a resolution request produced no entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// A `disable` override applies
    #[error("Entity '{entity}' is disabled in campaign '{campaign}'")]
    Suppressed { campaign: String, entity: String },

    /// More than one override of the same kind for one (campaign, entity)
    #[error("Ambiguous override: campaign '{campaign}' has more than one '{kind}' override for entity '{entity}'")]
    AmbiguousOverride {
        campaign: String,
        entity: String,
        kind: OverrideKind,
    },

    #[error("Override '{kind}' for entity '{entity}' in campaign '{campaign}' has no override_data")]
    MissingOverrideData {
        campaign: String,
        entity: String,
        kind: OverrideKind,
    },
}

impl ResolveError {
    /// True for the 404-equivalent outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::CampaignNotFound(_)
                | ResolveError::EntityNotFound(_)
                | ResolveError::Suppressed { .. }
        )
    }

    /// Message for the calling boundary. A suppressed entity is reported
    /// exactly like a missing one.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::CampaignNotFound(_) => "Campaign not found",
            ResolveError::EntityNotFound(_) | ResolveError::Suppressed { .. } => "Entity not found",
            ResolveError::AmbiguousOverride { .. } | ResolveError::MissingOverrideData { .. } => {
                "Override data is inconsistent"
            }
        }
    }
}
