//! Domain model
//!
//! Overlays live in `playkit-validator`; everything a campaign resolves
//! against lives here: entities and their fragments, campaigns, operator
//! overrides, and the visibility rules applied per viewer role.

mod campaign;
mod dm_override;
mod entity;
mod visibility;

pub use campaign::{Campaign, CampaignError, CampaignProblem};
pub use dm_override::{DmOverride, OverrideKind};
pub use entity::{check_integrity, BaseEntity, EntityIssue, Fragment};
pub use visibility::{Role, VisibilityRule};
