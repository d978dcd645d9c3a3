//! Operator overrides scoped to a (campaign, entity) pair

use std::fmt;
use std::str::FromStr;

use playkit_tree::Tree;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    /// Substitute the whole resolved view
    Replace,
    /// Suppress the entity entirely
    Disable,
    /// Deep-merge on top of the resolved view
    Edit,
}

impl OverrideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideKind::Replace => "replace",
            OverrideKind::Disable => "disable",
            OverrideKind::Edit => "edit",
        }
    }

    /// Whether this kind carries data
    pub fn requires_data(&self) -> bool {
        !matches!(self, OverrideKind::Disable)
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(OverrideKind::Replace),
            "disable" => Ok(OverrideKind::Disable),
            "edit" => Ok(OverrideKind::Edit),
            other => Err(format!("Invalid override type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmOverride {
    pub campaign_id: String,
    pub entity_id: String,
    pub override_type: OverrideKind,

    /// Absent for `disable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_data: Option<Tree>,
}

impl DmOverride {
    pub fn replace(campaign_id: &str, entity_id: &str, data: Tree) -> Self {
        Self::with_data(campaign_id, entity_id, OverrideKind::Replace, Some(data))
    }

    pub fn disable(campaign_id: &str, entity_id: &str) -> Self {
        Self::with_data(campaign_id, entity_id, OverrideKind::Disable, None)
    }

    pub fn edit(campaign_id: &str, entity_id: &str, data: Tree) -> Self {
        Self::with_data(campaign_id, entity_id, OverrideKind::Edit, Some(data))
    }

    fn with_data(campaign_id: &str, entity_id: &str, kind: OverrideKind, data: Option<Tree>) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            entity_id: entity_id.to_string(),
            override_type: kind,
            override_data: data,
        }
    }

    pub fn applies_to(&self, campaign_id: &str, entity_id: &str) -> bool {
        self.campaign_id == campaign_id && self.entity_id == entity_id
    }
}
