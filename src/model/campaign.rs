//! Campaigns: a named configuration of active overlays

use std::fmt;

use playkit_validator::{validate_active_overlays, OverlayCatalog, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Stable identifier used to key overrides
    pub id: String,

    pub name: String,

    /// Play kit this campaign draws from (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_kit_id: Option<String>,

    /// Ordered set of active overlay ids
    #[serde(default)]
    pub active_overlays: Vec<String>,
}

impl Campaign {
    pub fn new(id: &str, name: &str, active_overlays: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            play_kit_id: None,
            active_overlays: active_overlays.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check the name and the active overlay set, reporting every problem
    pub fn validate(&self, overlays: &OverlayCatalog) -> Result<(), CampaignError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push(CampaignProblem::BlankName);
        }

        let result = validate_active_overlays(&self.active_overlays, overlays);
        problems.extend(result.violations.into_iter().map(CampaignProblem::Overlays));

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CampaignError::Invalid {
                campaign: self.id.clone(),
                problems,
            })
        }
    }
}

/// A single reason a campaign is invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignProblem {
    BlankName,
    Overlays(Violation),
}

impl fmt::Display for CampaignProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignProblem::BlankName => f.write_str("name can't be blank"),
            CampaignProblem::Overlays(v) => write!(f, "active_overlays: {}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CampaignError {
    #[error("Campaign '{campaign}' is invalid: {}", join_problems(.problems))]
    Invalid {
        campaign: String,
        problems: Vec<CampaignProblem>,
    },
}

impl CampaignError {
    pub fn problems(&self) -> &[CampaignProblem] {
        match self {
            CampaignError::Invalid { problems, .. } => problems,
        }
    }
}

fn join_problems(problems: &[CampaignProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
