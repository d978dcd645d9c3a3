//! Field visibility rules and viewer roles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-field rule controlling what a restricted viewer may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRule {
    /// Visible to players. Discovery state is not tracked, so this is
    /// currently "always visible".
    PublicWhenDiscovered,
    /// Hidden until the DM reveals it
    DmControlled,
    /// Never shown to players
    DmOnly,
}

impl VisibilityRule {
    pub fn player_visible(&self) -> bool {
        matches!(self, VisibilityRule::PublicWhenDiscovered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityRule::PublicWhenDiscovered => "public_when_discovered",
            VisibilityRule::DmControlled => "dm_controlled",
            VisibilityRule::DmOnly => "dm_only",
        }
    }
}

impl fmt::Display for VisibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is looking at a resolved entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Elevated: the operator running the campaign, sees everything
    Dm,
    /// Restricted: sees only fields whose rule permits it
    Player,
}

impl Role {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Dm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dm => "dm",
            Role::Player => "player",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dm" => Ok(Role::Dm),
            "player" => Ok(Role::Player),
            other => Err(format!("Invalid role: {} (expected dm or player)", other)),
        }
    }
}
