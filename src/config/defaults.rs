//! Built-in defaults (layer 1)

use playkit_tree::Tree;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::engine::{GatePolicy, DEFAULT_EMPTY_GATE_POLICY};
use crate::model::Role;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Play kit directory (default: "playkit")
    pub playkit_dir: String,

    /// Viewer role when none is given (default: player)
    pub default_role: Role,

    /// Empty-gate fragment policy (default: never)
    pub empty_gate: GatePolicy,

    /// Log level when RUST_LOG is unset (default: "info")
    pub log_level: String,

    /// Pretty-print JSON output (default: true)
    pub pretty: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            playkit_dir: "playkit".to_string(),
            default_role: Role::Player,
            empty_gate: DEFAULT_EMPTY_GATE_POLICY,
            log_level: "info".to_string(),
            pretty: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a tree for merging
    pub fn to_tree(&self) -> Tree {
        Tree::from(json!({
            "playkit_dir": self.playkit_dir,
            "default_role": self.default_role.as_str(),
            "fragments": {
                "empty_gate": self.empty_gate.as_str()
            },
            "log": {
                "level": self.log_level
            },
            "output": {
                "pretty": self.pretty
            }
        }))
    }
}
