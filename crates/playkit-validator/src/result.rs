//! Validation result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single problem with an active overlay set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail")]
pub enum Violation {
    /// An overlay id appears more than once (first duplicate only).
    #[serde(rename = "DUPLICATE_OPTION")]
    DuplicateOption(String),

    /// Overlay ids with no matching definition.
    #[serde(rename = "UNKNOWN_OPTION")]
    UnknownOption(Vec<String>),

    /// An active overlay conflicts with other active overlays.
    #[serde(rename = "MUTUALLY_EXCLUSIVE")]
    MutuallyExclusiveOptions { option: String, conflicts: Vec<String> },

    /// The input is not a list of overlay ids.
    #[serde(rename = "INVALID_SHAPE")]
    InvalidShape(String),
}

impl Violation {
    /// Get a machine-readable string representation.
    pub fn to_code(&self) -> String {
        match self {
            Violation::DuplicateOption(id) => format!("DUPLICATE_OPTION:{}", id),
            Violation::UnknownOption(ids) => format!("UNKNOWN_OPTION:{}", ids.join(",")),
            Violation::MutuallyExclusiveOptions { option, conflicts } => {
                format!("MUTUALLY_EXCLUSIVE:{},{}", option, conflicts.join(","))
            }
            Violation::InvalidShape(detail) => format!("INVALID_SHAPE:{}", detail),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateOption(id) => write!(f, "duplicate overlay id: {}", id),
            Violation::UnknownOption(ids) => write!(f, "unknown overlay ids: {}", ids.join(", ")),
            Violation::MutuallyExclusiveOptions { option, conflicts } => {
                write!(f, "{} is mutually exclusive with {}", option, conflicts.join(", "))
            }
            Violation::InvalidShape(detail) => write!(f, "must be an array of overlay ids ({})", detail),
        }
    }
}

/// Outcome of validating an active overlay set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    /// True iff there are no violations.
    pub accepted: bool,

    /// Every violation found, in check order.
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            accepted: violations.is_empty(),
            violations,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.accepted
    }

    pub fn codes(&self) -> Vec<String> {
        self.violations.iter().map(Violation::to_code).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    /// Render a human-readable report for the given input ids
    pub fn explain(&self, input: &[String]) -> String {
        let mut lines = Vec::new();

        let shown = if input.is_empty() {
            "(none)".to_string()
        } else {
            input.join(", ")
        };
        lines.push(format!("Active overlays: {}", shown));
        lines.push(String::new());

        if self.accepted {
            lines.push("Decision: VALID".to_string());
        } else {
            lines.push("Decision: INVALID".to_string());
            lines.push(String::new());
            lines.push("Violations:".to_string());
            for violation in &self.violations {
                lines.push(format!("  - {}", violation));
            }
        }

        lines.join("\n")
    }
}
