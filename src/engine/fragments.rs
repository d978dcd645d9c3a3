//! Fragment merge
//!
//! Starts from a copy of the entity's core data and deep-merges every
//! fragment whose gate is satisfied, in stored order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use playkit_tree::{deep_merge, Tree};
use serde::{Deserialize, Serialize};

use crate::model::Fragment;
use crate::trace::{ResolutionEvent, ResolutionObserver, SkipReason};

/// How a fragment with no required overlays is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    /// Empty gate is never satisfied (an empty gate is indistinguishable
    /// from a misconfigured one)
    #[serde(rename = "never")]
    NeverApply,
    /// Empty gate is vacuously satisfied: the fragment always applies
    #[serde(rename = "always")]
    AlwaysApply,
}

/// Policy used unless configuration says otherwise
pub const DEFAULT_EMPTY_GATE_POLICY: GatePolicy = GatePolicy::NeverApply;

impl Default for GatePolicy {
    fn default() -> Self {
        DEFAULT_EMPTY_GATE_POLICY
    }
}

impl GatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatePolicy::NeverApply => "never",
            GatePolicy::AlwaysApply => "always",
        }
    }
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(GatePolicy::NeverApply),
            "always" => Ok(GatePolicy::AlwaysApply),
            other => Err(format!("Invalid empty_gate policy: {} (expected never or always)", other)),
        }
    }
}

/// Decide whether a fragment's gate is satisfied by the active set
pub fn check_gate(required: &[String], active: &HashSet<&str>, policy: GatePolicy) -> Result<(), SkipReason> {
    if required.is_empty() {
        return match policy {
            GatePolicy::AlwaysApply => Ok(()),
            GatePolicy::NeverApply => Err(SkipReason::EmptyGate),
        };
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|id| !active.contains(id.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SkipReason::MissingOverlays(missing))
    }
}

/// Merge every satisfied fragment onto a copy of `base`.
///
/// Neither `base` nor any fragment is modified; the returned tree is
/// freshly built.
pub fn merge_fragments(
    base: &Tree,
    fragments: &[Fragment],
    active_overlays: &[String],
    policy: GatePolicy,
    observer: &dyn ResolutionObserver,
) -> Tree {
    let active: HashSet<&str> = active_overlays.iter().map(String::as_str).collect();

    fragments
        .iter()
        .enumerate()
        .fold(base.clone(), |acc, (index, fragment)| {
            match check_gate(&fragment.required_overlays, &active, policy) {
                Ok(()) => {
                    observer.on_event(&ResolutionEvent::FragmentApplied {
                        index,
                        required_overlays: fragment.required_overlays.clone(),
                        keys: fragment.data.keys().iter().map(|k| k.to_string()).collect(),
                    });
                    deep_merge(acc, fragment.data.clone())
                }
                Err(reason) => {
                    observer.on_event(&ResolutionEvent::FragmentSkipped {
                        index,
                        required_overlays: fragment.required_overlays.clone(),
                        reason,
                    });
                    acc
                }
            }
        })
}
