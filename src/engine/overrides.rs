//! Override layer
//!
//! Overrides for one (campaign, entity) pair are first collected into an
//! [`OverrideSet`], which refuses a second override of the same kind.
//! [`apply_override`] then applies them with fixed precedence:
//! replace, then disable, then edit.

use playkit_tree::{merge_onto, Tree};

use crate::error::ResolveError;
use crate::model::{DmOverride, OverrideKind};

/// At most one override of each kind for a single (campaign, entity) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    replace: Option<Tree>,
    disable: bool,
    edit: Option<Tree>,
}

impl OverrideSet {
    pub fn none() -> Self {
        Self::default()
    }

    /// Build the set, rejecting duplicate kinds and data-less replace/edit
    pub fn collect<'a, I>(overrides: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = &'a DmOverride>,
    {
        let mut set = Self::none();

        for o in overrides {
            let ambiguous = || ResolveError::AmbiguousOverride {
                campaign: o.campaign_id.clone(),
                entity: o.entity_id.clone(),
                kind: o.override_type,
            };

            if !o.override_type.requires_data() {
                if set.disable {
                    return Err(ambiguous());
                }
                set.disable = true;
                continue;
            }

            let data = o.override_data.clone().ok_or_else(|| ResolveError::MissingOverrideData {
                campaign: o.campaign_id.clone(),
                entity: o.entity_id.clone(),
                kind: o.override_type,
            })?;

            let slot = if o.override_type == OverrideKind::Replace {
                &mut set.replace
            } else {
                &mut set.edit
            };

            if slot.is_some() {
                return Err(ambiguous());
            }
            *slot = Some(data);
        }

        Ok(set)
    }

    pub fn replacement(&self) -> Option<&Tree> {
        self.replace.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disable
    }

    pub fn edit(&self) -> Option<&Tree> {
        self.edit.as_ref()
    }

    /// True if the outcome does not depend on the merged tree
    pub fn is_terminal(&self) -> bool {
        self.replace.is_some() || self.disable
    }
}

/// Result of applying an override set to a resolved tree
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideOutcome {
    /// Treat the entity as not found
    Suppressed,
    /// Use the override data verbatim
    Replaced(Tree),
    /// Edit data merged onto the resolved tree
    Merged(Tree),
    Unchanged(Tree),
}

impl OverrideOutcome {
    pub fn into_tree(self) -> Option<Tree> {
        match self {
            OverrideOutcome::Suppressed => None,
            OverrideOutcome::Replaced(t) | OverrideOutcome::Merged(t) | OverrideOutcome::Unchanged(t) => Some(t),
        }
    }

    /// Override kind that produced this outcome, if any
    pub fn kind(&self) -> Option<OverrideKind> {
        match self {
            OverrideOutcome::Suppressed => Some(OverrideKind::Disable),
            OverrideOutcome::Replaced(_) => Some(OverrideKind::Replace),
            OverrideOutcome::Merged(_) => Some(OverrideKind::Edit),
            OverrideOutcome::Unchanged(_) => None,
        }
    }
}

/// Apply overrides to `resolved` (not modified)
pub fn apply_override(resolved: &Tree, overrides: &OverrideSet) -> OverrideOutcome {
    if let Some(replacement) = overrides.replacement() {
        return OverrideOutcome::Replaced(replacement.clone());
    }

    if overrides.is_disabled() {
        return OverrideOutcome::Suppressed;
    }

    match overrides.edit() {
        Some(edit) => OverrideOutcome::Merged(merge_onto(resolved, edit)),
        None => OverrideOutcome::Unchanged(resolved.clone()),
    }
}
