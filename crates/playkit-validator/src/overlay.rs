//! Overlay definitions and the catalog of known overlays.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overlay category. Exactly one per overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    /// Changes the premise of the setting
    Major,
    /// Adds texture on top of whatever premise is active
    Flavor,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Major => "major",
            OverlayKind::Flavor => "flavor",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlayKind {
    type Err = OverlayCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(OverlayKind::Major),
            "flavor" => Ok(OverlayKind::Flavor),
            other => Err(OverlayCatalogError::InvalidKind(other.to_string())),
        }
    }
}

/// A named, independently toggleable configuration switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// Stable identifier (e.g. "recently-bubbled")
    pub overlay_id: String,

    /// Display name
    pub name: String,

    pub overlay_type: OverlayKind,

    /// Overlays this one cannot be active alongside. Interpreted
    /// symmetrically: either side declaring the exclusion is enough.
    #[serde(default)]
    pub mutually_exclusive_with: Vec<String>,
}

impl Overlay {
    pub fn new(overlay_id: &str, name: &str, overlay_type: OverlayKind) -> Self {
        Self {
            overlay_id: overlay_id.to_string(),
            name: name.to_string(),
            overlay_type,
            mutually_exclusive_with: Vec::new(),
        }
    }

    pub fn excluding(mut self, ids: &[&str]) -> Self {
        self.mutually_exclusive_with = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn excludes(&self, other: &str) -> bool {
        self.mutually_exclusive_with.iter().any(|id| id == other)
    }

    fn check(&self) -> Result<(), OverlayCatalogError> {
        if self.overlay_id.trim().is_empty() {
            return Err(OverlayCatalogError::BlankField {
                overlay_id: self.overlay_id.clone(),
                field: "overlay_id".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(OverlayCatalogError::BlankField {
                overlay_id: self.overlay_id.clone(),
                field: "name".to_string(),
            });
        }
        Ok(())
    }
}

/// Errors building an overlay catalog
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OverlayCatalogError {
    #[error("Duplicate overlay id: '{0}'")]
    DuplicateId(String),

    #[error("Overlay '{overlay_id}': '{field}' can't be blank")]
    BlankField { overlay_id: String, field: String },

    #[error("Invalid overlay type '{0}' (expected \"major\" or \"flavor\")")]
    InvalidKind(String),
}

/// Every overlay known to a play kit, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayCatalog {
    overlays: BTreeMap<String, Overlay>,
}

impl OverlayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting blank fields and duplicate ids
    pub fn from_overlays(overlays: Vec<Overlay>) -> Result<Self, OverlayCatalogError> {
        let mut catalog = Self::new();
        for overlay in overlays {
            overlay.check()?;
            if catalog.overlays.contains_key(&overlay.overlay_id) {
                return Err(OverlayCatalogError::DuplicateId(overlay.overlay_id));
            }
            catalog.overlays.insert(overlay.overlay_id.clone(), overlay);
        }
        Ok(catalog)
    }

    pub fn get(&self, overlay_id: &str) -> Option<&Overlay> {
        self.overlays.get(overlay_id)
    }

    pub fn contains(&self, overlay_id: &str) -> bool {
        self.overlays.contains_key(overlay_id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    /// Overlays of one kind, in id order
    pub fn of_kind(&self, kind: OverlayKind) -> Vec<&Overlay> {
        self.iter().filter(|o| o.overlay_type == kind).collect()
    }

    /// True if `a` and `b` exclude each other, declared from either side
    pub fn are_exclusive(&self, a: &str, b: &str) -> bool {
        let declared = |from: &str, to: &str| self.get(from).is_some_and(|o| o.excludes(to));
        declared(a, b) || declared(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("major".parse::<OverlayKind>(), Ok(OverlayKind::Major));
        assert_eq!("flavor".parse::<OverlayKind>(), Ok(OverlayKind::Flavor));
        assert_eq!(
            "invalid".parse::<OverlayKind>(),
            Err(OverlayCatalogError::InvalidKind("invalid".to_string()))
        );
    }

    #[test]
    fn test_kind_rejected_on_deserialize() {
        let json = r#"{"overlay_id": "test", "name": "Test", "overlay_type": "invalid"}"#;
        assert!(serde_json::from_str::<Overlay>(json).is_err());
    }

    #[test]
    fn test_exclusion_list_defaults_empty() {
        let json = r#"{"overlay_id": "elemental-maelstorm", "name": "Elemental Maelstorm", "overlay_type": "flavor"}"#;
        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert!(overlay.mutually_exclusive_with.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = OverlayCatalog::from_overlays(vec![
            Overlay::new("recently-bubbled", "Recently", OverlayKind::Major),
            Overlay::new("recently-bubbled", "Other", OverlayKind::Major),
        ]);
        assert_eq!(
            result,
            Err(OverlayCatalogError::DuplicateId("recently-bubbled".to_string()))
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let result =
            OverlayCatalog::from_overlays(vec![Overlay::new("recently-bubbled", " ", OverlayKind::Major)]);
        assert!(matches!(result, Err(OverlayCatalogError::BlankField { ref field, .. }) if field == "name"));
    }

    #[test]
    fn test_exclusion_is_symmetric() {
        let catalog = OverlayCatalog::from_overlays(vec![
            Overlay::new("a", "A", OverlayKind::Major).excluding(&["b"]),
            Overlay::new("b", "B", OverlayKind::Major),
        ])
        .unwrap();

        assert!(catalog.are_exclusive("a", "b"));
        assert!(catalog.are_exclusive("b", "a"));
        assert!(!catalog.are_exclusive("a", "missing"));
    }

    #[test]
    fn test_of_kind() {
        let catalog = OverlayCatalog::from_overlays(vec![
            Overlay::new("recently-bubbled", "Recently Bubbled", OverlayKind::Major),
            Overlay::new("elemental-maelstorm", "Elemental Maelstorm", OverlayKind::Flavor),
            Overlay::new("political-lockdown", "Political Lockdown", OverlayKind::Flavor),
        ])
        .unwrap();

        let flavors: Vec<_> = catalog
            .of_kind(OverlayKind::Flavor)
            .iter()
            .map(|o| o.overlay_id.as_str())
            .collect();
        assert_eq!(flavors, vec!["elemental-maelstorm", "political-lockdown"]);
    }
}
