//! Single-file loaders

use std::fs;
use std::path::Path;

use playkit_tree::Tree;
use playkit_validator::{validate_overlay_set, Overlay, OverlayCatalog, Violation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{FileKind, ImportError, ImportedFile};
use crate::model::{BaseEntity, Campaign, CampaignError, CampaignProblem, DmOverride};

/// Campaign as written in `campaigns.toml`.
///
/// `active_overlays` is kept raw so a malformed value is reported as a
/// validation problem rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CampaignDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub play_kit_id: Option<String>,
    #[serde(default = "Tree::null")]
    pub active_overlays: Tree,
}

impl CampaignDef {
    /// Convert to a campaign if `active_overlays` is a list of strings (or absent).
    ///
    /// Only the overlay shape is checked here; the rest is left to
    /// [`Campaign::validate`].
    pub fn into_campaign(self, overlays: &OverlayCatalog) -> Result<Campaign, CampaignError> {
        let ids = if self.active_overlays.is_null() {
            Some(Vec::new())
        } else {
            self.active_overlays.as_array().and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<String>>>()
            })
        };

        match ids {
            Some(active_overlays) => Ok(Campaign {
                id: self.id,
                name: self.name,
                play_kit_id: self.play_kit_id,
                active_overlays,
            }),
            None => {
                let result = validate_overlay_set(&self.active_overlays, overlays);
                let mut problems: Vec<CampaignProblem> =
                    result.violations.into_iter().map(CampaignProblem::Overlays).collect();
                if problems.is_empty() {
                    problems.push(CampaignProblem::Overlays(Violation::InvalidShape(
                        self.active_overlays.kind_name().to_string(),
                    )));
                }
                Err(CampaignError::Invalid {
                    campaign: self.id,
                    problems,
                })
            }
        }
    }
}

/// Contents of `campaigns.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CampaignSet {
    #[serde(default, rename = "campaign")]
    pub campaigns: Vec<CampaignDef>,

    #[serde(default, rename = "override")]
    pub overrides: Vec<DmOverride>,
}

#[derive(Debug, Deserialize)]
struct OverlaysFile {
    #[serde(default, rename = "overlay")]
    overlays: Vec<Overlay>,
}

/// Read, hash and decode one TOML file
fn read_definition<T: DeserializeOwned>(path: &Path, kind: FileKind) -> Result<(T, ImportedFile), ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let contents = String::from_utf8(bytes).map_err(|source| ImportError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = Tree::from_toml_str(&contents).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_value(tree.to_json()).map_err(|source| ImportError::Schema {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), kind = ?kind, digest = %digest, "loaded definition file");

    Ok((
        value,
        ImportedFile {
            path: path.to_path_buf(),
            kind,
            digest,
        },
    ))
}

/// Load one entity definition. Missing tables default to empty.
pub fn load_entity_file(path: &Path) -> Result<(BaseEntity, ImportedFile), ImportError> {
    read_definition(path, FileKind::Entity)
}

/// Load the `[[overlay]]` entries of one file
pub fn load_overlays_file(path: &Path) -> Result<(Vec<Overlay>, ImportedFile), ImportError> {
    let (file, imported): (OverlaysFile, _) = read_definition(path, FileKind::Overlays)?;
    Ok((file.overlays, imported))
}

/// Load campaigns and their overrides
pub fn load_campaigns_file(path: &Path) -> Result<(CampaignSet, ImportedFile), ImportError> {
    read_definition(path, FileKind::Campaigns)
}
