//! Whole-directory import

use std::path::{Path, PathBuf};

use playkit_validator::OverlayCatalog;
use serde::Serialize;
use walkdir::WalkDir;

use super::files::{load_campaigns_file, load_entity_file, load_overlays_file};
use super::{ImportError, ImportedFile};
use crate::catalog::{Catalog, CatalogError, CatalogProblem};
use crate::model::{BaseEntity, Campaign};

const OVERLAYS_DIR: &str = "overlays";
const ENTITIES_DIR: &str = "entities";
const CAMPAIGNS_FILE: &str = "campaigns.toml";

/// A loaded play kit and where each piece came from
#[derive(Debug, Clone)]
pub struct PlayKit {
    pub root: PathBuf,
    pub catalog: Catalog,
    pub files: Vec<ImportedFile>,
}

/// Import summary as printed by `playkit check`
#[derive(Debug, Serialize)]
pub struct PlayKitSummary<'a> {
    pub root: &'a Path,
    pub overlays: usize,
    pub entities: usize,
    pub campaigns: usize,
    pub overrides: usize,
    pub files: &'a [ImportedFile],
}

impl PlayKit {
    pub fn summary(&self) -> PlayKitSummary<'_> {
        let (overlays, entities, campaigns, overrides) = self.catalog.summary();
        PlayKitSummary {
            root: &self.root,
            overlays,
            entities,
            campaigns,
            overrides,
            files: &self.files,
        }
    }
}

/// Collect `*.toml` files under `dir`, sorted by path
fn toml_files(dir: &Path, max_depth: usize) -> Result<Vec<PathBuf>, ImportError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.map_err(|source| ImportError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Load and validate every definition under `dir`.
///
/// Parse failures stop the import at the offending file. Integrity
/// problems are collected across all files and reported together.
pub fn load_playkit(dir: &Path) -> Result<PlayKit, ImportError> {
    if !dir.is_dir() {
        return Err(ImportError::MissingDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();

    let mut overlays = Vec::new();
    let overlays_dir = dir.join(OVERLAYS_DIR);
    for path in toml_files(&overlays_dir, 1)? {
        let (mut loaded, imported) = load_overlays_file(&path)?;
        tracing::info!(path = %path.display(), count = loaded.len(), "imported overlays");
        overlays.append(&mut loaded);
        files.push(imported);
    }
    let overlays = OverlayCatalog::from_overlays(overlays).map_err(|source| ImportError::Overlays {
        path: overlays_dir.clone(),
        source,
    })?;

    let mut entities = Vec::new();
    for path in toml_files(&dir.join(ENTITIES_DIR), usize::MAX)? {
        let (entity, imported) = load_entity_file(&path)?;
        tracing::info!(path = %path.display(), entity = %entity.entity_id, "imported entity");
        entities.push(entity);
        files.push(imported);
    }

    let mut problems: Vec<CatalogProblem> = Vec::new();
    let mut campaigns = Vec::new();
    let mut overrides = Vec::new();

    let campaigns_path = dir.join(CAMPAIGNS_FILE);
    if campaigns_path.is_file() {
        let (set, imported) = load_campaigns_file(&campaigns_path)?;
        tracing::info!(
            path = %campaigns_path.display(),
            campaigns = set.campaigns.len(),
            overrides = set.overrides.len(),
            "imported campaigns"
        );
        for def in set.campaigns {
            // a malformed campaign stays registered so its overrides still resolve
            let fallback = Campaign {
                id: def.id.clone(),
                name: def.name.clone(),
                play_kit_id: def.play_kit_id.clone(),
                active_overlays: Vec::new(),
            };
            match def.into_campaign(&overlays) {
                Ok(campaign) => campaigns.push(campaign),
                Err(e) => {
                    problems.push(CatalogProblem::Campaign(e));
                    campaigns.push(fallback);
                }
            }
        }
        overrides = set.overrides;
        files.push(imported);
    }

    let built = Catalog::build(overlays, entities, campaigns, overrides);
    let catalog = match built {
        Ok(catalog) if problems.is_empty() => catalog,
        Ok(_) => return Err(CatalogError::from_problems(problems).into()),
        Err(e) => {
            problems.extend(e.into_problems());
            return Err(CatalogError::from_problems(problems).into());
        }
    };

    Ok(PlayKit {
        root: dir.to_path_buf(),
        catalog,
        files,
    })
}

/// Re-read one entity file into an existing catalog (insert or update)
pub fn reimport_entity(playkit: &mut PlayKit, path: &Path) -> Result<Option<BaseEntity>, ImportError> {
    let (entity, imported) = load_entity_file(path)?;
    let previous = playkit.catalog.upsert_entity(entity)?;

    playkit.files.retain(|f| f.path != imported.path);
    playkit.files.push(imported);

    tracing::info!(path = %path.display(), updated = previous.is_some(), "re-imported entity");
    Ok(previous)
}
