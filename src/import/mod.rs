//! Play kit import
//!
//! Reads the TOML definition files of a play kit directory:
//!
//! ```text
//! <dir>/overlays/*.toml        [[overlay]] tables
//! <dir>/entities/**/*.toml     one entity per file
//! <dir>/campaigns.toml         [[campaign]] and [[override]] tables (optional)
//! ```
//!
//! and builds a validated [`Catalog`](crate::catalog::Catalog).

mod files;
mod playkit;

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use playkit_validator::OverlayCatalogError;
use serde::Serialize;

use crate::catalog::CatalogError;

pub use files::{load_campaigns_file, load_entity_file, load_overlays_file, CampaignDef, CampaignSet};
pub use playkit::{load_playkit, reimport_entity, PlayKit, PlayKitSummary};

/// Errors loading a play kit
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Play kit directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid definition in {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid overlays under {}: {source}", path.display())]
    Overlays {
        path: PathBuf,
        #[source]
        source: OverlayCatalogError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Which kind of definition a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Overlays,
    Entity,
    Campaigns,
}

/// Provenance of one imported file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedFile {
    pub path: PathBuf,
    pub kind: FileKind,
    /// SHA-256 of the raw file bytes
    pub digest: String,
}
