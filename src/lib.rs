//! Playkit - overlay-aware entity resolution for tabletop campaigns
//!
//! A play kit defines entities (NPCs, locations, ...) once, with gated
//! fragments that apply only under certain overlays. A campaign activates
//! a consistent set of overlays; resolving an entity for that campaign
//! merges the matching fragments, applies the DM's overrides, and filters
//! the result for the viewer's role.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod model;
pub mod trace;

pub use catalog::{Catalog, CatalogError, CatalogProblem, ResolutionSource};
pub use config::{ConfigError, EffectiveConfig, Settings};
pub use engine::{
    apply_override, filter_visibility, merge_fragments, GatePolicy, OverrideOutcome, OverrideSet, ResolutionPath,
    ResolvedEntity, Resolver, DEFAULT_EMPTY_GATE_POLICY,
};
pub use error::ResolveError;
pub use import::{load_playkit, ImportError, PlayKit};
pub use model::{BaseEntity, Campaign, DmOverride, Fragment, OverrideKind, Role, VisibilityRule};
pub use trace::{NoopObserver, RecordingObserver, ResolutionEvent, ResolutionObserver, TracingObserver};

pub use playkit_tree::{deep_merge, Tree};
pub use playkit_validator::{
    validate_active_overlays, validate_overlay_set, Overlay, OverlayCatalog, OverlayKind, ValidationResult, Violation,
};
