//! Resolution engine
//!
//! Pure functions over immutable inputs: fragment merge, override
//! application, visibility filtering, and the [`Resolver`] that chains
//! them for one (entity, campaign, role) request.

mod fragments;
mod overrides;
mod resolver;
mod visibility;

pub use fragments::{check_gate, merge_fragments, GatePolicy, DEFAULT_EMPTY_GATE_POLICY};
pub use overrides::{apply_override, OverrideOutcome, OverrideSet};
pub use resolver::{ResolutionPath, ResolvedEntity, Resolver};
pub use visibility::{filter_visibility, filter_with_split, FieldSplit};
