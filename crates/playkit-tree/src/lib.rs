//! Data trees for playkit records.
//!
//! Every record payload (core data, fragment patches, override data) is a
//! [`Tree`]: a closed type with object, array and scalar variants. Merging
//! is a total function over that type:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)

mod convert;
mod merge;
mod tree;

pub use convert::DigestError;
pub use merge::{deep_merge, merge_layers, merge_onto};
pub use tree::{Scalar, Tree};
