//! Shared fixtures for integration tests
//!
//! `tests/fixtures/playkit` is a small play kit: four overlays, Bran the
//! bartender, the Forgotten Stag, and one campaign per scenario.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use playkit::{load_playkit, Catalog};

/// Path to the fixture play kit
pub fn playkit_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/playkit")
}

/// Load the fixture play kit, panicking on failure
pub fn fixture_catalog() -> Catalog {
    load_playkit(&playkit_path())
        .expect("fixture play kit should load")
        .catalog
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
