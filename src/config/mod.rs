// src/config/mod.rs

//! Catalog loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a catalog file from disk or memory (`loader.rs`).
//! - Validate it and convert it into scheduler input (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{
    CatalogFile, OverrideConfig, ProjectSection, RawCatalogFile, StageConfig, WatchSection,
};
pub use validate::{parse_duration, validate_catalog};
