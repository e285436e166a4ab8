// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{CatalogFile, RawCatalogFile};
use crate::errors::Result;

/// Load a catalog file from a given path and return the raw `RawCatalogFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (dependencies, cycles, durations). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawCatalogFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let catalog: RawCatalogFile = toml::from_str(&contents)?;
    Ok(catalog)
}

/// Parse and validate catalog contents that are already in memory.
///
/// Watch mode uses this on every edit so it can hash the exact bytes it
/// parses.
pub fn parse_and_validate(contents: &str) -> Result<CatalogFile> {
    let raw: RawCatalogFile = toml::from_str(contents)?;
    CatalogFile::try_from(raw)
}

/// Load a catalog file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Checks for:
///   - duplicate or empty stage ids,
///   - negative or oversized durations,
///   - unknown dependencies (unless `unknown_dependency = "drop"`),
///   - dependency cycles,
///   - overrides for unknown stages.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CatalogFile> {
    let raw = load_from_path(&path)?;
    CatalogFile::try_from(raw)
}

/// Default catalog path: `Princess.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Princess.toml")
}
