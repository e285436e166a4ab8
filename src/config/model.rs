// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dag::ScheduleOptions;
use crate::stage::{Overrides, StageTemplate, DEFAULT_DURATION_DAYS};
use crate::types::UnknownDependencyPolicy;

/// Catalog file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [project]
/// name = "Acme rebrand"
/// start_date = "2025-01-01"
///
/// [[stage]]
/// id = "S1"
/// name = "Kickoff"
/// estimated_duration_days = 3
///
/// [[stage]]
/// id = "S2"
/// dependencies = ["S1"]
///
/// [override.S2]
/// date = "2025-01-10"
/// locked = true
/// ```
///
/// Only `[project].start_date` and at least one `[[stage]]` are required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogFile {
    pub project: ProjectSection,

    #[serde(default)]
    pub watch: WatchSection,

    /// `[[stage]]` entries, in catalog order.
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,

    /// `[override.<stage id>]` sections.
    #[serde(default, rename = "override")]
    pub overrides: BTreeMap<String, OverrideConfig>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: String,

    /// First day any sequential stage may start.
    pub start_date: NaiveDate,

    /// Duration for stages whose estimate is missing or zero.
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u32,

    /// `"fail"` (default) or `"drop"`.
    #[serde(default)]
    pub unknown_dependency: UnknownDependencyPolicy,
}

fn default_duration_days() -> u32 {
    DEFAULT_DURATION_DAYS
}

impl ProjectSection {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            start_date,
            default_duration_days: default_duration_days(),
            unknown_dependency: UnknownDependencyPolicy::default(),
        }
    }
}

/// `[watch]` section, only read in `--watch` mode.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// How long a rendering stays reusable for identical file contents
    /// (e.g. `"10m"`, `"30s"`).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: String,
}

fn default_cache_ttl() -> String {
    "10m".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            cache_ttl: default_cache_ttl(),
        }
    }
}

/// One `[[stage]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub id: String,

    /// Defaults to the 1-based position in the file.
    #[serde(default)]
    pub number_index: Option<u32>,

    /// Defaults to the id.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category: String,

    /// Signed so that negative values reach validation instead of failing
    /// deserialization with an opaque message.
    #[serde(default)]
    pub estimated_duration_days: Option<i64>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub is_deliverable: bool,
}

impl StageConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number_index: None,
            name: None,
            category: String::new(),
            estimated_duration_days: None,
            dependencies: Vec::new(),
            is_deliverable: false,
        }
    }
}

/// One `[override.<stage id>]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverrideConfig {
    pub date: NaiveDate,
    #[serde(default)]
    pub locked: bool,
}

/// A validated catalog: templates, overrides and options ready for the
/// scheduler.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub project: ProjectSection,
    /// Parsed `[watch].cache_ttl`.
    pub cache_ttl: Duration,
    pub stages: Vec<StageTemplate>,
    pub overrides: Overrides,
}

impl CatalogFile {
    /// Assemble a catalog from already-validated parts.
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        cache_ttl: Duration,
        stages: Vec<StageTemplate>,
        overrides: Overrides,
    ) -> Self {
        Self {
            project,
            cache_ttl,
            stages,
            overrides,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.project.start_date
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            default_duration_days: self.project.default_duration_days,
            unknown_dependency: self.project.unknown_dependency,
        }
    }

    pub fn template(&self, id: &str) -> Option<&StageTemplate> {
        self.stages.iter().find(|t| t.id == id)
    }
}
