#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use princess_scheduler::config::{
    CatalogFile, OverrideConfig, ProjectSection, RawCatalogFile, StageConfig, WatchSection,
};
use princess_scheduler::stage::StageTemplate;
use princess_scheduler::types::UnknownDependencyPolicy;

/// Builder for `CatalogFile` to simplify test setup.
pub struct CatalogBuilder {
    catalog: RawCatalogFile,
}

impl CatalogBuilder {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            catalog: RawCatalogFile {
                project: ProjectSection::new(start_date),
                watch: WatchSection::default(),
                stages: Vec::new(),
                overrides: BTreeMap::new(),
            },
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.catalog.project.name = name.to_string();
        self
    }

    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.catalog.stages.push(stage);
        self
    }

    pub fn with_override(mut self, stage: &str, date: NaiveDate, locked: bool) -> Self {
        self.catalog
            .overrides
            .insert(stage.to_string(), OverrideConfig { date, locked });
        self
    }

    pub fn default_duration_days(mut self, days: u32) -> Self {
        self.catalog.project.default_duration_days = days;
        self
    }

    pub fn drop_unknown_dependencies(mut self) -> Self {
        self.catalog.project.unknown_dependency = UnknownDependencyPolicy::Drop;
        self
    }

    /// The raw, unvalidated catalog (for exercising validation errors).
    pub fn raw(self) -> RawCatalogFile {
        self.catalog
    }

    pub fn build(self) -> CatalogFile {
        CatalogFile::try_from(self.catalog).expect("Failed to build valid catalog from builder")
    }
}

/// Builder for `StageConfig`.
pub struct StageBuilder {
    stage: StageConfig,
}

impl StageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            stage: StageConfig::new(id),
        }
    }

    pub fn days(mut self, days: i64) -> Self {
        self.stage.estimated_duration_days = Some(days);
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.stage.dependencies.push(dep.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.stage.name = Some(name.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.stage.category = category.to_string();
        self
    }

    pub fn deliverable(mut self) -> Self {
        self.stage.is_deliverable = true;
        self
    }

    pub fn build(self) -> StageConfig {
        self.stage
    }
}

/// Shorthand for a scheduler template with the given deps.
pub fn template(id: &str, days: u32, deps: &[&str]) -> StageTemplate {
    deps.iter()
        .fold(StageTemplate::new(id, Some(days)), |t, d| t.after(*d))
}
