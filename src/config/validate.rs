// src/config/validate.rs

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::config::model::{CatalogFile, RawCatalogFile, StageConfig};
use crate::dag::StageGraph;
use crate::errors::{PrincessError, Result, ScheduleError};
use crate::stage::{DateOverride, Overrides, StageTemplate, MAX_DURATION_DAYS};
use crate::types::UnknownDependencyPolicy;

impl TryFrom<RawCatalogFile> for CatalogFile {
    type Error = PrincessError;

    fn try_from(raw: RawCatalogFile) -> std::result::Result<Self, Self::Error> {
        let cache_ttl = validate_catalog(&raw)?;

        let stages = raw
            .stages
            .iter()
            .enumerate()
            .map(|(i, s)| to_template(i, s))
            .collect::<Result<Vec<_>>>()?;
        let overrides: Overrides = raw
            .overrides
            .iter()
            .map(|(id, o)| {
                (
                    id.clone(),
                    DateOverride {
                        date: o.date,
                        locked: o.locked,
                    },
                )
            })
            .collect();

        debug!(
            stages = stages.len(),
            overrides = overrides.len(),
            "catalog validated"
        );

        Ok(CatalogFile::new_unchecked(raw.project, cache_ttl, stages, overrides))
    }
}

/// Run every semantic check on a raw catalog.
///
/// Returns the parsed `[watch].cache_ttl`.
pub fn validate_catalog(cfg: &RawCatalogFile) -> Result<Duration> {
    ensure_has_stages(cfg)?;
    validate_project(cfg)?;
    let cache_ttl = validate_watch(cfg)?;
    validate_stage_ids(cfg)?;
    validate_durations(cfg)?;
    validate_dependencies(cfg)?;
    validate_dag(cfg)?;
    validate_overrides(cfg)?;
    Ok(cache_ttl)
}

fn ensure_has_stages(cfg: &RawCatalogFile) -> Result<()> {
    if cfg.stages.is_empty() {
        return Err(PrincessError::ConfigError(
            "catalog must contain at least one [[stage]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_project(cfg: &RawCatalogFile) -> Result<()> {
    let days = cfg.project.default_duration_days;
    if days == 0 || days > MAX_DURATION_DAYS {
        return Err(PrincessError::ConfigError(format!(
            "[project].default_duration_days must be in 1..={MAX_DURATION_DAYS} (got {days})"
        )));
    }
    Ok(())
}

fn validate_watch(cfg: &RawCatalogFile) -> Result<Duration> {
    parse_duration(&cfg.watch.cache_ttl)
        .map_err(|e| PrincessError::ConfigError(format!("[watch].cache_ttl: {e}")))
}

fn validate_stage_ids(cfg: &RawCatalogFile) -> Result<()> {
    let mut seen = HashSet::new();
    for stage in &cfg.stages {
        if stage.id.trim().is_empty() {
            return Err(PrincessError::ConfigError(
                "[[stage]] entry has an empty id".to_string(),
            ));
        }
        if !seen.insert(stage.id.as_str()) {
            return Err(ScheduleError::DuplicateStage {
                stage: stage.id.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn validate_durations(cfg: &RawCatalogFile) -> Result<()> {
    for stage in &cfg.stages {
        if let Some(days) = stage.estimated_duration_days {
            if days < 0 || days > i64::from(MAX_DURATION_DAYS) {
                return Err(ScheduleError::InvalidDuration {
                    stage: stage.id.clone(),
                    days,
                    max: MAX_DURATION_DAYS,
                }
                .into());
            }
        }
    }
    Ok(())
}

fn validate_dependencies(cfg: &RawCatalogFile) -> Result<()> {
    let ids: HashSet<&str> = cfg.stages.iter().map(|s| s.id.as_str()).collect();

    for stage in &cfg.stages {
        for dep in &stage.dependencies {
            if dep == &stage.id {
                return Err(PrincessError::ConfigError(format!(
                    "stage '{}' cannot depend on itself",
                    stage.id
                )));
            }
            if !ids.contains(dep.as_str())
                && cfg.project.unknown_dependency == UnknownDependencyPolicy::Fail
            {
                return Err(ScheduleError::UnknownDependency {
                    stage: stage.id.clone(),
                    dependency: dep.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawCatalogFile) -> Result<()> {
    let templates: Vec<StageTemplate> = cfg
        .stages
        .iter()
        .map(|s| {
            StageTemplate {
                dependencies: s.dependencies.clone(),
                ..StageTemplate::new(s.id.clone(), None)
            }
        })
        .collect();

    StageGraph::from_templates(&templates).check_acyclic()?;
    Ok(())
}

fn validate_overrides(cfg: &RawCatalogFile) -> Result<()> {
    for id in cfg.overrides.keys() {
        if !cfg.stages.iter().any(|s| &s.id == id) {
            return Err(PrincessError::ConfigError(format!(
                "[override.{id}] refers to unknown stage '{id}'"
            )));
        }
    }
    Ok(())
}

fn to_template(position: usize, s: &StageConfig) -> Result<StageTemplate> {
    let estimated_duration_days = s
        .estimated_duration_days
        .map(|d| {
            u32::try_from(d).map_err(|_| ScheduleError::InvalidDuration {
                stage: s.id.clone(),
                days: d,
                max: MAX_DURATION_DAYS,
            })
        })
        .transpose()?;

    Ok(StageTemplate {
        id: s.id.clone(),
        number_index: s.number_index.unwrap_or(position as u32 + 1),
        name: s.name.clone().unwrap_or_else(|| s.id.clone()),
        category: s.category.clone(),
        estimated_duration_days,
        dependencies: s.dependencies.clone(),
        is_deliverable: s.is_deliverable,
    })
}

/// Parse `"<number><unit>"` with unit `ms`, `s`, `m` or `h`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit: u64 = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
