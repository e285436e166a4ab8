// src/dag/schedule.rs

//! Result types produced by the stage scheduler.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::stage::StageId;

/// Which rule decided a stage's start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// No dependencies, no override: chained after the previous such stage.
    Sequential,
    /// Day after the latest predecessor end.
    Dependent,
    /// Pinned by a manual override.
    Override { locked: bool },
}

impl Placement {
    pub fn is_override(&self) -> bool {
        matches!(self, Placement::Override { .. })
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Placement::Override { locked: true })
    }
}

/// Computed dates for one stage.
///
/// `end_date` is `start_date` plus the effective duration; the next dependent
/// stage starts the day after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputedStage {
    pub stage_id: StageId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub placement: Placement,
}

/// Non-fatal findings of a checked computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleWarning {
    /// A dangling dependency edge was ignored.
    DroppedDependency { stage: StageId, dependency: StageId },
    /// An override named a stage that is not in the catalog.
    OrphanOverride { stage: StageId },
}

/// An overridden stage that starts before its predecessors allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideConflict {
    pub stage_id: StageId,
    pub locked: bool,
    pub pinned: NaiveDate,
    /// Day after the latest predecessor end.
    pub earliest_allowed: NaiveDate,
}

/// Output of [`StageScheduler::compute_checked`](crate::dag::StageScheduler::compute_checked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    stages: Vec<ComputedStage>,
    warnings: Vec<ScheduleWarning>,
    conflicts: Vec<OverrideConflict>,
}

impl Schedule {
    pub fn new(
        stages: Vec<ComputedStage>,
        warnings: Vec<ScheduleWarning>,
        conflicts: Vec<OverrideConflict>,
    ) -> Self {
        Self {
            stages,
            warnings,
            conflicts,
        }
    }

    /// Stages in catalog order.
    pub fn stages(&self) -> &[ComputedStage] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<ComputedStage> {
        self.stages
    }

    pub fn get(&self, stage_id: &str) -> Option<&ComputedStage> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }

    pub fn warnings(&self) -> &[ScheduleWarning] {
        &self.warnings
    }

    pub fn conflicts(&self) -> &[OverrideConflict] {
        &self.conflicts
    }

    pub fn has_conflict(&self, stage_id: &str) -> bool {
        self.conflicts.iter().any(|c| c.stage_id == stage_id)
    }

    /// Latest end date over all stages.
    pub fn project_end(&self) -> Option<NaiveDate> {
        self.stages.iter().map(|s| s.end_date).max()
    }

    /// What changed between `previous` and `self`.
    pub fn diff(&self, previous: &Schedule) -> ScheduleDiff {
        let before: HashMap<&str, &ComputedStage> = previous
            .stages
            .iter()
            .map(|s| (s.stage_id.as_str(), s))
            .collect();
        let after: HashMap<&str, &ComputedStage> = self
            .stages
            .iter()
            .map(|s| (s.stage_id.as_str(), s))
            .collect();

        let mut diff = ScheduleDiff::default();

        for stage in &self.stages {
            match before.get(stage.stage_id.as_str()) {
                None => diff.added.push(stage.stage_id.clone()),
                Some(old) if old.start_date != stage.start_date || old.end_date != stage.end_date => {
                    diff.moved.push(StageMove {
                        stage_id: stage.stage_id.clone(),
                        from: (old.start_date, old.end_date),
                        to: (stage.start_date, stage.end_date),
                    });
                }
                Some(_) => {}
            }
        }

        for stage in &previous.stages {
            if !after.contains_key(stage.stage_id.as_str()) {
                diff.removed.push(stage.stage_id.clone());
            }
        }

        diff
    }
}

/// A stage whose dates changed between two computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMove {
    pub stage_id: StageId,
    pub from: (NaiveDate, NaiveDate),
    pub to: (NaiveDate, NaiveDate),
}

impl StageMove {
    /// Signed shift of the start date, in days.
    pub fn shift_days(&self) -> i64 {
        (self.to.0 - self.from.0).num_days()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDiff {
    pub added: Vec<StageId>,
    pub removed: Vec<StageId>,
    pub moved: Vec<StageMove>,
}

impl ScheduleDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}
