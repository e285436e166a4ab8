// src/dag/scheduler.rs

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, info, trace, warn};

use crate::dag::graph::StageGraph;
use crate::dag::schedule::{ComputedStage, OverrideConflict, Placement, Schedule, ScheduleWarning};
use crate::errors::ScheduleError;
use crate::stage::{Overrides, StageTemplate, DEFAULT_DURATION_DAYS, MAX_DURATION_DAYS};
use crate::types::UnknownDependencyPolicy;

/// Knobs shared by both computation paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Duration used when a template's estimate is missing or zero.
    pub default_duration_days: u32,
    pub unknown_dependency: UnknownDependencyPolicy,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            default_duration_days: DEFAULT_DURATION_DAYS,
            unknown_dependency: UnknownDependencyPolicy::default(),
        }
    }
}

/// Places every stage of a catalog on the calendar.
///
/// The scheduler holds no state between calls; both entry points are pure
/// functions of their arguments and can be called on every edit.
///
/// Placement rules, in priority order:
/// - an override pins the start date exactly;
/// - a stage with dependencies starts the day after its latest predecessor
///   ends;
/// - any other stage starts at the sequential cursor, which begins at the
///   project start date and moves to the day after each such stage ends.
///
/// Every stage ends `duration` days after it starts.
#[derive(Debug, Clone, Default)]
pub struct StageScheduler {
    options: ScheduleOptions,
}

impl StageScheduler {
    pub fn new(options: ScheduleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    /// Single forward pass in catalog order, never failing.
    ///
    /// The catalog is assumed to list predecessors before dependents. A
    /// dependency that has not been placed yet (unknown id, listed later, or
    /// part of a cycle) counts as ending on the current sequential cursor.
    /// Date overflow saturates at [`NaiveDate::MAX`].
    pub fn compute(
        &self,
        templates: &[StageTemplate],
        start_date: NaiveDate,
        overrides: &Overrides,
    ) -> Vec<ComputedStage> {
        let mut end_by_id: HashMap<&str, NaiveDate> = HashMap::with_capacity(templates.len());
        let mut cursor = start_date;
        let mut computed = Vec::with_capacity(templates.len());

        for t in templates {
            let (start, placement) = if let Some(o) = overrides.get(&t.id) {
                (o.date, Placement::Override { locked: o.locked })
            } else if t.has_dependencies() {
                let latest = t
                    .dependencies
                    .iter()
                    .map(|dep| match end_by_id.get(dep.as_str()) {
                        Some(&end) => end,
                        None => {
                            debug!(
                                stage = %t.id,
                                dep = %dep,
                                %cursor,
                                "dependency not placed yet; using sequential cursor"
                            );
                            cursor
                        }
                    })
                    .max()
                    .unwrap_or(cursor);
                (saturating_add_days(latest, 1), Placement::Dependent)
            } else {
                (cursor, Placement::Sequential)
            };

            let duration = t.effective_duration_days(self.options.default_duration_days);
            let end = saturating_add_days(start, u64::from(duration));

            if placement == Placement::Sequential {
                cursor = saturating_add_days(end, 1);
            }

            trace!(stage = %t.id, %start, %end, ?placement, "placed stage");
            end_by_id.entry(t.id.as_str()).or_insert(end);
            computed.push(ComputedStage {
                stage_id: t.id.clone(),
                start_date: start,
                end_date: end,
                placement,
            });
        }

        computed
    }

    /// Validating variant of [`compute`](Self::compute).
    ///
    /// Rejects invalid durations, duplicate ids, cycles and (depending on the
    /// policy) unknown dependencies, then places stages in a stable
    /// topological order so catalog order no longer has to respect
    /// dependencies. Stages come back in catalog order.
    ///
    /// Overrides still pin dates exactly; any pin earlier than its
    /// predecessors allow is reported as an [`OverrideConflict`].
    pub fn compute_checked(
        &self,
        templates: &[StageTemplate],
        start_date: NaiveDate,
        overrides: &Overrides,
    ) -> Result<Schedule, ScheduleError> {
        validate_durations(templates)?;

        let graph = StageGraph::from_templates(templates);

        if let Some(dup) = graph.duplicate_ids().first() {
            return Err(ScheduleError::DuplicateStage { stage: dup.clone() });
        }

        let mut warnings = Vec::new();

        for edge in graph.unknown_dependencies() {
            match self.options.unknown_dependency {
                UnknownDependencyPolicy::Fail => {
                    return Err(ScheduleError::UnknownDependency {
                        stage: edge.stage.clone(),
                        dependency: edge.dependency.clone(),
                    });
                }
                UnknownDependencyPolicy::Drop => {
                    warn!(
                        stage = %edge.stage,
                        dep = %edge.dependency,
                        "dropping dependency on unknown stage"
                    );
                    warnings.push(ScheduleWarning::DroppedDependency {
                        stage: edge.stage.clone(),
                        dependency: edge.dependency.clone(),
                    });
                }
            }
        }

        let order = graph.topological_order()?;

        for stage in overrides.keys() {
            if !templates.iter().any(|t| &t.id == stage) {
                warn!(stage = %stage, "override for unknown stage; ignoring");
                warnings.push(ScheduleWarning::OrphanOverride {
                    stage: stage.clone(),
                });
            }
        }

        let mut slots: Vec<Option<ComputedStage>> = vec![None; templates.len()];
        let mut conflicts: Vec<(usize, OverrideConflict)> = Vec::new();
        let mut cursor = start_date;

        for i in order {
            let t = &templates[i];
            let overflow = || ScheduleError::DateOverflow { stage: t.id.clone() };

            // Topological order guarantees every predecessor is already placed.
            let latest_dep_end = graph
                .deps_by_index(i)
                .iter()
                .filter_map(|&d| slots[d].as_ref().map(|s| s.end_date))
                .max();
            let earliest = match latest_dep_end {
                Some(end) => Some(checked_add_days(end, 1).ok_or_else(overflow)?),
                None => None,
            };

            let (start, placement) = match (overrides.get(&t.id), earliest) {
                (Some(o), earliest) => {
                    if let Some(earliest) = earliest.filter(|&e| o.date < e) {
                        warn!(
                            stage = %t.id,
                            pinned = %o.date,
                            %earliest,
                            locked = o.locked,
                            "override starts before its dependencies allow"
                        );
                        conflicts.push((
                            i,
                            OverrideConflict {
                                stage_id: t.id.clone(),
                                locked: o.locked,
                                pinned: o.date,
                                earliest_allowed: earliest,
                            },
                        ));
                    }
                    (o.date, Placement::Override { locked: o.locked })
                }
                (None, Some(earliest)) => (earliest, Placement::Dependent),
                (None, None) => (cursor, Placement::Sequential),
            };

            let duration = t.effective_duration_days(self.options.default_duration_days);
            let end = checked_add_days(start, u64::from(duration)).ok_or_else(overflow)?;

            if placement == Placement::Sequential {
                cursor = checked_add_days(end, 1).ok_or_else(overflow)?;
            }

            trace!(stage = %t.id, %start, %end, ?placement, "placed stage");
            slots[i] = Some(ComputedStage {
                stage_id: t.id.clone(),
                start_date: start,
                end_date: end,
                placement,
            });
        }

        conflicts.sort_by_key(|(i, _)| *i);

        let schedule = Schedule::new(
            slots.into_iter().flatten().collect(),
            warnings,
            conflicts.into_iter().map(|(_, c)| c).collect(),
        );

        info!(
            stages = schedule.stages().len(),
            end = ?schedule.project_end(),
            warnings = schedule.warnings().len(),
            conflicts = schedule.conflicts().len(),
            "computed schedule"
        );

        Ok(schedule)
    }
}

/// [`StageScheduler::compute`] with default options.
pub fn compute(
    templates: &[StageTemplate],
    start_date: NaiveDate,
    overrides: &Overrides,
) -> Vec<ComputedStage> {
    StageScheduler::default().compute(templates, start_date, overrides)
}

fn validate_durations(templates: &[StageTemplate]) -> Result<(), ScheduleError> {
    for t in templates {
        if let Some(days) = t.estimated_duration_days {
            if days > MAX_DURATION_DAYS {
                return Err(ScheduleError::InvalidDuration {
                    stage: t.id.clone(),
                    days: i64::from(days),
                    max: MAX_DURATION_DAYS,
                });
            }
        }
    }
    Ok(())
}

fn checked_add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

fn saturating_add_days(date: NaiveDate, days: u64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(NaiveDate::MAX)
}
