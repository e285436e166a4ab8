// src/render.rs

//! Text and JSON rendering of a computed schedule.
//!
//! Rendering is where the viewer's role applies: stages the role may not see
//! are left out entirely.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::access::{permits, Permission, Role};
use crate::config::CatalogFile;
use crate::dag::{ComputedStage, OverrideConflict, Placement, Schedule, ScheduleWarning};
use crate::errors::{AccessDenied, PrincessError, Result};
use crate::stage::StageTemplate;
use crate::types::OutputFormat;

/// Render `schedule` for `role` in the requested format.
pub fn render(
    schedule: &Schedule,
    catalog: &CatalogFile,
    role: Role,
    format: OutputFormat,
) -> Result<String> {
    if !permits(role, Permission::ViewTimeline) {
        return Err(AccessDenied {
            role,
            permission: Permission::ViewTimeline,
        }
        .into());
    }

    let view = View {
        rows: visible_rows(schedule, catalog, role),
        warnings: schedule
            .warnings()
            .iter()
            .filter(|w| warning_visible(w, catalog, role))
            .collect(),
        conflicts: schedule
            .conflicts()
            .iter()
            .filter(|c| stage_visible(&c.stage_id, catalog, role))
            .collect(),
    };

    match format {
        OutputFormat::Table => Ok(render_table(schedule, catalog, &view)),
        OutputFormat::Json => render_json(schedule, catalog, role, &view),
    }
}

/// One-line banner shown instead of a timeline when computation fails.
pub fn render_error(err: &PrincessError) -> String {
    format!("!! timeline unavailable: {err}\n")
}

/// A computed stage joined with its template.
struct Row<'a> {
    stage: &'a ComputedStage,
    template: &'a StageTemplate,
    conflict: bool,
}

/// Everything `role` is allowed to see of one schedule.
struct View<'a> {
    rows: Vec<Row<'a>>,
    warnings: Vec<&'a ScheduleWarning>,
    conflicts: Vec<&'a OverrideConflict>,
}

/// Internal roles see every stage; others only catalog deliverables.
fn stage_visible(stage_id: &str, catalog: &CatalogFile, role: Role) -> bool {
    permits(role, Permission::ViewInternalStages)
        || catalog.template(stage_id).is_some_and(|t| t.is_deliverable)
}

fn warning_visible(warning: &ScheduleWarning, catalog: &CatalogFile, role: Role) -> bool {
    match warning {
        ScheduleWarning::DroppedDependency { stage, .. } => stage_visible(stage, catalog, role),
        // Names no catalog stage at all.
        ScheduleWarning::OrphanOverride { .. } => {
            permits(role, Permission::ViewInternalStages)
        }
    }
}

fn visible_rows<'a>(schedule: &'a Schedule, catalog: &'a CatalogFile, role: Role) -> Vec<Row<'a>> {
    schedule
        .stages()
        .iter()
        .filter_map(|stage| {
            let template = catalog.template(&stage.stage_id)?;
            stage_visible(&stage.stage_id, catalog, role).then(|| Row {
                stage,
                template,
                conflict: schedule.has_conflict(&stage.stage_id),
            })
        })
        .collect()
}

fn flags(row: &Row<'_>) -> String {
    let mut f = String::new();
    if row.template.is_deliverable {
        f.push('D');
    }
    if row.stage.placement.is_override() {
        f.push('O');
    }
    if row.stage.placement.is_locked() {
        f.push('L');
    }
    if row.conflict {
        f.push('!');
    }
    f
}

fn render_table(schedule: &Schedule, catalog: &CatalogFile, view: &View<'_>) -> String {
    let mut out = String::new();
    let rows = &view.rows;

    let title = if catalog.project.name.is_empty() {
        "project"
    } else {
        catalog.project.name.as_str()
    };
    let end = schedule
        .project_end()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "{title}: {} -> {end} ({} stages)",
        catalog.start_date(),
        rows.len()
    );

    let id_w = rows.iter().map(|r| r.template.id.len()).max().unwrap_or(2).max(2);
    let name_w = rows.iter().map(|r| r.template.name.len()).max().unwrap_or(4).max(4);
    let cat_w = rows
        .iter()
        .map(|r| r.template.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let _ = writeln!(
        out,
        "{:>4}  {:<id_w$}  {:<name_w$}  {:<cat_w$}  {:<10}  {:<10}  {:>4}  FLAGS",
        "#", "ID", "NAME", "CATEGORY", "START", "END", "DAYS"
    );

    for row in rows {
        let days = (row.stage.end_date - row.stage.start_date).num_days();
        let _ = writeln!(
            out,
            "{:>4}  {:<id_w$}  {:<name_w$}  {:<cat_w$}  {:<10}  {:<10}  {:>4}  {}",
            row.template.number_index,
            row.template.id,
            row.template.name,
            row.template.category,
            row.stage.start_date,
            row.stage.end_date,
            days,
            flags(row),
        );
    }

    for w in &view.warnings {
        let _ = match w {
            ScheduleWarning::DroppedDependency { stage, dependency } => writeln!(
                out,
                "warning: dropped dependency of '{stage}' on unknown stage '{dependency}'"
            ),
            ScheduleWarning::OrphanOverride { stage } => {
                writeln!(out, "warning: override for unknown stage '{stage}' ignored")
            }
        };
    }

    for c in &view.conflicts {
        let lock = if c.locked { "locked" } else { "unlocked" };
        let _ = writeln!(
            out,
            "conflict: '{}' is pinned ({lock}) to {} but its dependencies allow {} at the earliest",
            c.stage_id, c.pinned, c.earliest_allowed,
        );
    }

    out
}

#[derive(Serialize)]
struct JsonSchedule<'a> {
    project: &'a str,
    role: Role,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    stages: Vec<JsonStage<'a>>,
    warnings: &'a [&'a ScheduleWarning],
    conflicts: &'a [&'a OverrideConflict],
}

#[derive(Serialize)]
struct JsonStage<'a> {
    id: &'a str,
    number_index: u32,
    name: &'a str,
    category: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_deliverable: bool,
    placement: Placement,
    conflict: bool,
}

fn render_json(
    schedule: &Schedule,
    catalog: &CatalogFile,
    role: Role,
    view: &View<'_>,
) -> Result<String> {
    let doc = JsonSchedule {
        project: &catalog.project.name,
        role,
        start_date: catalog.start_date(),
        end_date: schedule.project_end(),
        stages: view
            .rows
            .iter()
            .map(|r| JsonStage {
                id: &r.template.id,
                number_index: r.template.number_index,
                name: &r.template.name,
                category: &r.template.category,
                start_date: r.stage.start_date,
                end_date: r.stage.end_date,
                is_deliverable: r.template.is_deliverable,
                placement: r.stage.placement,
                conflict: r.conflict,
            })
            .collect(),
        warnings: &view.warnings,
        conflicts: &view.conflicts,
    };

    let mut s = serde_json::to_string_pretty(&doc)?;
    s.push('\n');
    Ok(s)
}
