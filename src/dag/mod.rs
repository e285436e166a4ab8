// src/dag/mod.rs

//! Stage dependency graph and date scheduling.
//!
//! - [`graph`] holds the dependency graph over a stage catalog.
//! - [`scheduler`] places every stage on the calendar.
//! - [`schedule`] defines the result types (computed stages, warnings,
//!   conflicts, diffs).

pub mod graph;
pub mod schedule;
pub mod scheduler;

pub use graph::{DanglingEdge, StageGraph};
pub use schedule::{
    ComputedStage, OverrideConflict, Placement, Schedule, ScheduleDiff, ScheduleWarning,
    StageMove,
};
pub use scheduler::{compute, ScheduleOptions, StageScheduler};
