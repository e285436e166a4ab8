// src/types.rs

use serde::Deserialize;

/// What a checked computation does with a dependency id that names no stage.
///
/// - `Fail`: reject the whole batch with `ScheduleError::UnknownDependency`
///   (default behaviour).
/// - `Drop`: ignore the edge and report it as a warning alongside the
///   schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDependencyPolicy {
    Fail,
    Drop,
}

impl Default for UnknownDependencyPolicy {
    fn default() -> Self {
        UnknownDependencyPolicy::Fail
    }
}

/// How a computed schedule is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width text table.
    Table,
    /// Pretty-printed JSON document.
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}
