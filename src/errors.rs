// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ScheduleError`] is returned by the pure scheduling core.
//! - [`AccessDenied`] is returned by role-gated helpers.
//! - [`PrincessError`] wraps both, plus config / IO failures, for the
//!   application layer.

use thiserror::Error;

use crate::access::{Permission, Role};
use crate::stage::StageId;

/// Why a checked schedule computation refused its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("cycle detected in stage dependencies involving stage '{stage}'")]
    CycleDetected { stage: StageId },

    #[error("stage '{stage}' depends on unknown stage '{dependency}'")]
    UnknownDependency { stage: StageId, dependency: StageId },

    #[error("stage '{stage}' has invalid estimated duration {days} (expected 0..={max})")]
    InvalidDuration { stage: StageId, days: i64, max: u32 },

    #[error("stage id '{stage}' appears more than once in the catalog")]
    DuplicateStage { stage: StageId },

    #[error("date arithmetic overflowed while placing stage '{stage}'")]
    DateOverflow { stage: StageId },
}

/// A role attempted something its permission table does not allow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("role {role} is not allowed to {permission}")]
pub struct AccessDenied {
    pub role: Role,
    pub permission: Permission,
}

#[derive(Error, Debug)]
pub enum PrincessError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PrincessError>;
