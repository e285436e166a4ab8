// src/stage/mod.rs

//! Stage templates and the caller-owned override map.
//!
//! - [`template`] holds the immutable catalog entry type.
//! - [`overrides`] holds manual date pins and the pure helpers callers use
//!   before every recalculation.

pub mod overrides;
pub mod template;

pub use overrides::{
    apply_override, apply_override_as, remove_override, toggle_lock, DateOverride, Overrides,
};
pub use template::{StageTemplate, DEFAULT_DURATION_DAYS, MAX_DURATION_DAYS};

/// Canonical stage identifier used throughout the crate.
pub type StageId = String;
