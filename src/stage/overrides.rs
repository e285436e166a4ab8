// src/stage/overrides.rs

//! Manual date pins.
//!
//! The override map is owned by the caller. Every
//! helper here is a pure update: it takes the current map by reference and
//! returns the next one, and the caller recomputes the schedule right after.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::access::{permits, Permission, Role};
use crate::errors::AccessDenied;
use crate::stage::StageId;

/// A user-supplied start date for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOverride {
    pub date: NaiveDate,
    /// Locked pins are shown with a badge and are meant to survive
    /// recalculation untouched.
    pub locked: bool,
}

/// Overrides keyed by stage id.
pub type Overrides = BTreeMap<StageId, DateOverride>;

/// Insert or replace the override for `stage_id`.
pub fn apply_override(
    overrides: &Overrides,
    stage_id: &str,
    date: NaiveDate,
    locked: bool,
) -> Overrides {
    let mut next = overrides.clone();
    let previous = next.insert(stage_id.to_string(), DateOverride { date, locked });
    debug!(stage = %stage_id, %date, locked, replaced = previous.is_some(), "applied override");
    next
}

/// Remove the override for `stage_id`, if any.
pub fn remove_override(overrides: &Overrides, stage_id: &str) -> Overrides {
    let mut next = overrides.clone();
    if next.remove(stage_id).is_some() {
        debug!(stage = %stage_id, "removed override");
    }
    next
}

/// Flip the lock flag of an existing override. No-op when the stage has none.
pub fn toggle_lock(overrides: &Overrides, stage_id: &str) -> Overrides {
    let mut next = overrides.clone();
    if let Some(entry) = next.get_mut(stage_id) {
        entry.locked = !entry.locked;
        debug!(stage = %stage_id, locked = entry.locked, "toggled override lock");
    }
    next
}

/// [`apply_override`] gated by the permission table.
pub fn apply_override_as(
    role: Role,
    overrides: &Overrides,
    stage_id: &str,
    date: NaiveDate,
    locked: bool,
) -> Result<Overrides, AccessDenied> {
    require(role, Permission::EditOverrides)?;
    if locked {
        require(role, Permission::LockOverrides)?;
    }
    Ok(apply_override(overrides, stage_id, date, locked))
}

fn require(role: Role, permission: Permission) -> Result<(), AccessDenied> {
    if permits(role, permission) {
        Ok(())
    } else {
        Err(AccessDenied { role, permission })
    }
}
