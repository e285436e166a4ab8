// src/access.rs

//! Roles and the permission table.
//!
//! Every role check in the crate goes through [`permits`]; there are no
//! string comparisons on role names anywhere else.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Who is looking at (or editing) a project timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agency,
    Client,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// See the project timeline at all.
    ViewTimeline,
    /// See stages that are not client-facing deliverables.
    ViewInternalStages,
    /// Pin or unpin a stage date.
    EditOverrides,
    /// Lock a pinned date against recalculation.
    LockOverrides,
    /// Approve or request changes on a deliverable.
    ApproveDeliverables,
}

/// The permission table.
pub fn permits(role: Role, permission: Permission) -> bool {
    use Permission::*;

    match (role, permission) {
        (Role::Admin, _) => true,

        (Role::Agency, ViewTimeline | ViewInternalStages | EditOverrides) => true,
        (Role::Agency, LockOverrides | ApproveDeliverables) => false,

        (Role::Client, ViewTimeline | ApproveDeliverables) => true,
        (Role::Client, ViewInternalStages | EditOverrides | LockOverrides) => false,
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Agency
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Agency => "agency",
            Role::Client => "client",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "agency" => Ok(Role::Agency),
            "client" => Ok(Role::Client),
            other => Err(format!(
                "invalid role: {other} (expected \"admin\", \"agency\" or \"client\")"
            )),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::ViewTimeline => "view the timeline",
            Permission::ViewInternalStages => "view internal stages",
            Permission::EditOverrides => "edit stage date overrides",
            Permission::LockOverrides => "lock stage date overrides",
            Permission::ApproveDeliverables => "approve deliverables",
        };
        f.write_str(s)
    }
}
