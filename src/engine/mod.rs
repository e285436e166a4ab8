// src/engine/mod.rs

//! Recompute-on-edit session.
//!
//! This module ties together:
//! - the stage scheduler
//! - the schedule cache keyed by catalog content hash
//! - the session event loop that reacts to:
//!   - catalog file changes
//!   - shutdown signals
//!
//! The pure core lives in [`core`]; the async/IO shell is implemented in
//! [`runtime`].

use chrono::NaiveDate;

use crate::access::Role;
use crate::types::OutputFormat;

/// Events flowing into the session from the watcher and signal handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The catalog file was written; re-read and recompute.
    CatalogChanged,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// How a catalog is turned into output. Shared by one-shot and watch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub role: Role,
    pub format: OutputFormat,
    /// Use the order-dependent, never-failing computation.
    pub lenient: bool,
    /// Replaces `[project].start_date` when set.
    pub start_date: Option<NaiveDate>,
}

pub mod core;
pub mod runtime;

pub use self::core::{evaluate, CoreSession, CoreStep, Evaluation};
pub use self::runtime::Session;
