// src/engine/core.rs

//! Pure core of the recompute-on-edit session.
//!
//! [`CoreSession`] consumes catalog contents and produces the text to print
//! plus a diff against the previous schedule. It has no channels, no Tokio
//! types and performs no IO, so it is unit tested directly.

use std::borrow::Cow;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::{parse_and_validate, CatalogFile};
use crate::dag::{Schedule, ScheduleDiff, StageScheduler};
use crate::engine::SessionOptions;
use crate::errors::Result;
use crate::render::{render, render_error};
use crate::watch::content_hash;

/// A computed schedule and its rendering.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub schedule: Schedule,
    pub output: String,
}

/// Compute and render a validated catalog.
pub fn evaluate(catalog: &CatalogFile, options: &SessionOptions) -> Result<Evaluation> {
    let catalog: Cow<'_, CatalogFile> = match options.start_date {
        Some(start) if start != catalog.start_date() => {
            let mut owned = catalog.clone();
            owned.project.start_date = start;
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(catalog),
    };

    let scheduler = StageScheduler::new(catalog.schedule_options());
    let schedule = if options.lenient {
        let stages = scheduler.compute(&catalog.stages, catalog.start_date(), &catalog.overrides);
        Schedule::new(stages, Vec::new(), Vec::new())
    } else {
        scheduler.compute_checked(&catalog.stages, catalog.start_date(), &catalog.overrides)?
    };

    let output = render(&schedule, &catalog, options.role, options.format)?;
    Ok(Evaluation { schedule, output })
}

/// Decision returned by the core after handling one input.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    /// Text to print, if anything changed.
    pub output: Option<String>,
    /// Changes relative to the last successfully computed schedule.
    pub diff: Option<ScheduleDiff>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

/// Pure session state.
///
/// Identical contents in a row are ignored. Contents seen before within the
/// cache TTL (an undo, say) reuse the cached evaluation.
#[derive(Debug)]
pub struct CoreSession<C: Clock = SystemClock> {
    options: SessionOptions,
    cache: TtlCache<String, Evaluation, C>,
    last_hash: Option<String>,
    last_schedule: Option<Schedule>,
}

impl CoreSession<SystemClock> {
    pub fn new(options: SessionOptions, cache_ttl: Duration) -> Self {
        Self::with_clock(options, cache_ttl, SystemClock)
    }
}

impl<C: Clock> CoreSession<C> {
    pub fn with_clock(options: SessionOptions, cache_ttl: Duration, clock: C) -> Self {
        Self {
            options,
            cache: TtlCache::with_clock(cache_ttl, clock),
            last_hash: None,
            last_schedule: None,
        }
    }

    pub fn last_schedule(&self) -> Option<&Schedule> {
        self.last_schedule.as_ref()
    }

    /// Handle freshly read catalog contents.
    pub fn handle_contents(&mut self, contents: &str) -> CoreStep {
        let hash = content_hash(contents);
        if self.last_hash.as_deref() == Some(hash.as_str()) {
            debug!("catalog contents unchanged; nothing to do");
            return CoreStep {
                keep_running: true,
                ..CoreStep::default()
            };
        }
        self.last_hash = Some(hash.clone());
        self.cache.purge_expired();

        let evaluation = if let Some(hit) = self.cache.get(&hash).cloned() {
            debug!(hash = %hash, "reusing cached schedule");
            hit
        } else {
            match parse_and_validate(contents).and_then(|c| evaluate(&c, &self.options)) {
                Ok(evaluation) => {
                    self.cache.put(hash, evaluation.clone());
                    evaluation
                }
                Err(err) => {
                    warn!(error = %err, "catalog rejected; keeping previous schedule");
                    return CoreStep {
                        output: Some(render_error(&err)),
                        diff: None,
                        keep_running: true,
                    };
                }
            }
        };

        let diff = self
            .last_schedule
            .as_ref()
            .map(|previous| evaluation.schedule.diff(previous));

        if let Some(d) = &diff {
            info!(
                moved = d.moved.len(),
                added = d.added.len(),
                removed = d.removed.len(),
                "schedule recomputed"
            );
            for m in &d.moved {
                debug!(stage = %m.stage_id, shift_days = m.shift_days(), "stage moved");
            }
        }

        self.last_schedule = Some(evaluation.schedule);

        CoreStep {
            output: Some(evaluation.output),
            diff,
            keep_running: true,
        }
    }

    pub fn handle_shutdown(&mut self) -> CoreStep {
        info!("shutdown requested");
        CoreStep {
            output: None,
            diff: None,
            keep_running: false,
        }
    }
}
