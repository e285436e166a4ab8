// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::SessionEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a watcher that sends [`SessionEvent::CatalogChanged`] whenever the
/// catalog file at `catalog` is created or modified.
///
/// The parent directory is watched rather than the file itself, because many
/// editors save by writing a new file and renaming it over the old one.
pub fn spawn_watcher(
    catalog: impl AsRef<Path>,
    session_tx: mpsc::Sender<SessionEvent>,
) -> Result<WatcherHandle> {
    let catalog = absolute(catalog.as_ref());
    let dir = catalog
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("princess: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("princess: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {:?}", dir))?;

    info!("watching catalog {:?}", catalog);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_relevant(&event, &catalog) {
                continue;
            }
            debug!(kind = ?event.kind, "catalog file changed");
            if session_tx.send(SessionEvent::CatalogChanged).await.is_err() {
                warn!("session channel closed; stopping watcher loop");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn is_relevant(event: &Event, catalog: &Path) -> bool {
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
    );
    kind_matters && event.paths.iter().any(|p| absolute(p) == catalog)
}

/// Canonical form of `path`, also for files that do not exist yet.
///
/// A missing file resolves through its canonical parent directory, so a
/// catalog created after startup still compares equal to the paths notify
/// reports for it.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}
