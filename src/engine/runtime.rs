// src/engine/runtime.rs

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::Clock;
use crate::errors::Result;

use super::core::{CoreSession, CoreStep};
use super::SessionEvent;

/// Drives a [`CoreSession`] in response to [`SessionEvent`]s.
///
/// This is a pure IO shell: it reads the catalog file when told it changed,
/// hands the contents to the core, and writes whatever the core returns.
pub struct Session<C: Clock, W: Write> {
    core: CoreSession<C>,
    catalog_path: PathBuf,
    event_rx: mpsc::Receiver<SessionEvent>,
    out: W,
}

impl<C: Clock + fmt::Debug, W: Write> fmt::Debug for Session<C, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("core", &self.core)
            .field("catalog_path", &self.catalog_path)
            .finish_non_exhaustive()
    }
}

impl<C: Clock, W: Write> Session<C, W> {
    pub fn new(
        core: CoreSession<C>,
        catalog_path: impl Into<PathBuf>,
        event_rx: mpsc::Receiver<SessionEvent>,
        out: W,
    ) -> Self {
        Self {
            core,
            catalog_path: catalog_path.into(),
            event_rx,
            out,
        }
    }

    /// Main event loop. Returns the output sink once the loop ends.
    ///
    /// - Reads the catalog once up front so the current timeline is printed
    ///   immediately.
    /// - Re-reads it on every `CatalogChanged`.
    /// - Stops on `ShutdownRequested` or when every sender is gone.
    pub async fn run(mut self) -> Result<W> {
        info!("princess session started");

        self.reload().await?;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("session event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "session received event");

            let keep_running = match event {
                SessionEvent::CatalogChanged => self.reload().await?,
                SessionEvent::ShutdownRequested => {
                    let step = self.core.handle_shutdown();
                    self.emit(step)?
                }
            };

            if !keep_running {
                info!("core requested exit; stopping session");
                break;
            }
        }

        info!("session exiting");
        Ok(self.out)
    }

    async fn reload(&mut self) -> Result<bool> {
        match tokio::fs::read_to_string(&self.catalog_path).await {
            Ok(contents) => {
                let step = self.core.handle_contents(&contents);
                self.emit(step)
            }
            Err(err) => {
                // Editors briefly remove the file while saving.
                warn!(path = ?self.catalog_path, error = %err, "could not read catalog; waiting for next change");
                Ok(true)
            }
        }
    }

    fn emit(&mut self, step: CoreStep) -> Result<bool> {
        if let Some(output) = step.output {
            self.out.write_all(output.as_bytes())?;
            self.out.flush()?;
        }
        Ok(step.keep_running)
    }
}
