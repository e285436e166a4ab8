// src/lib.rs

pub mod access;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod render;
pub mod stage;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::CatalogFile;
use crate::config::parse_duration;
use crate::dag::StageGraph;
use crate::engine::{evaluate, CoreSession, Session, SessionEvent};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - catalog loading
/// - scheduling + rendering
/// - (optional) file watcher and recompute session
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let options = args.session_options();

    if args.dry_run {
        let catalog = load_and_validate(&config_path)?;
        print_dry_run(&catalog);
        return Ok(());
    }

    if !args.watch {
        let catalog = load_and_validate(&config_path)?;
        let evaluation = evaluate(&catalog, &options)?;
        print!("{}", evaluation.output);
        return Ok(());
    }

    // Watch mode tolerates a broken catalog at startup; the session prints an
    // error banner and waits for the next save.
    let cache_ttl = match load_and_validate(&config_path) {
        Ok(catalog) => catalog.cache_ttl,
        Err(err) => {
            warn!(error = %err, "initial catalog invalid; using default cache ttl");
            default_cache_ttl()
        }
    };

    let (tx, rx) = mpsc::channel::<SessionEvent>(64);
    let _watcher_handle = crate::watch::spawn_watcher(&config_path, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SessionEvent::ShutdownRequested).await;
        });
    }

    info!(path = ?config_path, ?cache_ttl, "starting watch session");

    let core = CoreSession::new(options, cache_ttl);
    let session = Session::new(core, config_path, rx, std::io::stdout());
    session.run().await?;
    Ok(())
}

fn default_cache_ttl() -> Duration {
    parse_duration(&crate::config::WatchSection::default().cache_ttl)
        .unwrap_or(Duration::from_secs(600))
}

/// Simple dry-run output: print stages, deps and overrides.
fn print_dry_run(catalog: &CatalogFile) {
    let graph = StageGraph::from_templates(&catalog.stages);

    println!("princess dry-run");
    if !catalog.project.name.is_empty() {
        println!("  project.name = {}", catalog.project.name);
    }
    println!("  project.start_date = {}", catalog.start_date());
    println!(
        "  project.default_duration_days = {}",
        catalog.project.default_duration_days
    );
    println!(
        "  project.unknown_dependency = {:?}",
        catalog.project.unknown_dependency
    );
    println!();

    println!("stages ({}):", catalog.stages.len());
    for stage in &catalog.stages {
        println!("  {:>3}. {} ({})", stage.number_index, stage.id, stage.name);
        if !stage.category.is_empty() {
            println!("      category: {}", stage.category);
        }
        match stage.estimated_duration_days {
            Some(days) if days > 0 => println!("      duration: {days}d"),
            _ => println!(
                "      duration: {}d (default)",
                catalog.project.default_duration_days
            ),
        }
        if !stage.dependencies.is_empty() {
            println!("      after: {:?}", stage.dependencies);
        }
        let downstream = graph.downstream_of(&stage.id);
        if !downstream.is_empty() {
            println!("      cascades to: {:?}", downstream);
        }
        if stage.is_deliverable {
            println!("      deliverable: true");
        }
        if let Some(o) = catalog.overrides.get(&stage.id) {
            println!("      override: {} (locked: {})", o.date, o.locked);
        }
    }

    debug!("dry-run complete (no schedule computed)");
}
