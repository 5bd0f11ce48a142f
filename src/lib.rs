// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod runner;
pub mod watch;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::errors::{Result, WatchrunError};
use crate::exec::ProcessHandle;
use crate::runner::{Runner, RunnerOptions};
use crate::watch::PatternSet;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file values overridden field-wise by CLI flags)
/// - the watched root and the compiled pattern set
/// - the supervised command
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;

    let root = PathBuf::from(&cfg.directory);
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());
    if !root.is_dir() {
        return Err(WatchrunError::Config(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let patterns = PatternSet::compile(&cfg.patterns)?;
    if patterns.is_empty() {
        warn!("no patterns configured; no file change will ever match");
    }

    let command = ProcessHandle::new(cfg.command);
    let (runner, shutdown) = Runner::new(root, patterns, command, RunnerOptions::default());

    // Ctrl-C → graceful shutdown.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("interrupt received, shutting down");
        shutdown.shutdown();
    });

    runner.run().await
}
