// src/runner.rs

//! Orchestration of the watch, filter, debounce, restart loop.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::info;

use crate::errors::Result;
use crate::exec::ProcessHandle;
use crate::watch::{gather, spawn_filter, spawn_watcher, PatternSet};

/// Timing knobs for a watch session.
#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    /// Anti-thrash pause applied before every command start.
    pub startup_delay: Duration,
    /// Quiet window over which a burst of changes is coalesced.
    pub quiet_window: Duration,
    /// Bounded wait between graceful and forceful termination.
    pub grace_period: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(200),
            quiet_window: Duration::from_millis(500),
            grace_period: Duration::from_secs(2),
        }
    }
}

/// One watch-and-restart session: a watched root, compiled patterns, and the
/// supervised command.
pub struct Runner {
    root: PathBuf,
    patterns: PatternSet,
    command: ProcessHandle,
    options: RunnerOptions,
    abort: oneshot::Receiver<()>,
}

/// Stops a running [`Runner`] from the outside.
///
/// `shutdown` is idempotent. Dropping the handle without calling it also
/// stops the session; the watcher treats a closed abort channel as a
/// shutdown request.
#[derive(Debug)]
pub struct ShutdownHandle {
    abort: Mutex<Option<oneshot::Sender<()>>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let mut slot = match self.abort.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(abort) = slot.take() {
            let _ = abort.send(());
        }
    }
}

impl Runner {
    pub fn new(
        root: PathBuf,
        patterns: PatternSet,
        command: ProcessHandle,
        options: RunnerOptions,
    ) -> (Self, ShutdownHandle) {
        let (abort_tx, abort_rx) = oneshot::channel();
        let runner = Self {
            root,
            patterns,
            command,
            options,
            abort: abort_rx,
        };
        let handle = ShutdownHandle {
            abort: Mutex::new(Some(abort_tx)),
        };
        (runner, handle)
    }

    /// Drive the session until shutdown.
    ///
    /// Starts the command once, then restarts it for every debounced batch
    /// of matching changes. Returns after the shutdown handle fires and the
    /// pipeline has drained; the supervised process is terminated on the
    /// way out.
    pub async fn run(self) -> Result<()> {
        info!(
            "watching {} for changes matching [{}]",
            self.root.display(),
            self.patterns
        );
        let events = spawn_watcher(&self.root, self.abort)?;
        let mut matched = spawn_filter(events, self.patterns);

        self.command.start(self.options.startup_delay).await;

        while let Some(first) = matched.recv().await {
            let files = gather(first, &mut matched, self.options.quiet_window).await;
            self.command.terminate(self.options.grace_period).await;
            info!(
                "files changed: {}",
                files
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            self.command.start(self.options.startup_delay).await;
        }

        self.command.terminate(self.options.grace_period).await;
        info!("stopped watching {}", self.root.display());
        Ok(())
    }
}
