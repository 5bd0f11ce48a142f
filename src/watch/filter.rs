// src/watch/filter.rs

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::debug;

use crate::watch::patterns::PatternSet;
use crate::watch::watcher::ChangeEvent;

/// Spawn the pattern filter between the raw event stream and the debouncer.
///
/// A changed path passes when its basename matches a configured pattern and
/// the path is not a directory that still exists. Paths are emitted once per
/// matching pattern; the debounce stage collapses the duplicates. Ends when
/// the input stream closes, closing its own output.
pub fn spawn_filter(
    mut events: mpsc::UnboundedReceiver<ChangeEvent>,
    patterns: PatternSet,
) -> mpsc::UnboundedReceiver<PathBuf> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match std::fs::metadata(&event.path) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {}
                Err(err) => {
                    // Removed paths fail the stat but are still matched below.
                    debug!("stat {} failed: {err}", event.path.display());
                }
            }
            let Some(name) = event.path.file_name() else {
                continue;
            };
            for _ in 0..patterns.match_count(name) {
                if tx.send(event.path.clone()).is_err() {
                    return;
                }
            }
        }
        debug!("filter loop finished");
    });
    rx
}
