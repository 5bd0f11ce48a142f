// src/watch/debounce.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

/// Collect matched paths until the quiet window closes.
///
/// The window is anchored at the first change and does not slide: paths
/// arriving within `quiet_window` of `first` are absorbed into the same
/// batch, anything later starts the next one. Duplicates collapse and the
/// batch comes back sorted, so log output is stable regardless of event
/// arrival order.
///
/// Returns early with whatever was gathered if the change stream closes.
pub async fn gather(
    first: PathBuf,
    changes: &mut mpsc::UnboundedReceiver<PathBuf>,
    quiet_window: Duration,
) -> Vec<PathBuf> {
    let mut batch = BTreeSet::new();
    batch.insert(first);

    let window = tokio::time::sleep(quiet_window);
    tokio::pin!(window);

    loop {
        tokio::select! {
            _ = &mut window => break,
            maybe = changes.recv() => match maybe {
                Some(path) => {
                    batch.insert(path);
                }
                None => break,
            },
        }
    }

    batch.into_iter().collect()
}
