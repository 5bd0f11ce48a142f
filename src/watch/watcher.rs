// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::errors::Result;

/// A filesystem change observed somewhere under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Category of change, reduced from notify's event taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
}

/// Map a notify event kind onto the reduced taxonomy.
///
/// Access and metadata-only events return `None`; neither indicates content
/// worth restarting for.
fn map_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Create),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Write),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        _ => None,
    }
}

/// Register `dir` with the OS watcher and record it in the watch set.
///
/// The OS registration is re-issued even for directories already in the set:
/// removing a watched directory silently drops its watch, so a re-created
/// path needs a fresh registration under the same name.
fn watch_dir(
    watcher: &mut RecommendedWatcher,
    watched: &mut HashSet<PathBuf>,
    dir: &Path,
) -> notify::Result<()> {
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    if watched.insert(dir.to_path_buf()) {
        debug!("watching directory {}", dir.display());
    }
    Ok(())
}

/// Walk the directories below `root` (excluding `root` itself) and register
/// each one. Enumeration and registration failures are logged and skipped;
/// symlinked directories are not followed.
fn register_tree(watcher: &mut RecommendedWatcher, watched: &mut HashSet<PathBuf>, root: &Path) {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("failed to read directory {}: {err}", dir.display());
                continue;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("failed to read entry in {}: {err}", dir.display());
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!("failed to stat {}: {err}", entry.path().display());
                    continue;
                }
            };
            if !file_type.is_dir() {
                continue;
            }
            let path = entry.path();
            if let Err(err) = watch_dir(watcher, watched, &path) {
                warn!("failed to watch {}: {err}", path.display());
            }
            stack.push(path);
        }
    }
}

/// Bring a newly created directory under observation, along with anything
/// already created inside it before its watch took effect.
fn add_directory(watcher: &mut RecommendedWatcher, watched: &mut HashSet<PathBuf>, dir: &Path) {
    match watcher.watch(dir, RecursiveMode::NonRecursive) {
        Ok(()) => {
            if watched.insert(dir.to_path_buf()) {
                info!("watching new directory {}", dir.display());
            }
        }
        Err(err) => {
            warn!("failed to watch new directory {}: {err}", dir.display());
            return;
        }
    }
    register_tree(watcher, watched, dir);
}

/// Spawn a filesystem watcher over the tree rooted at `root`.
///
/// Every directory under `root` is registered individually in non-recursive
/// mode, and directories created or moved in later are registered as their
/// events arrive, so new subtrees are covered without a restart.
///
/// - Failure to construct the watcher or to register `root` itself is
///   returned as an error; failures on individual subdirectories are logged
///   and skipped.
/// - `abort` stops the watcher: the notify handle is dropped and the returned
///   stream closes. Watch errors reported during steady-state operation are
///   logged and do not close the stream.
pub fn spawn_watcher(
    root: &Path,
    mut abort: oneshot::Receiver<()>,
) -> Result<mpsc::UnboundedReceiver<ChangeEvent>> {
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if raw_tx.send(res).is_err() {
                // We can't log via tracing here easily, so fallback to stderr.
                eprintln!("watchrun: failed to forward notify event");
            }
        },
        Config::default(),
    )?;

    let mut watched = HashSet::new();
    watcher.watch(&root, RecursiveMode::NonRecursive)?;
    watched.insert(root.clone());
    register_tree(&mut watcher, &mut watched, &root);

    info!(
        "watching {} directories under {}",
        watched.len(),
        root.display()
    );

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        'events: loop {
            tokio::select! {
                aborted = &mut abort => {
                    match aborted {
                        Ok(()) => info!("stopping file watcher"),
                        Err(_) => debug!("shutdown handle dropped; stopping file watcher"),
                    }
                    break;
                }
                maybe = raw_rx.recv() => {
                    let Some(res) = maybe else { break };
                    let event = match res {
                        Ok(event) => event,
                        Err(err) => {
                            warn!("file watch error: {err}");
                            continue;
                        }
                    };
                    debug!(?event, "received notify event");
                    let Some(kind) = map_kind(&event.kind) else { continue };
                    for path in event.paths {
                        // Register new directories before forwarding, so files
                        // written right after a mkdir are not missed. A
                        // directory moved into the tree arrives as a rename
                        // and needs the same registration.
                        if matches!(kind, ChangeKind::Create | ChangeKind::Rename) && path.is_dir()
                        {
                            add_directory(&mut watcher, &mut watched, &path);
                        }
                        if tx.send(ChangeEvent { path, kind }).is_err() {
                            break 'events;
                        }
                    }
                }
            }
        }
        drop(watcher);
        debug!("watcher event loop finished");
    });

    Ok(rx)
}
