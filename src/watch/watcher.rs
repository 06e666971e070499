// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle stops file watching and ends the
/// forwarding task.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl WatcherHandle {
    /// Directories watched recursively.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

/// Spawn a filesystem watcher that forwards every reported path to the
/// runtime as `RuntimeEvent::FileChanged`.
///
/// - `roots` are watched recursively; missing directories are skipped with a
///   warning.
/// - `config_path`, when given, has its directory watched non-recursively so
///   configuration edits reach the runtime.
///
/// Relevance and novelty are decided by the runtime's change detectors, not
/// here.
pub fn spawn_watcher(
    roots: Vec<PathBuf>,
    config_path: Option<&Path>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("buildjs: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("buildjs: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut watched = Vec::new();
    for root in roots {
        if !root.is_dir() {
            warn!(?root, "watch root does not exist; skipping");
            continue;
        }
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("file watcher started on {:?}", root);
        watched.push(root);
    }

    if let Some(config_path) = config_path {
        let dir = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let covered = watched.iter().any(|root| dir.starts_with(root));
        if !covered {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            debug!(?dir, "watching configuration directory");
        }
    }

    // Async task that forwards notify events to the runtime.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in event.paths {
                if runtime_tx.send(RuntimeEvent::FileChanged(path)).await.is_err() {
                    debug!("runtime channel closed; stopping watcher forwarding");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        roots: watched,
    })
}
