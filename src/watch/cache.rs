// src/watch/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// Last observed state of a file: its mtime, or `None` once it has been seen
/// missing.
pub type FileState = Option<SystemTime>;

/// In-memory cache of file modification times for one build.
///
/// Starts empty and is never persisted, so the first state observed for a
/// path always counts as news.
#[derive(Debug, Default)]
pub struct ChangeCache {
    states: HashMap<PathBuf, FileState>,
}

impl ChangeCache {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// The recorded state for `path`, or `None` if the path was never seen.
    pub fn get(&self, path: &Path) -> Option<FileState> {
        self.states.get(path).copied()
    }

    /// Record `state` for `path`.
    ///
    /// Returns `true` if this is news: the path was unseen or its stored
    /// state differs. Returns `false` for a repeat of the stored state.
    pub fn update(&mut self, path: &Path, state: FileState) -> bool {
        match self.states.get(path) {
            Some(previous) if *previous == state => false,
            _ => {
                debug!(?path, ?state, "change cache updated");
                self.states.insert(path.to_path_buf(), state);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
