// src/watch/detector.rs

//! Per-target change detection.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::fs::FileSystem;
use crate::resolve::ResolvedBuild;
use crate::watch::cache::ChangeCache;
use crate::watch::path_utils::absolutize;
use crate::watch::patterns::includes_file;

/// Outcome of feeding one filesystem event to a [`ChangeDetector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The path is not one of this target's sources.
    Ignored,
    /// A source, but its state matches the cache (duplicate event).
    Unchanged(PathBuf),
    /// A source that is new or has a new mtime.
    Changed(PathBuf),
    /// A source that no longer exists.
    Removed(PathBuf),
}

impl Detection {
    /// Whether the target must be rebuilt.
    pub fn requires_build(&self) -> bool {
        matches!(self, Detection::Changed(_) | Detection::Removed(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Detection::Ignored => None,
            Detection::Unchanged(p) | Detection::Changed(p) | Detection::Removed(p) => Some(p),
        }
    }
}

/// Decides whether filesystem events are relevant and novel for one build.
///
/// Owns that build's [`ChangeCache`] exclusively.
#[derive(Debug)]
pub struct ChangeDetector {
    build: ResolvedBuild,
    root: PathBuf,
    cache: ChangeCache,
}

impl ChangeDetector {
    /// `root` is used to absolutise relative event paths.
    pub fn new(build: ResolvedBuild, root: impl Into<PathBuf>) -> Self {
        Self {
            build,
            root: root.into(),
            cache: ChangeCache::new(),
        }
    }

    pub fn build(&self) -> &ResolvedBuild {
        &self.build
    }

    pub fn cache(&self) -> &ChangeCache {
        &self.cache
    }

    /// Classify one filesystem event.
    ///
    /// Irrelevant events cost one lexical path join and a glob match; the
    /// filesystem is only consulted for relevant ones.
    ///
    /// Errors reading the mtime are treated like a deletion: the file is in
    /// flux, so the build is considered stale.
    pub fn observe(&mut self, fs: &dyn FileSystem, event_path: &Path) -> Detection {
        let path = absolutize(&self.root, event_path);

        if !includes_file(&path, &self.build) {
            trace!(target = %self.build.name(), ?path, "event not relevant");
            return Detection::Ignored;
        }

        let state = match fs.modified(&path) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    target = %self.build.name(),
                    ?path,
                    error = %err,
                    "could not read mtime; treating as removed"
                );
                None
            }
        };

        if !self.cache.update(&path, state) {
            debug!(target = %self.build.name(), ?path, "mtime unchanged; skipping");
            return Detection::Unchanged(path);
        }

        match state {
            Some(_) => {
                debug!(target = %self.build.name(), ?path, "source changed");
                Detection::Changed(path)
            }
            None => {
                debug!(target = %self.build.name(), ?path, "source removed");
                Detection::Removed(path)
            }
        }
    }
}
