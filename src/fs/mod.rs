// src/fs/mod.rs

//! Filesystem access used by config loading, glob expansion and change
//! detection. Production code goes through [`RealFileSystem`]; tests use
//! [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Create or replace `path`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Last modification time of `path`.
    ///
    /// `Ok(None)` means the path does not exist (deleted or moved away);
    /// callers treat that as a state, not a failure.
    fn modified(&self, path: &Path) -> Result<Option<SystemTime>>;

    /// Every file below the directory `base`, in no particular order.
    ///
    /// Symlinks are followed but never twice around a loop. Hidden entries
    /// (names starting with `.`) below `base` are skipped along with
    /// everything inside them.
    fn walk_files(&self, base: &Path) -> Result<Vec<PathBuf>>;
}

/// Whether a directory entry name marks it hidden.
pub fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?,
            _ => {}
        }
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("failed to resolve {}", path.display()))
    }

    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", path.display()));
            }
        };
        meta.modified()
            .map(Some)
            .with_context(|| format!("no mtime for {}", path.display()))
    }

    fn walk_files(&self, base: &Path) -> Result<Vec<PathBuf>> {
        if !base.is_dir() {
            anyhow::bail!("not a directory: {}", base.display());
        }

        let walker = WalkDir::new(base)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(err) if err.loop_ancestor().is_some() => {
                    debug!(path = ?err.path(), "symlink loop; not descending");
                }
                Err(err) => {
                    warn!(path = ?err.path(), error = %err, "skipping unreadable path");
                }
            }
        }
        Ok(files)
    }
}
