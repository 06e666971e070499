// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling `source` / `ignore` glob patterns and matching paths against
//!   them ([`patterns`], [`path_utils`]).
//! - Tracking the last observed mtime of every source per target
//!   ([`cache`], [`detector`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) ([`watcher`]).
//!
//! It does **not** start builds; it only decides which targets a filesystem
//! change makes stale.

pub mod cache;
pub mod detector;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use cache::{ChangeCache, FileState};
pub use detector::{ChangeDetector, Detection};
pub use patterns::{expand, expand_build, includes_file, matches, PatternSet};
pub use watcher::{spawn_watcher, WatcherHandle};
