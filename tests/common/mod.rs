#![allow(dead_code)]

pub use buildjs_test_utils::init_tracing;

use std::path::{Path, PathBuf};

use buildjs::fs::mock::MockFileSystem;

/// Directory the test configurations pretend to live in.
pub const ROOT: &str = "/project";

/// Absolute path of `rel` under [`ROOT`].
pub fn abs(rel: &str) -> PathBuf {
    Path::new(ROOT).join(rel)
}

/// Absolute path of `rel` under [`ROOT`], as a string.
pub fn abs_str(rel: &str) -> String {
    abs(rel).to_string_lossy().into_owned()
}

/// A mock project containing the given files (relative to [`ROOT`]).
pub fn project_fs(files: &[&str]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for file in files {
        fs.add_file(abs(file), "// js\n");
    }
    fs
}
