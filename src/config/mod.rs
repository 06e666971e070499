// src/config/mod.rs

//! Configuration loading and validation for buildjs.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk, YAML or TOML (`loader.rs`).
//! - Validate document-level invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str, ConfigFormat};
pub use model::{CompilerSpec, Configuration, RawConfigFile, RawTargetSpec};
