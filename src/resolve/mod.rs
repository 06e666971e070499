// src/resolve/mod.rs

//! Target resolution.
//!
//! Turns the loosely typed `targets` of a [`Configuration`] into
//! [`ResolvedBuild`]s: absolute entry and output paths, the source and ignore
//! pattern sets each build compiles, and the compiler options.
//!
//! A malformed target is reported on its own; the other targets still
//! resolve (see [`Resolution`]).
//!
//! [`Configuration`]: crate::config::Configuration

pub mod build;
pub mod resolver;
pub mod target;

pub use build::ResolvedBuild;
pub use resolver::{resolve_targets, select_builds, Resolution};
pub use target::{target_name, TargetSpec, OVERRIDE_ALL};
