// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the compiler with `tokio::process::Command` and reports back to the
//! runtime via `RuntimeEvent`s.
//!
//! - [`runner`] runs one compiler invocation and captures its output.
//! - [`backend`] provides the `BuildBackend` trait and the
//!   `RealBuildBackend` the runtime uses in production, which tests replace
//!   with a fake implementation.

pub mod backend;
pub mod runner;

pub use backend::{BuildBackend, BuildRequest, RealBuildBackend};
pub use runner::run_build;
