// src/engine/mod.rs

//! Build orchestration.
//!
//! This module ties together:
//! - the per-target build state (idle, building, one pending follow-up)
//! - the change detectors that turn filesystem events into build requests
//! - the main runtime event loop that reacts to:
//!   - filesystem events (sources and the configuration file)
//!   - manual triggers
//!   - build completions
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`]. [`session`] holds everything derived from one
//! loaded configuration.

use std::path::PathBuf;

/// Identifies one resolved build (see `ResolvedBuild::id`). Target names are
/// only operator selectors; two builds may share one.
pub type BuildId = String;

/// Result of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildOutcome {
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failed(code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Why a build was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Unconditional build when a session starts (startup or reload).
    Startup,
    /// A relevant source changed.
    FileWatch,
    /// Requested by the operator.
    Manual,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Exit once every target is idle (batch builds).
    pub exit_when_idle: bool,
    /// Build every target when a session starts.
    pub initial_build: bool,
    /// Watch sources and the configuration file after the initial build.
    pub watch: bool,
}

impl RuntimeOptions {
    pub fn batch() -> Self {
        Self {
            exit_when_idle: true,
            initial_build: true,
            watch: false,
        }
    }

    pub fn watch() -> Self {
        Self {
            exit_when_idle: false,
            initial_build: true,
            watch: true,
        }
    }

    pub fn manual() -> Self {
        Self {
            exit_when_idle: false,
            initial_build: false,
            watch: false,
        }
    }
}

/// Events flowing into the runtime from watchers, backends, stdin, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The filesystem reported activity on this path.
    FileChanged(PathBuf),
    /// A build should run.
    BuildRequested {
        build: BuildId,
        reason: TriggerReason,
    },
    /// A compiler process for `build` exited.
    BuildFinished {
        build: BuildId,
        outcome: BuildOutcome,
    },
    /// The operator asked for a target by name (or `all`).
    ManualTrigger(String),
    /// Graceful shutdown requested (Ctrl-C or end of input).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod session;
pub mod state;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::{RunSummary, Runtime};
pub use session::{BuildPlan, PlannedBuild};
pub use state::{BuildStatus, TargetState};
