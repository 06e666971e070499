// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated per-build state
//! - a list of commands describing which builds the IO shell should start
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for
//! change detection, configuration reloads, spawning the compiler and
//! shutdown. It turns filesystem and manual events into `BuildRequested`
//! before they reach the core.
//!
//! The core is tested without any Tokio, channels, filesystem, or processes.

use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::event_handlers::{
    all_idle, handle_build_finished, handle_build_request, handle_shutdown, CoreStep,
};
use crate::engine::state::TargetState;
use crate::engine::{BuildId, RuntimeEvent, RuntimeOptions};

/// Pure core runtime state.
///
/// No two runs of one build ever overlap; distinct builds run in parallel.
#[derive(Debug)]
pub struct CoreRuntime {
    builds: BTreeMap<BuildId, TargetState>,
    options: RuntimeOptions,
    shutting_down: bool,
}

impl CoreRuntime {
    pub fn new<I, S>(builds: I, options: RuntimeOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BuildId>,
    {
        Self {
            builds: builds
                .into_iter()
                .map(|id| (id.into(), TargetState::default()))
                .collect(),
            options,
            shutting_down: false,
        }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// True when nothing is building.
    pub fn is_idle(&self) -> bool {
        all_idle(&self.builds)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    pub fn state(&self, build: &str) -> Option<&TargetState> {
        self.builds.get(build)
    }

    /// Ids of the live (non-retired) builds.
    pub fn build_ids(&self) -> impl Iterator<Item = &str> {
        self.builds
            .iter()
            .filter(|(_, s)| !s.retired)
            .map(|(id, _)| id.as_str())
    }

    /// Swap in the build list of a reloaded configuration.
    ///
    /// Surviving ids keep their state. Removed builds that are still running
    /// are retired: their completion is accepted, then forgotten.
    pub fn replace_builds<I, S>(&mut self, builds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<BuildId>,
    {
        let mut next: BTreeMap<BuildId, TargetState> = BTreeMap::new();
        for id in builds {
            let id = id.into();
            let mut state = self.builds.remove(&id).unwrap_or_default();
            state.retired = false;
            next.insert(id, state);
        }
        for (id, mut state) in std::mem::take(&mut self.builds) {
            if state.is_building() {
                debug!(build = %id, "build removed while running; retiring");
                state.retired = true;
                state.pending = false;
                next.insert(id, state);
            }
        }
        self.builds = next;
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    ///
    /// `FileChanged` and `ManualTrigger` need the filesystem or the session
    /// to resolve, so the shell translates them first; here they are no-ops.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::BuildRequested { build, reason } => {
                handle_build_request(&mut self.builds, self.shutting_down, build, reason)
            }
            RuntimeEvent::BuildFinished { build, .. } => handle_build_finished(
                &mut self.builds,
                &self.options,
                self.shutting_down,
                build,
            ),
            RuntimeEvent::ShutdownRequested => {
                self.shutting_down = true;
                handle_shutdown(&mut self.builds)
            }
            RuntimeEvent::FileChanged(_) | RuntimeEvent::ManualTrigger(_) => {
                CoreStep::continue_with(Vec::new())
            }
        }
    }
}
