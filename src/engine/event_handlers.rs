// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::engine::state::TargetState;
use crate::engine::{RuntimeOptions, BuildId, TriggerReason};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Launch the compiler for this build.
    StartBuild(BuildId),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub(crate) fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a build request.
///
/// - idle build: start it
/// - running build: remember one follow-up
/// - unknown or retired id, or shutting down: ignore
pub fn handle_build_request(
    builds: &mut BTreeMap<BuildId, TargetState>,
    shutting_down: bool,
    build: BuildId,
    reason: TriggerReason,
) -> CoreStep {
    if shutting_down {
        debug!(build = %build, ?reason, "shutting down; ignoring build request");
        return CoreStep::continue_with(Vec::new());
    }

    let Some(state) = builds.get_mut(&build).filter(|s| !s.retired) else {
        warn!(build = %build, ?reason, "build requested for unknown id");
        return CoreStep::continue_with(Vec::new());
    };

    if state.request() {
        debug!(build = %build, ?reason, "starting build");
        CoreStep::continue_with(vec![CoreCommand::StartBuild(build)])
    } else {
        debug!(build = %build, ?reason, "build running; follow-up queued");
        CoreStep::continue_with(Vec::new())
    }
}

/// Handle the end of a build: back to idle, or straight into the queued
/// follow-up.
pub fn handle_build_finished(
    builds: &mut BTreeMap<BuildId, TargetState>,
    options: &RuntimeOptions,
    shutting_down: bool,
    build: BuildId,
) -> CoreStep {
    let mut commands = Vec::new();

    match builds.get_mut(&build) {
        None => {
            warn!(build = %build, "completion for unknown id");
        }
        Some(state) => {
            if shutting_down {
                state.pending = false;
            }
            if state.finish() {
                debug!(build = %build, "starting queued follow-up build");
                commands.push(CoreCommand::StartBuild(build.clone()));
            } else if state.retired {
                builds.remove(&build);
            }
        }
    }

    let idle = all_idle(builds);
    let keep_running = !((options.exit_when_idle || shutting_down) && idle);

    CoreStep {
        commands,
        keep_running,
    }
}

/// Stop accepting requests, drop queued follow-ups and keep running only
/// while builds are still in flight.
pub fn handle_shutdown(builds: &mut BTreeMap<BuildId, TargetState>) -> CoreStep {
    for state in builds.values_mut() {
        state.pending = false;
    }
    CoreStep {
        commands: Vec::new(),
        keep_running: !all_idle(builds),
    }
}

pub(crate) fn all_idle(builds: &BTreeMap<BuildId, TargetState>) -> bool {
    builds.values().all(|s| !s.is_building())
}
