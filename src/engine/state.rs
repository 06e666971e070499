// src/engine/state.rs

//! Per-target build state.

/// Whether a compiler process for the target is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStatus {
    #[default]
    Idle,
    Building,
}

/// State of one target in the core runtime.
///
/// `pending` is a depth-1 inbox: any number of requests that arrive while a
/// build is running collapse into a single follow-up build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetState {
    pub status: BuildStatus,
    pub pending: bool,
    /// The target disappeared in a configuration reload while building; the
    /// entry is dropped once that build finishes.
    pub retired: bool,
}

impl TargetState {
    pub fn is_building(&self) -> bool {
        self.status == BuildStatus::Building
    }

    /// Record a build request. Returns `true` if a build should start now.
    pub fn request(&mut self) -> bool {
        match self.status {
            BuildStatus::Idle => {
                self.status = BuildStatus::Building;
                true
            }
            BuildStatus::Building => {
                self.pending = true;
                false
            }
        }
    }

    /// Record that the running build exited. Returns `true` if the pending
    /// follow-up should start now.
    pub fn finish(&mut self) -> bool {
        if self.pending && !self.retired {
            self.pending = false;
            self.status = BuildStatus::Building;
            return true;
        }
        self.pending = false;
        self.status = BuildStatus::Idle;
        false
    }
}
