// src/exec/backend.rs

//! Pluggable build backend abstraction.
//!
//! The runtime talks to a `BuildBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests.
//!
//! - `RealBuildBackend` is the implementation used by `buildjs`. It runs
//!   each build as its own Tokio task and reports the result as
//!   `RuntimeEvent::BuildFinished`.
//! - Tests can provide their own `BuildBackend` that, for example, records
//!   which builds were started and immediately emits `BuildFinished`.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{BuildId, RuntimeEvent};
use crate::errors::Result;
use crate::exec::runner::run_build;

/// One compiler run the runtime wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub id: BuildId,
    /// Target name, for log output.
    pub name: String,
    pub argv: Vec<String>,
}

/// Trait abstracting how builds are executed.
///
/// Implementations must not block until the build ends: they start it and
/// report completion later through a `RuntimeEvent::BuildFinished`.
pub trait BuildBackend: Send {
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Backend that launches the real compiler with `tokio::process`.
#[derive(Debug, Clone)]
pub struct RealBuildBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealBuildBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runtime_tx }
    }
}

impl BuildBackend for RealBuildBackend {
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the spawned task doesn't borrow `self`.
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let outcome = run_build(&request.id, &request.argv).await;
                let event = RuntimeEvent::BuildFinished {
                    build: request.id,
                    outcome,
                };
                if tx.send(event).await.is_err() {
                    debug!("runtime gone before build finished");
                }
            });
            Ok(())
        })
    }
}
