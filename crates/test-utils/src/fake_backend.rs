use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use buildjs::engine::{BuildOutcome, RuntimeEvent};
use buildjs::exec::{BuildBackend, BuildRequest};
use buildjs::errors::Result;

/// A fake backend that:
/// - records which builds were "run"
/// - (by default) reports `BuildFinished` right away, failing every build
///   whose target name or id is listed in `failing`.
///
/// With `manual_completion()` nothing is reported and the test sends
/// `BuildFinished` itself, which keeps builds "running" for as long as the
/// test needs.
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<Mutex<Vec<BuildRequest>>>,
    failing: HashSet<String>,
    auto_complete: bool,
}

impl FakeBackend {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        started: Arc<Mutex<Vec<BuildRequest>>>,
    ) -> Self {
        Self {
            runtime_tx,
            started,
            failing: HashSet::new(),
            auto_complete: true,
        }
    }

    pub fn failing(mut self, selector: &str) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    pub fn manual_completion(mut self) -> Self {
        self.auto_complete = false;
        self
    }
}

impl BuildBackend for FakeBackend {
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let started = Arc::clone(&self.started);
        let fail = self.failing.contains(&request.name) || self.failing.contains(&request.id);
        let auto_complete = self.auto_complete;

        Box::pin(async move {
            debug!(target = %request.name, build = %request.id, fail, auto_complete, "fake build started");
            {
                let mut guard = started.lock().unwrap();
                guard.push(request.clone());
            }

            if auto_complete {
                let outcome = if fail {
                    BuildOutcome::failed(Some(1), "fake compiler error")
                } else {
                    BuildOutcome::succeeded()
                };
                // Report from a separate task so a full channel cannot
                // deadlock the runtime that is awaiting this future.
                tokio::spawn(async move {
                    let _ = tx
                        .send(RuntimeEvent::BuildFinished {
                            build: request.id,
                            outcome,
                        })
                        .await;
                });
            }
            Ok(())
        })
    }
}

/// Target names of the builds a `FakeBackend` has started, in order.
pub fn started_names(started: &Arc<Mutex<Vec<BuildRequest>>>) -> Vec<String> {
    started
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect()
}

/// Ids of the builds a `FakeBackend` has started, in order.
pub fn started_ids(started: &Arc<Mutex<Vec<BuildRequest>>>) -> Vec<String> {
    started
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.id.clone())
        .collect()
}
