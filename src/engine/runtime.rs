// src/engine/runtime.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::load_and_validate;
use crate::errors::Result;
use crate::exec::{BuildBackend, BuildRequest};
use crate::fs::FileSystem;
use crate::watch::path_utils::normalize;
use crate::watch::{spawn_watcher, ChangeDetector, WatcherHandle};

use super::core::CoreRuntime;
use super::session::BuildPlan;
use super::{BuildId, BuildOutcome, CoreCommand, RuntimeEvent, RuntimeOptions, TriggerReason};

/// Totals reported when the runtime exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Drives the core runtime in response to `RuntimeEvent`s, and delegates
/// compiler runs to a `BuildBackend`.
///
/// The shell owns the current session (plan, one change detector per build,
/// the watcher) and replaces it wholesale when the configuration file
/// changes and reloads cleanly.
pub struct Runtime<B: BuildBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    event_tx: mpsc::Sender<RuntimeEvent>,
    backend: B,
    fs: Arc<dyn FileSystem>,
    plan: BuildPlan,
    detectors: Vec<ChangeDetector>,
    config_path: Option<PathBuf>,
    config_state: Option<SystemTime>,
    watcher: Option<WatcherHandle>,
    awaiting_watch: bool,
    summary: RunSummary,
}

impl<B: BuildBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("config_path", &self.config_path)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<B: BuildBackend> Runtime<B> {
    /// `event_tx` must feed `event_rx`; the runtime hands clones of it to the
    /// watcher it spawns.
    pub fn new(
        plan: BuildPlan,
        options: RuntimeOptions,
        channel: (mpsc::Sender<RuntimeEvent>, mpsc::Receiver<RuntimeEvent>),
        backend: B,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let (event_tx, event_rx) = channel;
        let core = CoreRuntime::new(plan.ids().map(str::to_string), options);
        Self {
            core,
            event_rx,
            event_tx,
            backend,
            fs,
            plan,
            detectors: Vec::new(),
            config_path: None,
            config_state: None,
            watcher: None,
            awaiting_watch: false,
            summary: RunSummary::default(),
        }
    }

    /// Reload the plan from `path` whenever that file changes.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.config_state = self.fs.modified(&path).ok().flatten();
        self.config_path = Some(normalize(&path));
        self
    }

    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    /// Main event loop.
    ///
    /// - Starts the session (detectors, initial builds).
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds build-level events into the core and executes its commands.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("buildjs runtime started");

        self.start_session().await?;

        if self.core.options().exit_when_idle && self.core.is_idle() {
            info!("nothing to build; exiting");
            return Ok(self.summary);
        }

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if !self.handle_event(event).await? {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        self.watcher = None;
        info!(
            succeeded = self.summary.succeeded,
            failed = self.summary.failed,
            "runtime exiting"
        );
        Ok(self.summary)
    }

    /// Handle one event. Returns whether the loop should keep running.
    async fn handle_event(&mut self, event: RuntimeEvent) -> Result<bool> {
        match event {
            RuntimeEvent::FileChanged(path) => {
                self.on_file_changed(&path).await?;
                Ok(true)
            }
            RuntimeEvent::ManualTrigger(name) => {
                self.on_manual_trigger(name.trim()).await?;
                Ok(true)
            }
            RuntimeEvent::BuildFinished { build, outcome } => {
                self.report(&build, &outcome);
                let keep_running = self
                    .feed(RuntimeEvent::BuildFinished { build, outcome })
                    .await?;
                if self.awaiting_watch && self.core.is_idle() && !self.core.is_shutting_down() {
                    self.start_watching()?;
                }
                Ok(keep_running)
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested; waiting for running builds");
                self.watcher = None;
                self.awaiting_watch = false;
                self.feed(RuntimeEvent::ShutdownRequested).await
            }
            other @ RuntimeEvent::BuildRequested { .. } => self.feed(other).await,
        }
    }

    /// Feed an event to the core and execute the resulting commands.
    async fn feed(&mut self, event: RuntimeEvent) -> Result<bool> {
        let step = self.core.step(event);
        for command in step.commands {
            self.execute_command(command).await?;
        }
        Ok(step.keep_running)
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartBuild(id) => {
                let Some(planned) = self.plan.get(&id) else {
                    // Retired build: its follow-up was dropped by the core.
                    warn!(build = %id, "no plan for build; not starting");
                    return Ok(());
                };
                let request = BuildRequest {
                    name: planned.name().to_string(),
                    argv: planned.argv.clone(),
                    id,
                };
                self.backend.spawn_build(request).await
            }
        }
    }

    async fn request(&mut self, build: BuildId, reason: TriggerReason) -> Result<()> {
        self.feed(RuntimeEvent::BuildRequested { build, reason })
            .await
            .map(|_| ())
    }

    /// Create fresh detectors, request the initial builds and either start
    /// watching now or once those builds are done.
    ///
    /// Detector caches start empty: the first event seen for a source always
    /// rebuilds, later events with the same mtime do not.
    async fn start_session(&mut self) -> Result<()> {
        let options = *self.core.options();

        self.detectors = self
            .plan
            .builds()
            .iter()
            .map(|planned| ChangeDetector::new(planned.build.clone(), self.plan.root()))
            .collect();

        if self.plan.is_empty() {
            warn!("no build targets specified");
        }

        if options.initial_build {
            let ids: Vec<BuildId> = self.plan.ids().map(str::to_string).collect();
            for id in ids {
                self.request(id, TriggerReason::Startup).await?;
            }
        }

        self.awaiting_watch = options.watch;
        if self.awaiting_watch && self.core.is_idle() {
            self.start_watching()?;
        }
        Ok(())
    }

    fn start_watching(&mut self) -> Result<()> {
        self.awaiting_watch = false;
        let roots = self.plan.watch_roots();
        let handle = spawn_watcher(roots, self.config_path.as_deref(), self.event_tx.clone())?;
        info!(roots = ?handle.roots(), "watching for changes");
        self.watcher = Some(handle);
        Ok(())
    }

    async fn on_file_changed(&mut self, path: &Path) -> Result<()> {
        if self.is_config_file(path) {
            return self.on_config_changed().await;
        }

        let mut stale = Vec::new();
        for detector in &mut self.detectors {
            let detection = detector.observe(self.fs.as_ref(), path);
            if detection.requires_build() {
                stale.push(detector.build().id().to_string());
            }
        }

        for id in stale {
            self.request(id, TriggerReason::FileWatch).await?;
        }
        Ok(())
    }

    fn is_config_file(&self, path: &Path) -> bool {
        match &self.config_path {
            Some(config) => normalize(path) == *config,
            None => false,
        }
    }

    async fn on_config_changed(&mut self) -> Result<()> {
        let Some(config_path) = self.config_path.clone() else {
            return Ok(());
        };

        let state = self.fs.modified(&config_path).ok().flatten();
        if state == self.config_state {
            debug!("configuration mtime unchanged; ignoring event");
            return Ok(());
        }
        self.config_state = state;

        if state.is_none() {
            warn!(path = ?config_path, "configuration file removed; keeping current session");
            return Ok(());
        }

        let cfg = match load_and_validate(self.fs.as_ref(), &config_path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(error = %err, "configuration reload failed; keeping current session");
                return Ok(());
            }
        };

        let plan = match BuildPlan::from_configuration(&cfg) {
            Ok(plan) => plan,
            Err(errors) => {
                for err in &errors {
                    error!(error = %err, "configuration reload failed");
                }
                warn!(errors = errors.len(), "keeping current session");
                return Ok(());
            }
        };

        info!(targets = plan.builds().len(), "configuration reloaded");
        self.watcher = None;
        self.core.replace_builds(plan.ids().map(str::to_string));
        self.plan = plan;
        self.start_session().await
    }

    async fn on_manual_trigger(&mut self, selector: &str) -> Result<()> {
        if selector.is_empty() {
            return Ok(());
        }
        let ids: Vec<BuildId> = if selector == "all" {
            self.plan.ids().map(str::to_string).collect()
        } else {
            self.plan
                .select(selector)
                .map(|planned| planned.id().to_string())
                .collect()
        };
        if ids.is_empty() {
            warn!(target = %selector, known = ?self.plan.names(), "unknown target");
            return Ok(());
        }
        for id in ids {
            self.request(id, TriggerReason::Manual).await?;
        }
        Ok(())
    }

    fn report(&mut self, id: &str, outcome: &BuildOutcome) {
        let name = self.plan.get(id).map_or(id, |planned| planned.name());
        let stdout = outcome.stdout.trim_end();
        let stderr = outcome.stderr.trim_end();

        if outcome.success {
            self.summary.succeeded += 1;
            info!(target = %name, build = %id, "compiled");
            if !stdout.is_empty() {
                info!(target = %name, "compiler output:\n{stdout}");
            }
            if !stderr.is_empty() {
                warn!(target = %name, "compiler diagnostics:\n{stderr}");
            }
        } else {
            self.summary.failed += 1;
            error!(target = %name, build = %id, exit_code = ?outcome.code, "build failed");
            if !stdout.is_empty() {
                info!(target = %name, "compiler output:\n{stdout}");
            }
            if !stderr.is_empty() {
                error!(target = %name, "compiler diagnostics:\n{stderr}");
            }
        }
    }
}
