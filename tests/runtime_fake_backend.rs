// tests/runtime_fake_backend.rs

mod common;
use crate::common::{abs, init_tracing, project_fs, ROOT};

use std::error::Error;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use buildjs::config::Configuration;
use buildjs::engine::{BuildOutcome, BuildPlan, Runtime, RuntimeEvent, RuntimeOptions};
use buildjs::exec::BuildRequest;
use buildjs::fs::mock::MockFileSystem;
use buildjs::fs::FileSystem;
use buildjs_test_utils::builders::ConfigBuilder;
use buildjs_test_utils::fake_backend::{started_ids, started_names, FakeBackend};
use buildjs_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

const CONFIG_ONE: &str = "
targets:
  - entry: src/app.js
    output: dist/app.min.js
source:
  - src/**/*.js
";

const CONFIG_TWO: &str = "
targets:
  - entry: src/app.js
    output: dist/app.min.js
  - entry: src/admin.js
    output: dist/admin.min.js
source:
  - src/**/*.js
";

fn two_target_config() -> Configuration {
    ConfigBuilder::new(ROOT)
        .target("src/app.js", "dist/app.min.js")
        .target("src/admin.js", "dist/admin.min.js")
        .source("src/**/*.js")
        .build()
}

fn plan(cfg: &Configuration) -> BuildPlan {
    BuildPlan::from_configuration(cfg).expect("valid plan")
}

fn finished(build: &str) -> RuntimeEvent {
    RuntimeEvent::BuildFinished {
        build: build.to_string(),
        outcome: BuildOutcome::succeeded(),
    }
}

/// Sources only, no initial build, no real watcher.
fn on_demand() -> RuntimeOptions {
    RuntimeOptions {
        exit_when_idle: false,
        initial_build: false,
        watch: false,
    }
}

#[tokio::test]
async fn batch_builds_every_target_once() -> TestResult {
    init_tracing();
    let (tx, rx) = mpsc::channel(64);
    let started: Arc<Mutex<Vec<BuildRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started));
    let fs = Arc::new(project_fs(&["src/app.js", "src/admin.js"]));

    let runtime = Runtime::new(
        plan(&two_target_config()),
        RuntimeOptions::batch(),
        (tx, rx),
        backend,
        fs,
    );
    let summary = with_timeout(runtime.run()).await?;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(started_names(&started), vec!["app.min", "admin.min"]);

    assert_eq!(
        started_ids(&started),
        vec!["dist/app.min.js", "dist/admin.min.js"]
    );

    let requests = started.lock().unwrap();
    assert!(requests[0].argv.contains(&"--js_output_file".to_string()));
    Ok(())
}

fn same_stem_config() -> Configuration {
    ConfigBuilder::new(ROOT)
        .target("src/app.js", "dist/app.js")
        .target("src/legacy.js", "legacy/app.js")
        .source("src/**/*.js")
        .build()
}

#[tokio::test]
async fn targets_sharing_an_output_stem_both_build() -> TestResult {
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started));

    let runtime = Runtime::new(
        plan(&same_stem_config()),
        RuntimeOptions::batch(),
        (tx, rx),
        backend,
        Arc::new(project_fs(&["src/app.js", "src/legacy.js"])),
    );
    let summary = with_timeout(runtime.run()).await?;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(started_ids(&started), vec!["dist/app.js", "legacy/app.js"]);
    assert_eq!(started_names(&started), vec!["app", "app"]);
    Ok(())
}

#[tokio::test]
async fn manual_trigger_by_shared_name_starts_every_match() -> TestResult {
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).manual_completion();

    tx.send(RuntimeEvent::ManualTrigger("app".to_string())).await?;
    tx.send(finished("dist/app.js")).await?;
    tx.send(finished("legacy/app.js")).await?;
    // An id selects exactly one build.
    tx.send(RuntimeEvent::ManualTrigger("legacy/app.js".to_string())).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    tx.send(finished("legacy/app.js")).await?;

    let runtime = Runtime::new(
        plan(&same_stem_config()),
        RuntimeOptions::manual(),
        (tx, rx),
        backend,
        Arc::new(MockFileSystem::new()),
    );
    let summary = with_timeout(runtime.run()).await?;

    assert_eq!(
        started_ids(&started),
        vec!["dist/app.js", "legacy/app.js", "legacy/app.js"]
    );
    assert_eq!(summary.succeeded, 3);
    Ok(())
}

#[tokio::test]
async fn batch_reports_failures() -> TestResult {
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).failing("admin.min");

    let runtime = Runtime::new(
        plan(&two_target_config()),
        RuntimeOptions::batch(),
        (tx, rx),
        backend,
        Arc::new(MockFileSystem::new()),
    );
    let summary = with_timeout(runtime.run()).await?;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    Ok(())
}

#[tokio::test]
async fn batch_with_no_targets_returns_immediately() -> TestResult {
    let cfg = ConfigBuilder::new(ROOT).source("src/*.js").build();
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started));

    let runtime = Runtime::new(
        plan(&cfg),
        RuntimeOptions::batch(),
        (tx, rx),
        backend,
        Arc::new(MockFileSystem::new()),
    );
    let summary = with_timeout(runtime.run()).await?;
    assert_eq!(summary.total(), 0);
    assert!(started.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn manual_triggers_build_named_targets() -> TestResult {
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started));

    tx.send(RuntimeEvent::ManualTrigger("nope".to_string())).await?;
    tx.send(RuntimeEvent::ManualTrigger("admin.min\n".to_string())).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let runtime = Runtime::new(
        plan(&two_target_config()),
        RuntimeOptions::manual(),
        (tx, rx),
        backend,
        Arc::new(MockFileSystem::new()),
    );
    let summary = with_timeout(runtime.run()).await?;

    assert_eq!(started_names(&started), vec!["admin.min"]);
    assert_eq!(summary.total(), 1);
    Ok(())
}

#[tokio::test]
async fn requests_during_a_build_yield_exactly_one_follow_up() -> TestResult {
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).manual_completion();

    for _ in 0..3 {
        tx.send(RuntimeEvent::ManualTrigger("app.min".to_string())).await?;
    }
    tx.send(finished("dist/app.min.js")).await?;
    tx.send(finished("dist/app.min.js")).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let runtime = Runtime::new(
        plan(&two_target_config()),
        on_demand(),
        (tx, rx),
        backend,
        Arc::new(MockFileSystem::new()),
    );
    with_timeout(runtime.run()).await?;

    assert_eq!(started_names(&started), vec!["app.min", "app.min"]);
    Ok(())
}

#[tokio::test]
async fn file_changes_rebuild_only_affected_targets() -> TestResult {
    let fs = project_fs(&["src/app.js", "src/admin.js", "src/util.js"]);
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).manual_completion();

    // A shared helper: both targets rebuild.
    tx.send(RuntimeEvent::FileChanged(abs("src/util.js"))).await?;
    tx.send(finished("dist/app.min.js")).await?;
    tx.send(finished("dist/admin.min.js")).await?;
    // Same mtime again: debounced.
    tx.send(RuntimeEvent::FileChanged(abs("src/util.js"))).await?;
    // app's entry is ignored by admin.
    tx.send(RuntimeEvent::FileChanged(abs("src/app.js"))).await?;
    tx.send(finished("dist/app.min.js")).await?;
    // Outside every source pattern.
    tx.send(RuntimeEvent::FileChanged(abs("README.md"))).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let runtime = Runtime::new(
        plan(&two_target_config()),
        on_demand(),
        (tx, rx),
        backend,
        Arc::new(fs),
    );
    with_timeout(runtime.run()).await?;

    assert_eq!(
        started_names(&started),
        vec!["app.min", "admin.min", "app.min"]
    );
    Ok(())
}

#[tokio::test]
async fn config_reload_swaps_the_session() -> TestResult {
    init_tracing();
    let fs = Arc::new(project_fs(&["src/app.js", "src/admin.js"]));
    let config_path = abs("closure.cfg");
    fs.add_file(&config_path, CONFIG_ONE);

    let cfg = buildjs::config::load_and_validate(fs.as_ref(), &config_path)?;
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).manual_completion();

    let runtime = Runtime::new(
        plan(&cfg),
        RuntimeOptions {
            initial_build: true,
            ..on_demand()
        },
        (tx.clone(), rx),
        backend,
        fs.clone(),
    )
    .with_config_path(&config_path);

    // Edit after the runtime recorded the original mtime.
    fs.add_file(&config_path, CONFIG_TWO);

    tx.send(RuntimeEvent::FileChanged(config_path.clone())).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    tx.send(finished("dist/app.min.js")).await?;
    tx.send(finished("dist/admin.min.js")).await?;

    with_timeout(runtime.run()).await?;

    // Initial build of app, then the reload builds both; app was still
    // building so its rebuild is queued and dropped at shutdown.
    assert_eq!(started_names(&started), vec!["app.min", "admin.min"]);
    Ok(())
}

#[tokio::test]
async fn broken_reload_keeps_the_previous_session() -> TestResult {
    let fs = Arc::new(project_fs(&["src/app.js"]));
    let config_path = abs("closure.cfg");
    fs.add_file(&config_path, CONFIG_ONE);

    let cfg = buildjs::config::load_and_validate(fs.as_ref(), &config_path)?;
    let (tx, rx) = mpsc::channel(64);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeBackend::new(tx.clone(), Arc::clone(&started)).manual_completion();

    let runtime = Runtime::new(plan(&cfg), on_demand(), (tx.clone(), rx), backend, fs.clone())
        .with_config_path(&config_path);

    fs.add_file(&config_path, "targets: [");
    assert!(fs.exists(&config_path));

    tx.send(RuntimeEvent::FileChanged(config_path.clone())).await?;
    tx.send(RuntimeEvent::ManualTrigger("app.min".to_string())).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    tx.send(finished("dist/app.min.js")).await?;

    with_timeout(runtime.run()).await?;

    assert_eq!(started_names(&started), vec!["app.min"]);
    Ok(())
}
