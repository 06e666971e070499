// tests/core_runtime.rs

use buildjs::engine::{
    BuildOutcome, BuildStatus, CoreCommand, CoreRuntime, RuntimeEvent, RuntimeOptions,
    TriggerReason,
};

fn request(build: &str) -> RuntimeEvent {
    RuntimeEvent::BuildRequested {
        build: build.to_string(),
        reason: TriggerReason::FileWatch,
    }
}

fn finished(build: &str) -> RuntimeEvent {
    RuntimeEvent::BuildFinished {
        build: build.to_string(),
        outcome: BuildOutcome::succeeded(),
    }
}

fn start(build: &str) -> Vec<CoreCommand> {
    vec![CoreCommand::StartBuild(build.to_string())]
}

#[test]
fn requests_while_building_coalesce_into_one_follow_up() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());

    assert_eq!(core.step(request("app")).commands, start("app"));
    for _ in 0..5 {
        assert!(core.step(request("app")).commands.is_empty());
    }
    assert!(core.state("app").unwrap().pending);

    let step = core.step(finished("app"));
    assert_eq!(step.commands, start("app"));
    assert!(step.keep_running);
    assert!(!core.state("app").unwrap().pending);

    assert!(core.step(finished("app")).commands.is_empty());
    assert!(core.is_idle());
}

#[test]
fn distinct_targets_build_in_parallel() {
    let mut core = CoreRuntime::new(["app", "admin"], RuntimeOptions::watch());

    assert_eq!(core.step(request("app")).commands, start("app"));
    assert_eq!(core.step(request("admin")).commands, start("admin"));
    assert_eq!(core.state("app").unwrap().status, BuildStatus::Building);
    assert_eq!(core.state("admin").unwrap().status, BuildStatus::Building);
}

#[test]
fn unknown_targets_are_ignored() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());
    let step = core.step(request("nope"));
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert!(core.state("nope").is_none());
}

#[test]
fn failed_builds_are_not_retried() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());
    core.step(request("app"));

    let step = core.step(RuntimeEvent::BuildFinished {
        build: "app".to_string(),
        outcome: BuildOutcome::failed(Some(1), "boom"),
    });
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert!(core.is_idle());
}

#[test]
fn batch_mode_exits_when_every_target_is_idle() {
    let mut core = CoreRuntime::new(["app", "admin"], RuntimeOptions::batch());
    core.step(request("app"));
    core.step(request("admin"));

    assert!(core.step(finished("app")).keep_running);
    assert!(!core.step(finished("admin")).keep_running);
}

#[test]
fn shutdown_waits_for_running_builds_and_drops_follow_ups() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());
    core.step(request("app"));
    core.step(request("app"));

    let step = core.step(RuntimeEvent::ShutdownRequested);
    assert!(step.keep_running);
    assert!(core.is_shutting_down());

    assert!(core.step(request("app")).commands.is_empty());

    let step = core.step(finished("app"));
    assert!(step.commands.is_empty());
    assert!(!step.keep_running);
}

#[test]
fn shutdown_when_idle_stops_immediately() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());
    assert!(!core.step(RuntimeEvent::ShutdownRequested).keep_running);
}

#[test]
fn shell_level_events_are_no_ops_in_the_core() {
    let mut core = CoreRuntime::new(["app"], RuntimeOptions::watch());
    let step = core.step(RuntimeEvent::FileChanged("/project/src/app.js".into()));
    assert!(step.commands.is_empty());
    let step = core.step(RuntimeEvent::ManualTrigger("app".to_string()));
    assert!(step.commands.is_empty());
    assert!(core.is_idle());
}

#[test]
fn replacing_builds_keeps_state_and_retires_removed_builds() {
    let mut core = CoreRuntime::new(["app", "old"], RuntimeOptions::watch());
    core.step(request("app"));
    core.step(request("old"));
    core.step(request("old"));

    core.replace_builds(["app", "new"]);

    let names: Vec<&str> = core.build_ids().collect();
    assert_eq!(names, vec!["app", "new"]);
    assert!(core.state("app").unwrap().is_building());
    assert!(core.state("old").unwrap().retired);

    // The retired target's completion is accepted, then forgotten.
    assert!(core.step(request("old")).commands.is_empty());
    assert!(core.step(finished("old")).commands.is_empty());
    assert!(core.state("old").is_none());

    assert_eq!(core.step(request("new")).commands, start("new"));
}
