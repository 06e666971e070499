// src/exec/runner.rs

//! Single compiler invocation.

use std::process::Stdio;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::BuildOutcome;

/// Run `argv` to completion, capturing stdout and stderr separately.
///
/// A spawn failure (missing `java`, bad path) is reported as a failed
/// outcome with the error text in `stderr`, never as a panic.
pub async fn run_build(build: &str, argv: &[String]) -> BuildOutcome {
    match run_build_inner(build, argv).await {
        Ok(outcome) => outcome,
        Err(err) => BuildOutcome::failed(None, format!("{err:#}")),
    }
}

async fn run_build_inner(build: &str, argv: &[String]) -> Result<BuildOutcome> {
    let (program, args) = argv
        .split_first()
        .with_context(|| format!("empty compiler command for build '{build}'"))?;

    info!(build = %build, program = %program, args = args.len(), "starting compiler");
    let started = Instant::now();

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("spawning compiler '{program}' for build '{build}'"))?;

    let code = output.status.code();
    debug!(
        build = %build,
        exit_code = ?code,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "compiler exited"
    );

    Ok(BuildOutcome {
        success: output.status.success(),
        code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
