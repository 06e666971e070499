// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cli::{CliArgs, Mode};
use crate::config::loader::{config_root_dir, write_template};
use crate::config::load_and_validate;
use crate::engine::{BuildPlan, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::Result;
use crate::exec::RealBuildBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::expand_build;

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config loading (writing a template when none exists)
/// - target resolution and command assembly
/// - the runtime and the real compiler backend
/// - (watch mode) the file watcher, (manual mode) the stdin reader
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<i32> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let config_path = PathBuf::from(&args.config);

    if !fs.exists(&config_path) {
        write_template(fs.as_ref(), &config_path)?;
        error!(
            path = ?config_path,
            "no configuration found; wrote a template to fill in"
        );
        return Ok(1);
    }

    let cfg = load_and_validate(fs.as_ref(), &config_path)?;
    let mode = args.mode();

    let selection = match &mode {
        Mode::Build { targets } => targets.clone(),
        Mode::Watch | Mode::Manual => Vec::new(),
    };
    let plan = match BuildPlan::from_configuration_selected(&cfg, &selection) {
        Ok(plan) => plan,
        Err(errors) => {
            for err in &errors {
                error!(error = %err, "invalid configuration");
            }
            error!(errors = errors.len(), "configuration rejected");
            return Ok(1);
        }
    };

    if args.dry_run {
        print_dry_run(fs.as_ref(), &config_path, &plan);
        return Ok(0);
    }

    let options = match mode {
        Mode::Build { .. } => RuntimeOptions::batch(),
        Mode::Watch => RuntimeOptions::watch(),
        Mode::Manual => RuntimeOptions::manual(),
    };

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let backend = RealBuildBackend::new(rt_tx.clone());

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    if matches!(mode, Mode::Manual) {
        spawn_stdin_reader(rt_tx.clone());
        info!("reading target names from stdin ('all' builds everything)");
    }

    let mut runtime = Runtime::new(plan, options, (rt_tx, rt_rx), backend, fs.clone());
    if options.watch {
        runtime = runtime.with_config_path(absolute_config_path(fs.as_ref(), &config_path));
    }

    let summary = runtime.run().await?;
    debug!(?summary, "runtime finished");

    if options.exit_when_idle && summary.failed > 0 {
        warn!(failed = summary.failed, total = summary.total(), "some builds failed");
        return Ok(1);
    }
    Ok(0)
}

/// The configuration path as notify reports it: absolute, symlinks resolved
/// in the directory part.
fn absolute_config_path(fs: &dyn FileSystem, config_path: &Path) -> PathBuf {
    let dir = config_root_dir(fs, config_path);
    match config_path.file_name() {
        Some(name) => dir.join(name),
        None => config_path.to_path_buf(),
    }
}

/// Forward stdin lines as manual triggers; end of input shuts down.
fn spawn_stdin_reader(tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(RuntimeEvent::ManualTrigger(line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "failed to read stdin");
                    break;
                }
            }
        }
        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });
}

/// Simple dry-run output: every resolved build, how many files it would
/// compile right now and its compiler command.
fn print_dry_run(fs: &dyn FileSystem, config_path: &Path, plan: &BuildPlan) {
    println!("buildjs dry-run");
    println!("  config = {}", config_path.display());
    println!("  root = {}", plan.root().display());
    println!();

    println!("targets ({}):", plan.builds().len());
    for planned in plan.builds() {
        let build = &planned.build;
        println!("  - {} [{}]", build.name(), build.id());
        println!("      entry: {}", build.entry_point().display());
        println!("      output: {}", build.output_path().display());
        if !build.ignore_patterns().is_empty() {
            println!("      ignore: {:?}", build.ignore_patterns().patterns());
        }
        match expand_build(fs, build) {
            Ok(files) => println!("      sources: {} file(s)", files.len()),
            Err(err) => println!("      sources: unavailable ({err})"),
        }
        println!("      argv: {:?}", planned.argv);
    }

    debug!("dry-run complete (no execution)");
}
