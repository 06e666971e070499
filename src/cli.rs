// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `buildjs`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buildjs",
    version,
    about = "Compile JavaScript targets with the Closure compiler, rebuilding on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the build configuration (YAML, or TOML when it ends in `.toml`).
    #[arg(long, value_name = "PATH", default_value = "closure.cfg", global = true)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDJS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Resolve targets and print the compiler invocations without running them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

impl CliArgs {
    /// The effective mode; a bare invocation builds everything once.
    pub fn mode(&self) -> Mode {
        self.mode
            .clone()
            .unwrap_or(Mode::Build { targets: Vec::new() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Build targets once and exit (all targets when no names are given).
    Build {
        /// Target names (output file stems) to build.
        #[arg(value_name = "NAME")]
        targets: Vec<String>,
    },
    /// Build every target, then rebuild on relevant file changes.
    Watch,
    /// Read target names from stdin and rebuild them on demand.
    Manual,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
