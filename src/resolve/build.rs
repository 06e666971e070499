// src/resolve/build.rs

use std::path::{Path, PathBuf};

use crate::command::closure::{ENTRY_POINT, JS, JS_OUTPUT_FILE};
use crate::command::{closure_schema, Command};
use crate::config::CompilerSpec;
use crate::errors::Result;
use crate::types::ConfigValue;
use crate::watch::path_utils::to_slash;
use crate::watch::patterns::PatternSet;

/// A target after global and cross-target rules have been applied.
///
/// Everything in here is absolute, so a build can be run or matched without
/// knowing where the configuration lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBuild {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) entry_point: PathBuf,
    pub(crate) output_path: PathBuf,
    pub(crate) source_patterns: PatternSet,
    pub(crate) ignore_patterns: PatternSet,
    pub(crate) options: Vec<(String, ConfigValue)>,
}

impl ResolvedBuild {
    /// Unique within one resolution; the runtime tracks builds by this.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Output file stem, used to select builds from the command line.
    /// Several builds may share it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an operator-supplied selector names this build.
    pub fn selected_by(&self, selector: &str) -> bool {
        self.name == selector || self.id == selector
    }

    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn source_patterns(&self) -> &PatternSet {
        &self.source_patterns
    }

    pub fn ignore_patterns(&self) -> &PatternSet {
        &self.ignore_patterns
    }

    pub fn options(&self) -> &[(String, ConfigValue)] {
        &self.options
    }

    /// The compiler invocation for this build.
    ///
    /// Entry point and output come first, then one `--js` per source pattern
    /// and one `--js !pattern` per ignore pattern, then the configured
    /// arguments in file order.
    pub fn command(&self, compiler: &CompilerSpec) -> Result<Command> {
        let schema = closure_schema();
        let mut cmd = Command::for_compiler(compiler, &schema);

        cmd.set(ENTRY_POINT, to_slash(&self.entry_point))?;
        cmd.set(JS_OUTPUT_FILE, to_slash(&self.output_path))?;
        for pattern in self.source_patterns.patterns() {
            cmd.add(JS, pattern)?;
        }
        for pattern in self.ignore_patterns.patterns() {
            cmd.add(JS, format!("!{pattern}"))?;
        }
        for (name, value) in &self.options {
            cmd.apply(name, value)?;
        }

        Ok(cmd)
    }
}
