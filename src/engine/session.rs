// src/engine/session.rs

//! Everything derived from one loaded configuration.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Configuration;
use crate::errors::BuildjsError;
use crate::resolve::{resolve_targets, select_builds, ResolvedBuild};
use crate::watch::path_utils::watch_root;

/// A resolved build together with its compiler argv.
#[derive(Debug, Clone)]
pub struct PlannedBuild {
    pub build: ResolvedBuild,
    pub argv: Vec<String>,
}

impl PlannedBuild {
    pub fn id(&self) -> &str {
        self.build.id()
    }

    pub fn name(&self) -> &str {
        self.build.name()
    }
}

/// The builds of one configuration, ready to run.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    root: PathBuf,
    builds: Vec<PlannedBuild>,
}

impl BuildPlan {
    /// Resolve every target and assemble its command.
    ///
    /// Every problem is collected before returning, so the operator sees
    /// all broken targets and options at once.
    pub fn from_configuration(cfg: &Configuration) -> Result<Self, Vec<BuildjsError>> {
        Self::from_configuration_selected(cfg, &[])
    }

    /// Like [`BuildPlan::from_configuration`], restricted to the named
    /// targets (all of them when `names` is empty).
    pub fn from_configuration_selected(
        cfg: &Configuration,
        names: &[String],
    ) -> Result<Self, Vec<BuildjsError>> {
        let resolution = resolve_targets(cfg);
        let mut errors = resolution.errors;

        let selected = match select_builds(&resolution.builds, names) {
            Ok(builds) => builds,
            Err(err) => {
                errors.push(err);
                Vec::new()
            }
        };

        let mut builds = Vec::with_capacity(selected.len());
        for build in selected {
            match build.command(cfg.compiler()) {
                Ok(cmd) => builds.push(PlannedBuild {
                    argv: cmd.argv(),
                    build,
                }),
                Err(err) => {
                    warn!(target = %build.name(), error = %err, "invalid compiler arguments");
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        info!(targets = builds.len(), root = ?cfg.root(), "build plan ready");
        Ok(Self {
            root: cfg.root().to_path_buf(),
            builds,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn builds(&self) -> &[PlannedBuild] {
        &self.builds
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// The build with this id.
    pub fn get(&self, id: &str) -> Option<&PlannedBuild> {
        self.builds.iter().find(|b| b.id() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.builds.iter().map(PlannedBuild::id)
    }

    /// Every build an operator selector names: all builds sharing the
    /// target name, or the one build with that id.
    pub fn select(&self, selector: &str) -> impl Iterator<Item = &PlannedBuild> {
        self.builds
            .iter()
            .filter(move |b| b.build.selected_by(selector))
    }

    /// Distinct target names, in configuration order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for planned in &self.builds {
            if !names.contains(&planned.name()) {
                names.push(planned.name());
            }
        }
        names
    }

    /// Directories to watch recursively: one per build, nested roots folded
    /// into their ancestors.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self
            .builds
            .iter()
            .filter_map(|b| watch_root(b.build.source_patterns().patterns()))
            .filter(|r| !r.as_os_str().is_empty())
            .collect();
        roots.sort();
        roots.dedup();

        let mut distinct: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !distinct.iter().any(|d| root.starts_with(d)) {
                distinct.push(root);
            }
        }
        distinct
    }
}
