// src/resolve/resolver.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Configuration;
use crate::errors::{BuildjsError, Result};
use crate::resolve::build::ResolvedBuild;
use crate::resolve::target::TargetSpec;
use crate::types::{ConfigValue, Override};
use crate::watch::path_utils::{absolutize, absolutize_pattern, to_slash};
use crate::watch::patterns::PatternSet;

/// Result of resolving every target of a configuration.
///
/// Valid targets resolve even when others are broken; `errors` holds one
/// entry per rejected target.
#[derive(Debug, Default)]
pub struct Resolution {
    pub builds: Vec<ResolvedBuild>,
    pub errors: Vec<BuildjsError>,
}

impl Resolution {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All builds, or the first error if any target was rejected.
    pub fn into_result(self) -> Result<Vec<ResolvedBuild>> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.builds),
        }
    }
}

/// A target's entry as seen by the other targets.
struct Peer {
    index: usize,
    name: String,
    entry: PathBuf,
}

/// Turn every configured target into a [`ResolvedBuild`].
///
/// Each target compiles the global `source` minus the global `ignore` and,
/// unless its override says otherwise, minus every other target's entry.
/// Builds come back in configuration order.
pub fn resolve_targets(cfg: &Configuration) -> Resolution {
    let root = cfg.root();
    let mut resolution = Resolution::default();

    if cfg.targets().is_empty() {
        warn!("no build targets specified");
        return resolution;
    }

    let source: Vec<String> = cfg
        .source()
        .iter()
        .map(|p| absolutize_pattern(root, p))
        .collect();
    let global_ignore: Vec<String> = cfg
        .ignore()
        .iter()
        .map(|p| absolutize_pattern(root, p))
        .collect();

    let source_patterns = match PatternSet::new(source) {
        Ok(set) => set,
        Err(err) => {
            resolution.errors.push(err);
            return resolution;
        }
    };
    if source_patterns.is_empty() {
        warn!("no source patterns configured; builds will only see their entry points");
    }

    let specs: Vec<Result<TargetSpec>> = cfg
        .targets()
        .iter()
        .enumerate()
        .map(|(index, raw)| TargetSpec::from_raw(index, raw))
        .collect();

    let peers: Vec<Peer> = specs
        .iter()
        .enumerate()
        .filter_map(|(index, spec)| {
            let spec = spec.as_ref().ok()?;
            Some(Peer {
                index,
                name: spec.name(),
                entry: absolutize(root, &spec.entry),
            })
        })
        .collect();

    let options: Vec<_> = cfg
        .arguments()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for (index, spec) in specs.into_iter().enumerate() {
        let built = spec.and_then(|spec| {
            resolve_one(
                cfg,
                index,
                &spec,
                &peers,
                &source_patterns,
                &global_ignore,
                &options,
            )
        });
        match built {
            Ok(build) => {
                debug!(
                    target = %build.name(),
                    ignores = build.ignore_patterns().len(),
                    "resolved target"
                );
                resolution.builds.push(build);
            }
            Err(err) => {
                warn!(index, error = %err, "skipping invalid target");
                resolution.errors.push(err);
            }
        }
    }

    assign_ids(root, &mut resolution.builds);
    resolution
}

/// Give every build a unique id: its output path relative to the
/// configuration directory. Outputs shared by several targets get a `#2`,
/// `#3`, ... suffix in configuration order.
fn assign_ids(root: &Path, builds: &mut [ResolvedBuild]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for build in builds {
        let base = match build.output_path.strip_prefix(root) {
            Ok(rel) => to_slash(rel),
            Err(_) => to_slash(&build.output_path),
        };
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        build.id = if *count == 1 {
            base
        } else {
            format!("{base}#{count}")
        };
    }
}

fn resolve_one(
    cfg: &Configuration,
    index: usize,
    spec: &TargetSpec,
    peers: &[Peer],
    source_patterns: &PatternSet,
    global_ignore: &[String],
    options: &[(String, ConfigValue)],
) -> Result<ResolvedBuild> {
    let root = cfg.root();
    let entry_point = absolutize(root, &spec.entry);
    let output_path = absolutize(root, &spec.output);

    let others = peers
        .iter()
        .filter(|p| p.index != index && p.entry != entry_point);

    let cross: Vec<&Peer> = match &spec.override_ {
        Override::All => Vec::new(),
        Override::None => others.collect(),
        Override::Subset(ids) => {
            let wanted: Vec<PathBuf> = ids.iter().map(|id| absolutize(root, id)).collect();
            others
                .filter(|p| {
                    let by_path = wanted.iter().any(|w| *w == p.entry);
                    let by_name = ids.iter().any(|id| *id == p.name);
                    !(by_path || by_name)
                })
                .collect()
        }
    };

    // Peer entries are file paths, not globs.
    let mut entries: Vec<String> = Vec::new();
    for peer in cross {
        let path = to_slash(&peer.entry);
        if !global_ignore.contains(&path) && !entries.contains(&path) {
            entries.push(path);
        }
    }

    Ok(ResolvedBuild {
        id: String::new(),
        name: spec.name(),
        entry_point,
        output_path,
        source_patterns: source_patterns.clone(),
        ignore_patterns: PatternSet::with_literals(global_ignore.iter().cloned(), entries)?,
        options: options.to_vec(),
    })
}

/// Keep only the builds named in `names` (all of them when `names` is empty
/// or contains `all`). A name selects every build whose output stem or id
/// equals it; a name matching nothing is an error.
pub fn select_builds(builds: &[ResolvedBuild], names: &[String]) -> Result<Vec<ResolvedBuild>> {
    if names.is_empty() || names.iter().any(|n| n == "all") {
        return Ok(builds.to_vec());
    }

    let mut selected: Vec<ResolvedBuild> = Vec::new();
    for name in names {
        let mut found = false;
        for build in builds.iter().filter(|b| b.selected_by(name)) {
            found = true;
            if !selected.iter().any(|b| b.id() == build.id()) {
                selected.push(build.clone());
            }
        }
        if !found {
            let known: Vec<&str> = builds.iter().map(ResolvedBuild::name).collect();
            return Err(BuildjsError::ConfigError(format!(
                "unknown target '{name}' (known: {})",
                known.join(", ")
            )));
        }
    }
    Ok(selected)
}
