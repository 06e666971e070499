// src/watch/patterns.rs

//! Glob matching for build targets.
//!
//! Two entry points with deliberately different costs:
//! - [`matches`] / [`includes_file`] are pure string matching against a
//!   precompiled [`PatternSet`]; they run on every filesystem event.
//! - [`expand`] walks the filesystem; dry runs use it to report what each
//!   build would compile.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};

use crate::errors::{BuildjsError, Result};
use crate::fs::FileSystem;
use crate::resolve::ResolvedBuild;
use crate::watch::path_utils::{literal_base, to_slash};

/// A compiled list of glob patterns, optionally followed by literal paths.
///
/// `*` matches within one path segment, `**` matches zero or more segments.
/// Literal paths match only themselves, even when they contain `[`, `*` or
/// other glob metacharacters.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    /// Index in `patterns` where the literal paths start.
    literals_from: usize,
    set: GlobSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternSet").field(&self.patterns).finish()
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns && self.literals_from == other.literals_from
    }
}

impl PatternSet {
    /// Compile `patterns`, keeping their original spelling for display and
    /// for passing through to the compiler.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_literals(patterns, Vec::<String>::new())
    }

    /// Compile `globs` as patterns and `literals` as exact paths.
    pub fn with_literals<G, L, S, T>(globs: G, literals: L) -> Result<Self>
    where
        G: IntoIterator<Item = S>,
        L: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut patterns: Vec<String> = globs.into_iter().map(Into::into).collect();
        let literals_from = patterns.len();
        patterns.extend(literals.into_iter().map(Into::into));

        let mut builder = GlobSetBuilder::new();
        for (index, pattern) in patterns.iter().enumerate() {
            let glob = if index < literals_from {
                compile_glob(pattern)?
            } else {
                compile_literal(pattern)?
            };
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| BuildjsError::Glob {
                pattern: patterns.join(", "),
                source,
            })?;
        Ok(Self {
            patterns,
            literals_from,
            set,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            literals_from: 0,
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pure pattern test; never touches the filesystem.
    pub fn is_match(&self, path: &Path) -> bool {
        self.set.is_match(to_slash(path))
    }
}

/// Compile a single pattern with the matcher's semantics.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(&normalize_glob(pattern))
        .literal_separator(true)
        .build()
        .map_err(|source| BuildjsError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

/// Compile `path` so that it matches only itself.
pub fn compile_literal(path: &str) -> Result<Glob> {
    GlobBuilder::new(&globset::escape(path))
        .literal_separator(true)
        .build()
        .map_err(|source| BuildjsError::Glob {
            pattern: path.to_string(),
            source,
        })
}

/// Rewrite `**` that shares a segment with other characters so it keeps its
/// recursive meaning: `src/**.js` becomes `src/**/*.js`, `a**b` becomes
/// `{a*b,a*/**/*b}`. Whole-segment `**` is left alone.
pub fn normalize_glob(pattern: &str) -> String {
    pattern
        .split('/')
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_segment(segment: &str) -> String {
    if segment == "**" || !segment.contains("**") {
        return segment.to_string();
    }
    let Some((head, rest)) = segment.split_once("**") else {
        return segment.to_string();
    };
    let tail = rest.trim_start_matches('*').replace("**", "*");

    match (head.is_empty(), tail.is_empty()) {
        (true, true) => "**".to_string(),
        (true, false) => format!("**/*{tail}"),
        (false, true) => format!("{{{head}*,{head}*/**}}"),
        (false, false) => format!("{{{head}*{tail},{head}*/**/*{tail}}}"),
    }
}

/// Test `path` against `patterns` without touching the filesystem.
pub fn matches(path: &Path, patterns: &PatternSet) -> bool {
    patterns.is_match(path)
}

/// True iff `path` is one of `build`'s sources and not ignored.
pub fn includes_file(path: &Path, build: &ResolvedBuild) -> bool {
    matches(path, build.source_patterns()) && !matches(path, build.ignore_patterns())
}

/// Expand `patterns` against the filesystem.
///
/// Each pattern is walked from its literal base directory; hidden entries
/// (names starting with `.`) below that base are skipped.
pub fn expand(fs: &dyn FileSystem, patterns: &PatternSet) -> Result<BTreeSet<PathBuf>> {
    let mut bases: Vec<PathBuf> = patterns.patterns().iter().map(|p| literal_base(p)).collect();
    bases.sort();
    bases.dedup();

    let mut files = BTreeSet::new();
    for base in bases {
        if !fs.is_dir(&base) {
            debug!(?base, "glob base directory does not exist; nothing to expand");
            continue;
        }
        walk_matching(fs, &base, patterns, &mut files)?;
    }
    Ok(files)
}

/// Every file a build compiles right now: `expand(source)` minus ignores.
pub fn expand_build(fs: &dyn FileSystem, build: &ResolvedBuild) -> Result<BTreeSet<PathBuf>> {
    let mut files = expand(fs, build.source_patterns())?;
    files.retain(|path| !matches(path, build.ignore_patterns()));
    Ok(files)
}

fn walk_matching(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &PatternSet,
    files: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let walked = fs
        .walk_files(root)
        .with_context(|| format!("expanding globs under {:?}", root))?;
    for path in walked {
        if patterns.is_match(&path) {
            trace!(?path, "glob match");
            files.insert(path);
        }
    }
    Ok(())
}
