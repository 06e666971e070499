// src/config/model.rs

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::types::ConfigValue;

/// Top-level configuration as read from disk.
///
/// ```yaml
/// targets:
///   - entry: src/app.js
///     output: dist/app.min.js
///   - entry: src/admin.js
///     output: dist/admin.min.js
///     override: [src/app.js]
/// source:
///   - src/**/*.js
/// ignore:
///   - src/**/*.test.js
/// arguments:
///   compilation_level: ADVANCED_OPTIMIZATIONS
///   externs: [externs/jquery.js]
/// ```
///
/// Every key is optional; an empty key (`targets:` with no value) is the same
/// as an empty collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub targets: Vec<RawTargetSpec>,

    /// Glob patterns every target compiles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Vec<String>,

    /// Glob patterns excluded from every target.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore: Vec<String>,

    /// Compiler options, applied in file order to every target.
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: IndexMap<String, ConfigValue>,

    /// argv prefix used to launch the compiler. Defaults to
    /// `java -jar <config dir>/closure.jar`.
    #[serde(default)]
    pub compiler: Option<Vec<String>>,
}

/// One entry of `targets`, still loosely typed.
///
/// Type checking happens in the resolver so one bad target does not hide the
/// others. Any YAML/TOML value is accepted here: a mapping fills the known
/// keys (others are ignored), anything else lands in `malformed`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ConfigValue")]
pub struct RawTargetSpec {
    pub entry: Option<ConfigValue>,
    pub output: Option<ConfigValue>,
    pub override_: Option<ConfigValue>,
    /// The whole entry, when it is not a mapping.
    pub malformed: Option<ConfigValue>,
}

impl From<ConfigValue> for RawTargetSpec {
    fn from(value: ConfigValue) -> Self {
        let ConfigValue::Map(mut fields) = value else {
            return Self {
                malformed: Some(value),
                ..Self::default()
            };
        };
        // `key: ~` is the same as leaving the key out.
        let mut take = |key: &str| match fields.shift_remove(key) {
            Some(ConfigValue::Null) | None => None,
            Some(value) => Some(value),
        };
        Self {
            entry: take("entry"),
            output: take("output"),
            override_: take("override"),
            malformed: None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// How to launch the external compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSpec {
    pub program: String,
    pub leading_args: Vec<String>,
}

impl CompilerSpec {
    /// `java -jar <root>/closure.jar`.
    pub fn closure_default(root: &Path) -> Self {
        Self {
            program: "java".to_string(),
            leading_args: vec![
                "-jar".to_string(),
                root.join(DEFAULT_COMPILER_JAR).to_string_lossy().into_owned(),
            ],
        }
    }

    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            leading_args: rest.to_vec(),
        })
    }
}

/// File name of the compiler jar looked up next to the configuration.
pub const DEFAULT_COMPILER_JAR: &str = "closure.jar";

/// Validated configuration.
///
/// Built with [`Configuration::from_raw`]; immutable afterwards. Reloading
/// the file produces a new value rather than mutating this one.
#[derive(Debug, Clone)]
pub struct Configuration {
    root: PathBuf,
    targets: Vec<RawTargetSpec>,
    source: Vec<String>,
    ignore: Vec<String>,
    arguments: IndexMap<String, ConfigValue>,
    compiler: CompilerSpec,
}

impl Configuration {
    pub(crate) fn new_unchecked(raw: RawConfigFile, root: PathBuf) -> Self {
        let compiler = raw
            .compiler
            .as_deref()
            .and_then(CompilerSpec::from_argv)
            .unwrap_or_else(|| CompilerSpec::closure_default(&root));
        Self {
            root,
            targets: raw.targets,
            source: raw.source,
            ignore: raw.ignore,
            arguments: raw.arguments,
            compiler,
        }
    }

    /// Directory every relative path in the configuration is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn targets(&self) -> &[RawTargetSpec] {
        &self.targets
    }

    pub fn source(&self) -> &[String] {
        &self.source
    }

    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    pub fn arguments(&self) -> &IndexMap<String, ConfigValue> {
        &self.arguments
    }

    pub fn compiler(&self) -> &CompilerSpec {
        &self.compiler
    }
}
