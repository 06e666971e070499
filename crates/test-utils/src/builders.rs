#![allow(dead_code)]

use std::path::PathBuf;

use buildjs::config::{Configuration, RawConfigFile, RawTargetSpec};
use buildjs::types::ConfigValue;

/// Builder for `Configuration` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
    root: PathBuf,
}

impl ConfigBuilder {
    /// `root` is the directory the configuration pretends to live in.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: RawConfigFile::default(),
            root: root.into(),
        }
    }

    pub fn with_target(mut self, target: RawTargetSpec) -> Self {
        self.config.targets.push(target);
        self
    }

    /// Shorthand for a target without override.
    pub fn target(self, entry: &str, output: &str) -> Self {
        self.with_target(TargetBuilder::new(entry, output).build())
    }

    pub fn source(mut self, pattern: &str) -> Self {
        self.config.source.push(pattern.to_string());
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.config.ignore.push(pattern.to_string());
        self
    }

    pub fn argument(mut self, name: &str, value: impl Into<ConfigValue>) -> Self {
        self.config.arguments.insert(name.to_string(), value.into());
        self
    }

    pub fn compiler(mut self, argv: &[&str]) -> Self {
        self.config.compiler = Some(argv.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> Configuration {
        Configuration::from_raw(self.config, self.root)
            .expect("Failed to build valid config from builder")
    }
}

/// Builder for one raw target.
pub struct TargetBuilder {
    target: RawTargetSpec,
}

impl TargetBuilder {
    pub fn new(entry: &str, output: &str) -> Self {
        Self {
            target: RawTargetSpec {
                entry: Some(ConfigValue::from(entry)),
                output: Some(ConfigValue::from(output)),
                ..RawTargetSpec::default()
            },
        }
    }

    /// A target missing both `entry` and `output`.
    pub fn empty() -> Self {
        Self {
            target: RawTargetSpec::default(),
        }
    }

    pub fn entry(mut self, value: impl Into<ConfigValue>) -> Self {
        self.target.entry = Some(value.into());
        self
    }

    pub fn output(mut self, value: impl Into<ConfigValue>) -> Self {
        self.target.output = Some(value.into());
        self
    }

    pub fn override_all(mut self) -> Self {
        self.target.override_ = Some(ConfigValue::from("all"));
        self
    }

    pub fn override_subset(mut self, entries: &[&str]) -> Self {
        self.target.override_ = Some(ConfigValue::List(
            entries.iter().map(|e| ConfigValue::from(*e)).collect(),
        ));
        self
    }

    pub fn override_value(mut self, value: ConfigValue) -> Self {
        self.target.override_ = Some(value);
        self
    }

    pub fn build(self) -> RawTargetSpec {
        self.target
    }
}
