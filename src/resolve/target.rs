// src/resolve/target.rs

use std::path::Path;

use crate::config::RawTargetSpec;
use crate::errors::{BuildjsError, Result};
use crate::types::{ConfigValue, Override};

/// Keyword that disables cross-target ignores for a target.
pub const OVERRIDE_ALL: &str = "all";

/// Typed form of one `targets` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub entry: String,
    pub output: String,
    pub override_: Override,
}

impl TargetSpec {
    /// Type-check a raw target. `index` is only used in error messages.
    pub fn from_raw(index: usize, raw: &RawTargetSpec) -> Result<Self> {
        if let Some(value) = &raw.malformed {
            return Err(BuildjsError::ConfigError(format!(
                "target #{index} must be a mapping with `entry` and `output`, got {} ({value})",
                value.kind_name()
            )));
        }
        let entry = required_path(index, "entry", raw.entry.as_ref())?;
        let output = required_path(index, "output", raw.output.as_ref())?;
        let override_ = parse_override(index, raw.override_.as_ref())?;
        Ok(Self {
            entry,
            output,
            override_,
        })
    }

    /// Base name of the output file without its extension.
    pub fn name(&self) -> String {
        target_name(&self.output)
    }
}

/// Operator-facing name of a target: the output's file stem.
pub fn target_name(output: &str) -> String {
    Path::new(output)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.to_string())
}

fn required_path(index: usize, key: &str, value: Option<&ConfigValue>) -> Result<String> {
    match value {
        None => Err(BuildjsError::ConfigError(format!(
            "target #{index}: missing `{key}`"
        ))),
        Some(ConfigValue::Text(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(ConfigValue::Text(_)) => Err(BuildjsError::ConfigError(format!(
            "target #{index}: `{key}` is empty"
        ))),
        Some(other) => Err(BuildjsError::ConfigError(format!(
            "target #{index}: `{key}` must be a string, got {} ({other})",
            other.kind_name()
        ))),
    }
}

fn parse_override(index: usize, value: Option<&ConfigValue>) -> Result<Override> {
    let Some(value) = value else {
        return Ok(Override::None);
    };
    match value {
        ConfigValue::Text(s) if s == OVERRIDE_ALL => Ok(Override::All),
        ConfigValue::Text(s) => Ok(Override::Subset(vec![s.clone()])),
        ConfigValue::List(items) => items
            .iter()
            .map(|item| match item {
                ConfigValue::Text(s) => Ok(s.clone()),
                other => Err(malformed_override(index, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Override::Subset),
        other => Err(malformed_override(index, other)),
    }
}

fn malformed_override(index: usize, value: &ConfigValue) -> BuildjsError {
    BuildjsError::ConfigError(format!(
        "target #{index}: malformed override {value} ({}); expected \"all\" or a list of entries",
        value.kind_name()
    ))
}
