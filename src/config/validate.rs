// src/config/validate.rs

use std::path::PathBuf;

use crate::config::model::{Configuration, RawConfigFile};
use crate::errors::{BuildjsError, Result};
use crate::types::ConfigValue;
use crate::watch::patterns::compile_glob;

impl Configuration {
    /// Validate the document-level parts of a raw configuration and bind it to
    /// `root`.
    ///
    /// This checks:
    /// - `compiler`, when present, names a program
    /// - every `source` / `ignore` pattern is a valid glob
    /// - `arguments` names are non-empty and values are scalars or flat lists
    ///
    /// Individual targets are *not* checked here; the resolver reports those
    /// one target at a time.
    pub fn from_raw(raw: RawConfigFile, root: impl Into<PathBuf>) -> Result<Self> {
        validate_raw_config(&raw)?;
        Ok(Configuration::new_unchecked(raw, root.into()))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_compiler(cfg)?;
    validate_patterns("source", &cfg.source)?;
    validate_patterns("ignore", &cfg.ignore)?;
    validate_arguments(cfg)?;
    Ok(())
}

fn validate_compiler(cfg: &RawConfigFile) -> Result<()> {
    if let Some(argv) = &cfg.compiler {
        match argv.first() {
            Some(program) if !program.trim().is_empty() => {}
            _ => {
                return Err(BuildjsError::ConfigError(
                    "`compiler` must name a program (got an empty list)".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn validate_patterns(key: &str, patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(BuildjsError::ConfigError(format!(
                "`{key}` contains an empty pattern"
            )));
        }
        compile_glob(pattern)?;
    }
    Ok(())
}

fn validate_arguments(cfg: &RawConfigFile) -> Result<()> {
    for (name, value) in cfg.arguments.iter() {
        if name.trim_start_matches('-').is_empty() {
            return Err(BuildjsError::ConfigError(
                "`arguments` contains an empty option name".to_string(),
            ));
        }
        if let ConfigValue::List(items) = value {
            if let Some(nested) = items
                .iter()
                .find(|v| matches!(v, ConfigValue::List(_) | ConfigValue::Map(_)))
            {
                return Err(BuildjsError::ConfigError(format!(
                    "argument '{name}' contains a nested {} ({nested}); only scalars are allowed",
                    nested.kind_name()
                )));
            }
        }
    }
    Ok(())
}
