// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildjsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option '{option}' (expected one of: {expected})")]
    InvalidValue {
        option: String,
        value: String,
        expected: String,
    },

    #[error("Single option cannot occur twice: {0}")]
    DuplicateOption(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuildjsError {
    /// True for errors caused by the configuration contents rather than the
    /// environment (missing files, watcher failures, ...).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BuildjsError::ConfigError(_)
                | BuildjsError::UnknownOption(_)
                | BuildjsError::InvalidValue { .. }
                | BuildjsError::DuplicateOption(_)
                | BuildjsError::Glob { .. }
                | BuildjsError::TomlError(_)
                | BuildjsError::YamlError(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildjsError>;
