// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{Configuration, RawConfigFile};
use crate::errors::{BuildjsError, Result};
use crate::fs::FileSystem;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "closure.cfg";

/// Contents written by [`write_template`] when no configuration exists yet.
pub const CONFIG_TEMPLATE: &str = "\
# buildjs configuration
#
# targets:
#   - entry: src/app.js
#     output: dist/app.min.js
#     override: all        # or a list of other entries to include
targets:

# Glob patterns compiled into every target.
source:

# Glob patterns excluded from every target.
ignore:

# Closure compiler options, e.g.
#   compilation_level: ADVANCED_OPTIMIZATIONS
arguments:
";

/// Document format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else (`.cfg`, `.yml`, `.yaml`, ...)
    /// is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse configuration text without touching the filesystem.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfigFile> {
    let raw = match format {
        ConfigFormat::Toml => toml::from_str(contents)?,
        // An empty YAML document deserializes as null, not as an empty mapping.
        ConfigFormat::Yaml if contents.trim().is_empty() => RawConfigFile::default(),
        ConfigFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
            if value.is_null() {
                RawConfigFile::default()
            } else {
                serde_yaml::from_value(value)?
            }
        }
    };
    Ok(raw)
}

/// Load a configuration file from a given path and return the raw document.
///
/// This only performs deserialization; it does **not** perform validation.
/// Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;
    let format = ConfigFormat::from_path(path);
    debug!(?path, ?format, "parsing configuration");
    parse_str(&contents, format)
}

/// Load a configuration file from path and run basic validation.
///
/// Relative paths inside the file are resolved against the directory that
/// contains it.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let raw = load_from_path(fs, path)?;
    let root = config_root_dir(fs, path);
    Configuration::from_raw(raw, root)
}

/// Figure out the directory a configuration file's paths are relative to.
///
/// - If the config path has a non-empty parent (e.g. "web/closure.cfg"),
///   we use that directory.
/// - If it's just a bare filename like "closure.cfg" (parent = ""),
///   we fall back to the current working directory.
pub fn config_root_dir(fs: &dyn FileSystem, config_path: &Path) -> PathBuf {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    fs.canonicalize(&dir).unwrap_or(dir)
}

/// Write [`CONFIG_TEMPLATE`] to `path`. Fails if the file already exists.
pub fn write_template(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if fs.exists(path) {
        return Err(BuildjsError::ConfigError(format!(
            "refusing to overwrite existing configuration at {:?}",
            path
        )));
    }
    fs.write(path, CONFIG_TEMPLATE.as_bytes())?;
    info!(?path, "wrote configuration template");
    Ok(())
}

/// Helper to resolve the default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
