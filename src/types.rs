use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// A loosely typed configuration value.
///
/// Target fields and `arguments` values are kept in this form after parsing
/// so that type errors can be reported per target (or per option) instead of
/// failing the whole document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ConfigValue>),
    Map(IndexMap<String, ConfigValue>),
    Null,
}

impl ConfigValue {
    /// The string content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render a scalar as a command-line token. Lists, mappings and null have
    /// no scalar form.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Text(s) => Some(s.clone()),
            ConfigValue::List(_) | ConfigValue::Map(_) | ConfigValue::Null => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Text(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "mapping",
            ConfigValue::Null => "null",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ConfigValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ConfigValue::Null => write!(f, "null"),
            other => match other.scalar_string() {
                Some(s) => write!(f, "{s}"),
                None => Ok(()),
            },
        }
    }
}

/// Whether a target excludes the entry points of the other targets.
///
/// - `None`: every other target's entry is ignored (default).
/// - `All`: no other entry is ignored.
/// - `Subset`: every other entry is ignored except the listed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Override {
    #[default]
    None,
    All,
    Subset(Vec<String>),
}
