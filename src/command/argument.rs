// src/command/argument.rs

use std::collections::BTreeSet;

use crate::errors::{BuildjsError, Result};

/// What kind of values a declared option accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Bare switch, e.g. `--debug`.
    Flag,
    /// Exactly one value, e.g. `--js_output_file out.js`.
    Value,
    /// Any number of values, one `--name value` pair each.
    Repeatable,
    /// Exactly one value out of a fixed set.
    Enumerated(BTreeSet<String>),
}

impl ArgumentKind {
    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgumentKind::Enumerated(values.into_iter().map(Into::into).collect())
    }
}

/// One declared option and whatever has been assigned to it.
///
/// `assigned` is tracked separately from the stored values: an option that
/// was never explicitly set is left out of the command line entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    prefix: String,
    name: String,
    kind: ArgumentKind,
    values: Vec<String>,
    enabled: bool,
    assigned: bool,
}

impl Argument {
    /// `declared` may carry its dash prefix (`--js`); it is split off and
    /// reused when formatting.
    pub fn new(declared: &str, kind: ArgumentKind) -> Self {
        let (prefix, name) = split_prefix(declared);
        Self {
            prefix: if prefix.is_empty() { "--".to_string() } else { prefix.to_string() },
            name: name.to_string(),
            kind,
            values: Vec::new(),
            enabled: false,
            assigned: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix plus name, as it appears on the command line.
    pub fn flag(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    pub fn kind(&self) -> &ArgumentKind {
        &self.kind
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// For flags: whether the switch is on. Always false for valued kinds.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The single value of a non-repeatable option (first value otherwise).
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Replace whatever is stored with `value` and mark the option assigned.
    pub fn set(&mut self, value: &str) -> Result<()> {
        match &self.kind {
            ArgumentKind::Flag => {
                self.enabled = parse_flag(&self.name, value)?;
            }
            ArgumentKind::Enumerated(options) => {
                self.check_enumerated(options, value)?;
                self.values = vec![value.to_string()];
            }
            ArgumentKind::Value | ArgumentKind::Repeatable => {
                self.values = vec![value.to_string()];
            }
        }
        self.assigned = true;
        Ok(())
    }

    /// Append for repeatable options; otherwise behave like [`Argument::set`]
    /// the first time and refuse a second value.
    pub fn add(&mut self, value: &str) -> Result<()> {
        if self.kind == ArgumentKind::Repeatable {
            self.values.push(value.to_string());
            self.assigned = true;
            return Ok(());
        }
        if self.assigned {
            return Err(BuildjsError::DuplicateOption(self.flag()));
        }
        self.set(value)
    }

    /// Remove `value` (or the first value when `None`). Returns whether
    /// anything was removed. An option left without values is unassigned.
    pub fn remove(&mut self, value: Option<&str>) -> bool {
        if self.kind == ArgumentKind::Flag {
            let was_assigned = self.assigned;
            self.unset();
            return was_assigned;
        }

        let index = match value {
            Some(v) => self.values.iter().position(|x| x == v),
            None if self.values.is_empty() => None,
            None => Some(0),
        };
        let Some(index) = index else {
            return false;
        };
        self.values.remove(index);
        if self.values.is_empty() {
            self.assigned = false;
        }
        true
    }

    /// Forget every value and the assigned marker.
    pub fn unset(&mut self) {
        self.values.clear();
        self.enabled = false;
        self.assigned = false;
    }

    /// Command-line tokens for this option; empty when unassigned.
    pub fn formatted(&self) -> Vec<String> {
        if !self.assigned {
            return Vec::new();
        }
        match self.kind {
            ArgumentKind::Flag => {
                if self.enabled {
                    vec![self.flag()]
                } else {
                    Vec::new()
                }
            }
            ArgumentKind::Repeatable => self
                .values
                .iter()
                .flat_map(|v| [self.flag(), v.clone()])
                .collect(),
            ArgumentKind::Value | ArgumentKind::Enumerated(_) => match self.value() {
                Some(v) if !v.is_empty() => vec![self.flag(), v.to_string()],
                _ => Vec::new(),
            },
        }
    }

    fn check_enumerated(&self, options: &BTreeSet<String>, value: &str) -> Result<()> {
        if options.contains(value) {
            return Ok(());
        }
        Err(BuildjsError::InvalidValue {
            option: self.name.clone(),
            value: value.to_string(),
            expected: options.iter().cloned().collect::<Vec<_>>().join(", "),
        })
    }
}

/// Split `--name` into (`--`, `name`).
pub fn split_prefix(declared: &str) -> (&str, &str) {
    let name = declared.trim_start_matches('-');
    let prefix = &declared[..declared.len() - name.len()];
    (prefix, name)
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(BuildjsError::InvalidValue {
            option: name.to_string(),
            value: other.to_string(),
            expected: "true, false".to_string(),
        }),
    }
}
