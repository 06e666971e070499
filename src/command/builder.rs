// src/command/builder.rs

use std::collections::HashMap;
use std::fmt;

use crate::command::argument::{split_prefix, Argument, ArgumentKind};
use crate::command::schema::CommandSchema;
use crate::config::CompilerSpec;
use crate::errors::{BuildjsError, Result};
use crate::types::ConfigValue;

/// An invocation of an external tool under construction.
///
/// Every option of the schema exists up front (unassigned); assignments are
/// validated against the declared kind. [`Command::argv`] produces the final
/// vector: program, leading arguments, then each assigned option in schema
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: String,
    leading_args: Vec<String>,
    arguments: Vec<Argument>,
    index: HashMap<String, usize>,
}

impl Command {
    pub fn new(program: impl Into<String>, schema: &CommandSchema) -> Self {
        let arguments: Vec<Argument> = schema
            .options()
            .iter()
            .map(|spec| Argument::new(&spec.declared, spec.kind.clone()))
            .collect();
        let index = arguments
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name().to_string(), i))
            .collect();
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            arguments,
            index,
        }
    }

    /// Build a command for the given compiler launcher.
    pub fn for_compiler(spec: &CompilerSpec, schema: &CommandSchema) -> Self {
        Self::new(spec.program.clone(), schema).with_leading_args(spec.leading_args.clone())
    }

    /// Fixed arguments placed between the program and the options
    /// (`-jar closure.jar`).
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Look up an option by name, with or without its dash prefix.
    pub fn get(&self, name: &str) -> Result<&Argument> {
        let i = self.position(name)?;
        Ok(&self.arguments[i])
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Argument> {
        let i = self.position(name)?;
        Ok(&mut self.arguments[i])
    }

    fn position(&self, name: &str) -> Result<usize> {
        let bare = split_prefix(name).1;
        self.index
            .get(bare)
            .copied()
            .ok_or_else(|| BuildjsError::UnknownOption(name.to_string()))
    }

    /// Overwrite `name` with `value`.
    pub fn set(&mut self, name: &str, value: impl AsRef<str>) -> Result<()> {
        self.get_mut(name)?.set(value.as_ref())
    }

    /// Append to a repeatable option; first assignment of a single option.
    pub fn add(&mut self, name: &str, value: impl AsRef<str>) -> Result<()> {
        self.get_mut(name)?.add(value.as_ref())
    }

    /// Switch a flag on or off.
    pub fn enable(&mut self, name: &str, enabled: bool) -> Result<()> {
        let arg = self.get_mut(name)?;
        if *arg.kind() != ArgumentKind::Flag {
            return Err(BuildjsError::InvalidValue {
                option: arg.name().to_string(),
                value: enabled.to_string(),
                expected: "a value (option is not a flag)".to_string(),
            });
        }
        arg.set(if enabled { "true" } else { "false" })
    }

    /// Remove one value (or the first one). Returns whether anything changed.
    pub fn remove(&mut self, name: &str, value: Option<&str>) -> Result<bool> {
        Ok(self.get_mut(name)?.remove(value))
    }

    /// Drop every value of `name` and mark it unassigned.
    pub fn unset(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.unset();
        Ok(())
    }

    /// Assign a configuration value to `name` according to its kind.
    ///
    /// - flags take a boolean (or a `true`/`false` string)
    /// - lists add each element
    /// - scalars are added, so a second value for a single-valued option
    ///   fails with [`BuildjsError::DuplicateOption`]
    pub fn apply(&mut self, name: &str, value: &ConfigValue) -> Result<()> {
        let arg = self.get_mut(name)?;
        let kind = arg.kind().clone();
        match (&kind, value) {
            (ArgumentKind::Flag, ConfigValue::Bool(enabled)) => {
                arg.set(if *enabled { "true" } else { "false" })
            }
            (ArgumentKind::Flag, ConfigValue::Text(text)) => arg.set(text),
            (ArgumentKind::Flag, other) => Err(BuildjsError::InvalidValue {
                option: arg.name().to_string(),
                value: other.to_string(),
                expected: "true, false".to_string(),
            }),
            (_, ConfigValue::List(items)) => {
                for item in items {
                    let token = scalar_token(arg.name(), item)?;
                    arg.add(&token)?;
                }
                Ok(())
            }
            (_, scalar) => {
                let token = scalar_token(arg.name(), scalar)?;
                arg.add(&token)
            }
        }
    }

    /// Option tokens in schema order, without program or leading arguments.
    pub fn format(&self) -> Vec<String> {
        self.arguments.iter().flat_map(Argument::formatted).collect()
    }

    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.leading_args.len());
        argv.push(self.program.clone());
        argv.extend(self.leading_args.iter().cloned());
        argv.extend(self.format());
        argv
    }
}

fn scalar_token(option: &str, value: &ConfigValue) -> Result<String> {
    value.scalar_string().ok_or_else(|| BuildjsError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
        expected: "a scalar value".to_string(),
    })
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.argv().iter().map(|t| quote(t)).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Quote a token for display if it contains shell-significant characters.
fn quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}
