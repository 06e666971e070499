// src/command/schema.rs

use crate::command::argument::{split_prefix, ArgumentKind};

/// One declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Declared spelling, including the dash prefix (`--js`).
    pub declared: String,
    pub kind: ArgumentKind,
}

impl OptionSpec {
    /// Name without its dash prefix.
    pub fn name(&self) -> &str {
        split_prefix(&self.declared).1
    }
}

/// Ordered table of the options an external tool understands.
///
/// Declaration order is also the order options are serialised in.
///
/// ```
/// use buildjs::command::CommandSchema;
///
/// let schema = CommandSchema::new()
///     .repeatable("--js")
///     .value("--js_output_file")
///     .enumerated("--warning_level", ["QUIET", "DEFAULT", "VERBOSE"])
///     .flag("--debug");
/// assert_eq!(schema.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSchema {
    options: Vec<OptionSpec>,
}

impl CommandSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option. Re-declaring a name replaces its kind but keeps
    /// its original position.
    pub fn option(mut self, declared: &str, kind: ArgumentKind) -> Self {
        let name = split_prefix(declared).1;
        match self.options.iter_mut().find(|o| o.name() == name) {
            Some(existing) => existing.kind = kind,
            None => self.options.push(OptionSpec {
                declared: declared.to_string(),
                kind,
            }),
        }
        self
    }

    pub fn flag(self, declared: &str) -> Self {
        self.option(declared, ArgumentKind::Flag)
    }

    pub fn value(self, declared: &str) -> Self {
        self.option(declared, ArgumentKind::Value)
    }

    pub fn repeatable(self, declared: &str) -> Self {
        self.option(declared, ArgumentKind::Repeatable)
    }

    pub fn enumerated<I, S>(self, declared: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option(declared, ArgumentKind::enumerated(values))
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Look up an option by name, with or without its dash prefix.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        let name = split_prefix(name).1;
        self.options.iter().find(|o| o.name() == name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
