// src/command/mod.rs

//! Schema-driven command-line construction.
//!
//! - [`schema`] declares which options a tool accepts and of what kind.
//! - [`argument`] holds one option's values and its `assigned` marker.
//! - [`builder`] is the [`Command`] that validates assignments against the
//!   schema and serialises them.
//! - [`closure`] is the Closure compiler's option table.

pub mod argument;
pub mod builder;
pub mod closure;
pub mod schema;

pub use argument::{Argument, ArgumentKind};
pub use builder::Command;
pub use closure::closure_schema;
pub use schema::{CommandSchema, OptionSpec};
