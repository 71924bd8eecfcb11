//! Compilation database loading and lookup
//!
//! Supports the JSON `compile_commands.json` format (both the `arguments`
//! array and the shell-quoted `command` string forms) and a fixed database
//! built from a pass-through command line, used when no database file is
//! available.

pub mod database;

pub use database::{CompilationDatabase, CompileEntry};
