//! Command-line interface: argument parsing, project registration and the
//! top-level run sequence.

pub mod commands;

pub use commands::{Cli, run};
