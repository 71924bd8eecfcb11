//! Source Atlas - Generate a browsable HTML rendering of a source tree,
//! driven by a compilation database.
//!
//! This library provides the orchestration layer of the generator:
//!
//! - Loading `compile_commands.json`, or a fixed command applied to every file
//! - Registering projects and resolving file ownership by longest prefix
//! - Preparing compile commands for replay (absolutized include paths,
//!   syntax-only mode, no output arguments)
//! - Two-phase dispatch over a worker pool, with command recovery for headers
//!   and a plain fallback page when no command matches at all
//! - Append-only index streams shared by every worker
//!
//! # Example
//!
//! ```no_run
//! use source_atlas::processor::PlainPageProcessor;
//! use source_atlas::{CompilationDatabase, Dispatcher, ProjectInfo, RunContext};
//! use std::path::Path;
//!
//! let mut ctx = RunContext::new("/tmp/atlas-out", None)?;
//! ctx.registry.register(ProjectInfo::new("demo", "/src/demo"));
//! let db = CompilationDatabase::load(Path::new("/src/demo/build"))?;
//! let sources = db.all_files().to_vec();
//! let stats = Dispatcher::new(None)?.run(&sources, &db, &ctx, &PlainPageProcessor, false);
//! eprintln!("{} pages generated", stats.submitted_in_database);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod compdb;
pub mod context;
pub mod dispatch;
pub mod models;
pub mod output;
pub mod processor;
pub mod registry;
pub mod utils;

// Re-export commonly used types
pub use compdb::{CompilationDatabase, CompileEntry};
pub use context::RunContext;
pub use dispatch::{Dispatcher, RunStats};
pub use models::{Job, ProjectInfo, ProjectKind, SourceStatus};
pub use processor::{PlainPageProcessor, UnitProcessor};
pub use registry::ProjectRegistry;
