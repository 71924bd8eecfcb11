//! Explicitly constructed per-run state
//!
//! One [`RunContext`] is built at startup and passed by reference to the
//! dispatcher and into every worker closure; nothing in the crate keeps
//! global mutable state. Dropping the context flushes every output stream.

use std::path::PathBuf;

use anyhow::Result;

use crate::dispatch::DedupGuard;
use crate::output::{OutputAggregator, OutputLayout};
use crate::registry::ProjectRegistry;

/// Everything one run shares across threads: the output layout, the project
/// registry with its page claims, the dedup guard, and the output stream
/// aggregator.
pub struct RunContext {
    pub layout: OutputLayout,
    pub registry: ProjectRegistry,
    pub dedup: DedupGuard,
    pub output: OutputAggregator,
}

impl RunContext {
    /// Creates the run directories and opens the run-level streams. Projects
    /// are registered on the contained registry afterwards, before dispatch
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns an error when the output directories cannot be created or the
    /// run-level streams cannot be opened.
    pub fn new(output_root: impl Into<PathBuf>, data_url: Option<String>) -> Result<Self> {
        let layout = OutputLayout::new(output_root, data_url);
        layout.ensure_run_dirs()?;
        let output = OutputAggregator::new(&layout)?;
        let registry = ProjectRegistry::new(layout.clone());

        Ok(Self { layout, registry, dedup: DedupGuard::new(), output })
    }
}
