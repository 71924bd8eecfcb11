use std::path::PathBuf;

/// Where a job's compile command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// The compilation database had a direct entry for this file.
    InDatabase,
    /// The command was borrowed from the lexicographically nearest database
    /// entry and the filename substituted.
    Recovered,
    /// Whole-directory run: every file under one root, command provenance as
    /// available.
    ProcessFullDirectory,
}

/// One resolved unit of work: a file plus the exact command the unit
/// processor should replay for it.
///
/// Jobs are immutable once built and consumed by value exactly once. The
/// `absolute_path` doubles as the translation-unit identity used by the
/// dedup guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub absolute_path: String,
    pub working_directory: PathBuf,
    pub command_tokens: Vec<String>,
    pub source_status: SourceStatus,
}
