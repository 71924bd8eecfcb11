//! Shared output streams and the on-disk layout of a run
//!
//! All append-only artifacts (the run-level file and other indexes, the
//! per-project logs, the per-symbol reference streams) are owned by
//! [`OutputAggregator`]; nothing else in the crate opens these files. Appends
//! to one key are serialized by that key's own lock, appends to different
//! keys proceed independently.

pub mod aggregator;
pub mod layout;
pub mod page;

pub use aggregator::OutputAggregator;
pub use layout::{DEFAULT_DATA_URL, OutputLayout};
