//! Two-phase job dispatch.
//!
//! Phase 1 submits every source with its own compilation database entry;
//! files without one (headers included) are delayed. Phase 2 revisits the
//! delayed queue once phase 1 submission is done, borrowing a neighbouring
//! command where needed and emitting a plain fallback page when nothing can
//! be borrowed. Workers run on a shared pool and deduplicate jobs through
//! [`DedupGuard`].

pub mod dedup;
pub mod dispatcher;
pub mod fallback;
pub mod jobs;

pub use dedup::DedupGuard;
pub use dispatcher::{Dispatcher, RunStats};
