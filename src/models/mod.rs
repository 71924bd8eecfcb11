//! Data models shared across the orchestration layer:
//!
//! - [`ProjectInfo`] - A registered project and the source root it owns
//! - [`ProjectKind`] - Normal, Internal, or External classification
//! - [`Job`] - One resolved unit of work for the unit processor
//! - [`SourceStatus`] - Whether a job's command came from the database, was
//!   recovered, or belongs to a whole-directory run

pub mod job;
pub mod project;

pub use job::{Job, SourceStatus};
pub use project::{ProjectInfo, ProjectKind};
