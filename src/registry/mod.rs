//! Project ownership resolution and output-page claims

pub mod projects;

pub use projects::ProjectRegistry;
