//! Path canonicalization helpers shared across the crate.

pub mod paths;

pub use paths::{canonical_source_path, is_header_path, normalize_path};
