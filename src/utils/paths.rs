use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Extensions treated as header files; headers are never submitted in
/// phase 1 even when the database has an entry for them.
const HEADER_EXTENSIONS: [&str; 4] = ["h", "H", "hh", "hpp"];

/// Lexically normalizes a path: collapses `.` components and resolves `..`
/// against the preceding component, without touching the filesystem.
///
/// Filesystem-free normalization matters here because project roots and
/// output pages are canonicalized before they exist on disk. Symlinks are
/// deliberately not resolved.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use source_atlas::utils::normalize_path;
///
/// let path = Path::new("/src/./app/../lib/main.cc");
/// assert_eq!(normalize_path(path), PathBuf::from("/src/lib/main.cc"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // A leading run of ".." in a relative path must survive;
                // above the root ".." is a no-op.
                if normalized.as_os_str().is_empty() || normalized.ends_with("..") {
                    normalized.push("..");
                } else {
                    normalized.pop();
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Converts a path into the canonical string form used as a registry and
/// database key: absolute (joined against the current directory when
/// relative), lexically normalized.
///
/// # Errors
///
/// Returns an error only when the path is relative and the current working
/// directory cannot be determined.
///
/// # Examples
///
/// ```
/// use source_atlas::utils::canonical_source_path;
///
/// let canonical = canonical_source_path("/src/app/../lib/x.cc")?;
/// assert_eq!(canonical, "/src/lib/x.cc");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn canonical_source_path(path: &str) -> Result<String> {
    let raw = Path::new(path);
    let absolute = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        env::current_dir()
            .context("Failed to determine the current working directory")?
            .join(raw)
    };
    Ok(normalize_path(&absolute).to_string_lossy().into_owned())
}

/// Returns true when the path carries a recognized header extension.
pub fn is_header_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_dot_components() {
        assert_eq!(normalize_path(Path::new("/a/./b/./c")), PathBuf::from("/a/b/c"));
    }

    #[test]
    fn test_normalize_resolves_parent_components() {
        assert_eq!(normalize_path(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/a/b/c/../../d")), PathBuf::from("/a/d"));
    }

    #[test]
    fn test_normalize_parent_above_root_is_noop() {
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_keeps_leading_parents_of_relative_path() {
        assert_eq!(normalize_path(Path::new("../../x")), PathBuf::from("../../x"));
    }

    #[test]
    fn test_normalize_drops_trailing_slash() {
        assert_eq!(normalize_path(Path::new("/src/app/")), PathBuf::from("/src/app"));
    }

    #[test]
    fn test_canonical_source_path_absolute_input() {
        let canonical = canonical_source_path("/src/./app/../lib/x.cc").unwrap();
        assert_eq!(canonical, "/src/lib/x.cc");
    }

    #[test]
    fn test_canonical_source_path_relative_input_is_anchored() {
        let canonical = canonical_source_path("some/file.cc").unwrap();
        assert!(canonical.starts_with('/'), "expected absolute path, got {}", canonical);
        assert!(canonical.ends_with("/some/file.cc"));
    }

    #[test]
    fn test_header_extensions() {
        assert!(is_header_path("/src/a.h"));
        assert!(is_header_path("/src/a.H"));
        assert!(is_header_path("/src/a.hh"));
        assert!(is_header_path("/src/a.hpp"));
        assert!(!is_header_path("/src/a.cc"));
        assert!(!is_header_path("/src/a.cpp"));
        assert!(!is_header_path("/src/noext"));
    }
}
