use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default location of the static assets referenced by generated pages,
/// relative to the output directory.
pub const DEFAULT_DATA_URL: &str = "../data";

const REFS_DIR: &str = "refs";
/// Macro reference keys carry a `_M/` prefix, so this directory must exist
/// before any stream under it is opened.
const MACRO_REFS_DIR: &str = "refs/_M";
const FN_SEARCH_DIR: &str = "fnSearch";

/// Computes every output location for one run: generated pages, run-level
/// index logs, and the keyed reference streams.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    output_root: PathBuf,
    data_url: String,
}

impl OutputLayout {
    pub fn new(output_root: impl Into<PathBuf>, data_url: Option<String>) -> Self {
        Self {
            output_root: output_root.into(),
            data_url: data_url.unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Base URL generated pages use to reach stylesheets and scripts.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Generated page for one source file: `<root>/<project>/<relative>.html`.
    pub fn page_path(&self, project: &str, relative: &str) -> PathBuf {
        self.output_root.join(project).join(format!("{relative}.html"))
    }

    /// Per-project log of generated files.
    pub fn project_log_path(&self, project: &str) -> PathBuf {
        self.output_root.join(project).join("fileIndex")
    }

    /// Run-level log of every generated page.
    pub fn file_index_path(&self) -> PathBuf {
        self.output_root.join("fileIndex")
    }

    /// Run-level log of pages emitted without annotation.
    pub fn other_index_path(&self) -> PathBuf {
        self.output_root.join("otherIndex")
    }

    /// Reference stream for one symbol key.
    pub fn symbol_index_path(&self, key: &str) -> PathBuf {
        self.output_root.join(REFS_DIR).join(key)
    }

    /// Search index stream for one function key.
    pub fn function_index_path(&self, key: &str) -> PathBuf {
        self.output_root.join(FN_SEARCH_DIR).join(key)
    }

    /// Creates the directories every job assumes exist before the first
    /// stream is opened.
    pub fn ensure_run_dirs(&self) -> Result<()> {
        for dir in [
            self.output_root.clone(),
            self.output_root.join(MACRO_REFS_DIR),
            self.output_root.join(FN_SEARCH_DIR),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
