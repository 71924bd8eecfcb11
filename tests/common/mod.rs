//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

/// Builder for a throwaway source tree plus its compilation database.
///
/// Sources land under `<root>/src`, the database under
/// `<root>/build/compile_commands.json`, and generated output is expected
/// under `<root>/out`.
pub struct WorkspaceBuilder {
    temp_dir: TempDir,
    entries: Vec<serde_json::Value>,
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("src")).expect("Failed to create src dir");
        fs::create_dir(temp_dir.path().join("build")).expect("Failed to create build dir");
        Self { temp_dir, entries: Vec::new() }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn src_dir(&self) -> PathBuf {
        self.temp_dir.path().join("src")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.temp_dir.path().join("build")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    /// Absolute path of a source file, whether or not it exists yet.
    pub fn source_path(&self, name: &str) -> String {
        self.src_dir().join(name).to_string_lossy().into_owned()
    }

    /// Write a source file under `src/`, creating parent directories.
    pub fn with_source(self, name: &str, content: &str) -> Self {
        let path = self.src_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source parent dir");
        }
        fs::write(path, content).expect("Failed to write source file");
        self
    }

    /// Record a database entry for `src/<name>` using the argument list form.
    /// The compiler driver and the file path are filled in automatically.
    pub fn with_db_entry(mut self, name: &str, extra_args: &[&str]) -> Self {
        let file = self.source_path(name);
        let mut arguments = vec!["c++".to_string()];
        arguments.extend(extra_args.iter().map(|a| a.to_string()));
        arguments.push(file.clone());
        self.entries.push(json!({
            "directory": self.src_dir().to_string_lossy(),
            "file": file,
            "arguments": arguments,
        }));
        self
    }

    /// Record a database entry for `src/<name>` using the single command
    /// string form.
    pub fn with_db_command(mut self, name: &str, command: &str) -> Self {
        let file = self.source_path(name);
        self.entries.push(json!({
            "directory": self.src_dir().to_string_lossy(),
            "file": file,
            "command": command,
        }));
        self
    }

    /// Write `build/compile_commands.json` from the recorded entries and
    /// return the build directory.
    pub fn write_db(&self) -> PathBuf {
        let content = serde_json::to_string_pretty(&self.entries)
            .expect("Failed to serialize compile_commands.json");
        fs::write(self.build_dir().join("compile_commands.json"), content)
            .expect("Failed to write compile_commands.json");
        self.build_dir()
    }

    /// `name:path` option string for `src/`, as passed to `-p`.
    pub fn project_spec(&self, name: &str) -> String {
        format!("{}:{}", name, self.src_dir().display())
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
