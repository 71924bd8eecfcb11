use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::utils::normalize_path;

const DATABASE_FILENAME: &str = "compile_commands.json";

/// Driver placeholder used for pass-through command lines, where the real
/// compiler name is not known.
const PASSTHROUGH_DRIVER: &str = "clang-tool";

/// One resolved database entry: the directory the compiler runs in and the
/// full argument vector including the driver token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileEntry {
    pub directory: PathBuf,
    pub tokens: Vec<String>,
}

/// Raw JSON shape of a compile_commands.json record. Exactly one of
/// `arguments` and `command` must be present; `arguments` wins when both are.
#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    #[serde(default)]
    command: Option<String>,
}

enum Source {
    Json {
        commands: HashMap<String, CompileEntry>,
        files: Vec<String>,
    },
    Fixed {
        directory: PathBuf,
        arguments: Vec<String>,
    },
}

/// Mapping from canonical source file paths to compile commands.
///
/// Two backing forms exist: a JSON database loaded from disk, and a fixed
/// database synthesized from a pass-through command line, which answers every
/// query with the same arguments and reports no known files.
pub struct CompilationDatabase {
    source: Source,
}

impl CompilationDatabase {
    /// Loads a database from a build path. A directory is expected to contain
    /// `compile_commands.json`; any other path is parsed as the JSON file
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// contains an entry with neither `arguments` nor `command`.
    pub fn load(build_path: &Path) -> Result<Self> {
        let file_path = if build_path.is_dir() {
            build_path.join(DATABASE_FILENAME)
        } else {
            build_path.to_path_buf()
        };

        let contents = fs::read_to_string(&file_path).with_context(|| {
            format!("Failed to read compilation database: {}", file_path.display())
        })?;
        let raw: Vec<RawEntry> = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse compilation database: {}", file_path.display())
        })?;

        Self::from_raw_entries(raw)
    }

    /// Builds the pass-through database from the command line after `--`.
    /// Commands are anchored at the current working directory.
    pub fn fixed(arguments: Vec<String>) -> Result<Self> {
        let directory = env::current_dir()
            .context("Failed to determine the current working directory")?;
        Ok(Self { source: Source::Fixed { directory, arguments } })
    }

    fn from_raw_entries(raw: Vec<RawEntry>) -> Result<Self> {
        let mut commands: HashMap<String, CompileEntry> = HashMap::new();

        for entry in raw {
            let directory = normalize_path(Path::new(&entry.directory));
            let file = Path::new(&entry.file);
            let absolute = if file.is_absolute() {
                file.to_path_buf()
            } else {
                directory.join(file)
            };
            let key = normalize_path(&absolute).to_string_lossy().into_owned();

            let tokens = match (entry.arguments, entry.command) {
                (Some(arguments), _) => arguments,
                (None, Some(command)) => shell_words::split(&command).with_context(|| {
                    format!("Failed to split the compile command for {}", key)
                })?,
                (None, None) => {
                    bail!("Database entry for {} has neither \"arguments\" nor \"command\"", key)
                }
            };

            // The first entry per file wins; later duplicates are ignored.
            commands.entry(key).or_insert(CompileEntry { directory, tokens });
        }

        let mut files: Vec<String> = commands.keys().cloned().collect();
        files.sort();

        Ok(Self { source: Source::Json { commands, files } })
    }

    /// Returns the compile command for a canonical file path, if any. A fixed
    /// database answers every query.
    pub fn command_for(&self, file: &str) -> Option<CompileEntry> {
        match &self.source {
            Source::Json { commands, .. } => commands.get(file).cloned(),
            Source::Fixed { directory, arguments } => {
                let mut tokens = Vec::with_capacity(arguments.len() + 2);
                tokens.push(PASSTHROUGH_DRIVER.to_string());
                tokens.extend(arguments.iter().cloned());
                tokens.push(file.to_string());
                Some(CompileEntry { directory: directory.clone(), tokens })
            }
        }
    }

    /// Sorted canonical paths of every file with an entry. Empty for a fixed
    /// database, which has no file universe of its own.
    pub fn all_files(&self) -> &[String] {
        match &self.source {
            Source::Json { files, .. } => files,
            Source::Fixed { .. } => &[],
        }
    }
}
