use std::path::Path;

use crate::compdb::{CompilationDatabase, CompileEntry};
use crate::models::{Job, SourceStatus};

/// Mount point where the frontend maps its embedded builtin headers. Added
/// as a system include to every command that does not opt out.
pub const BUILTIN_INCLUDE_DIR: &str = "/builtins";

/// Documentation sources get a forced C++ language mode and an `-include` of
/// their header counterpart.
const DOC_SOURCE_EXTENSION: &str = ".qdoc";

/// Assembles the dispatchable job for a file whose compile command is known,
/// running the command through the full normalization pipeline.
pub fn build_job(file: String, entry: CompileEntry, status: SourceStatus) -> Job {
    let command_tokens = prepare_command(entry.tokens, &entry.directory);
    log::debug!("Prepared command for {file}: {command_tokens:?}");
    Job {
        absolute_path: file,
        working_directory: entry.directory,
        command_tokens,
        source_status: status,
    }
}

/// Normalizes a raw compile command: relative paths are anchored at the
/// working directory, output-mode flags are stripped in favor of
/// syntax-only analysis, the builtin include dir is injected, and the
/// warning-suppression flags the frontend relies on are appended.
pub fn prepare_command(tokens: Vec<String>, directory: &Path) -> Vec<String> {
    let (tokens, has_nostdinc) = absolutize_arguments(tokens, directory);
    let tokens = adjust_to_syntax_only(tokens);
    let mut tokens = strip_output_arguments(tokens);

    if !has_nostdinc {
        if cfg!(windows) {
            tokens.push("-I".to_string());
        } else {
            tokens.push("-isystem".to_string());
        }
        tokens.push(BUILTIN_INCLUDE_DIR.to_string());
    }
    tokens.push("-Qunused-arguments".to_string());
    tokens.push("-Wno-unknown-warning-option".to_string());
    tokens
}

/// Rewrites relative paths in the token list to absolute ones. One token of
/// lookbehind distinguishes include paths (joined unconditionally), macro
/// values after a bare `-D`/`-U` (never touched), and positional arguments
/// (joined only when the joined path exists). Also reports whether the
/// command opts out of standard includes.
fn absolutize_arguments(mut tokens: Vec<String>, directory: &Path) -> (Vec<String>, bool) {
    let mut previous_is_include = false;
    let mut previous_is_macro = false;
    let mut has_nostdinc = false;

    for token in &mut tokens {
        if previous_is_include && !token.is_empty() && !token.starts_with('/') {
            *token = join_directory(directory, token);
            previous_is_include = false;
            continue;
        } else if *token == "-I" {
            previous_is_include = true;
            continue;
        } else if *token == "-nostdinc" || *token == "-nostdinc++" {
            has_nostdinc = true;
            continue;
        } else if *token == "-U" || *token == "-D" {
            previous_is_macro = true;
            continue;
        }
        if previous_is_macro {
            previous_is_macro = false;
            continue;
        }
        previous_is_include = false;

        if token.is_empty() {
            continue;
        }
        if let Some(rest) = token.strip_prefix("-I") {
            if !rest.starts_with('/') {
                *token = format!("-I{}", join_directory(directory, rest));
            }
            continue;
        }
        if token.starts_with('-') || token.starts_with('/') {
            continue;
        }
        let joined = directory.join(token.as_str());
        if joined.exists() {
            *token = joined.to_string_lossy().into_owned();
        }
    }

    (tokens, has_nostdinc)
}

fn join_directory(directory: &Path, relative: &str) -> String {
    directory.join(relative).to_string_lossy().into_owned()
}

/// Drops flags that change the output mode and forces syntax-only analysis.
fn adjust_to_syntax_only(tokens: Vec<String>) -> Vec<String> {
    let mut adjusted = Vec::with_capacity(tokens.len() + 1);
    let mut has_syntax_only = false;

    for token in tokens {
        if token.starts_with("-save-temps") || token.starts_with("--save-temps") {
            continue;
        }
        if token.starts_with("-fcolor-diagnostics") || token.starts_with("-fdiagnostics-color") {
            // A color option forwarded through -Xclang takes its escort with it.
            if adjusted.last().is_some_and(|prev| prev == "-Xclang") {
                adjusted.pop();
            }
            continue;
        }
        if token == "-fsyntax-only" {
            has_syntax_only = true;
        }
        adjusted.push(token);
    }

    if !has_syntax_only {
        adjusted.push("-fsyntax-only".to_string());
    }
    adjusted
}

/// Drops explicit output-file flags, both the `-o <path>` and the `-o<path>`
/// forms.
fn strip_output_arguments(tokens: Vec<String>) -> Vec<String> {
    let mut adjusted = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        if token == "-o" {
            tokens.next();
            continue;
        }
        if token.starts_with("-o") {
            continue;
        }
        adjusted.push(token);
    }
    adjusted
}

/// Picks the database entry to borrow for a file without one: the
/// lexicographically nearest known file, found by lower bound over the
/// sorted file list, wrapping to the first entry past the end. `None` only
/// when the database knows no files at all.
///
/// Returns the borrowed entry together with the path it came from.
pub fn recover_entry(db: &CompilationDatabase, file: &str) -> Option<(CompileEntry, String)> {
    let all_files = db.all_files();
    if all_files.is_empty() {
        return None;
    }

    let index = all_files.partition_point(|known| known.as_str() < file);
    let index = if index == all_files.len() { 0 } else { index };
    let borrowed = &all_files[index];
    log::debug!("Borrowing compile command from {borrowed} for {file}");

    let entry = db.command_for(borrowed)?;
    Some((entry, borrowed.clone()))
}

/// Rewrites a borrowed command for its new target: every token equal to the
/// borrowed path becomes the target path. Substitution is token-exact, so a
/// path embedded in a larger flag is left alone. Documentation sources
/// additionally get `-xc++` after the driver and an `-include` of the
/// header with the same stem.
pub fn recovered_tokens(mut tokens: Vec<String>, borrowed_path: &str, file: &str) -> Vec<String> {
    for token in &mut tokens {
        if *token == borrowed_path {
            *token = file.to_string();
        }
    }

    if let Some(stem) = file.strip_suffix(DOC_SOURCE_EXTENSION) {
        let language_at = tokens.len().min(1);
        tokens.insert(language_at, "-xc++".to_string());
        tokens.push("-include".to_string());
        tokens.push(format!("{stem}.h"));
    }
    tokens
}
