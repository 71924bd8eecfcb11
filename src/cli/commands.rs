use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use walkdir::WalkDir;

use crate::compdb::CompilationDatabase;
use crate::context::RunContext;
use crate::dispatch::Dispatcher;
use crate::models::ProjectInfo;
use crate::processor::PlainPageProcessor;
use crate::utils::canonical_source_path;

const DATABASE_LOAD_HINT: &str = "Could not load compilation database. Please use the -b \
     option to a path containing a compile_commands.json, or use '--' followed by the \
     compilation commands.";

#[derive(Parser)]
#[command(name = "source-atlas")]
#[command(version = "0.1.0")]
#[command(about = "Generate a browsable HTML rendering of a source tree", long_about = None)]
pub struct Cli {
    /// Directory the generated pages and index streams are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Directory containing compile_commands.json, or the file itself
    #[arg(short, long, value_name = "PATH")]
    pub build: Option<PathBuf>,

    /// Project to generate, as NAME:PATH or NAME:PATH:REVISION
    #[arg(short, long, value_name = "NAME:PATH[:REVISION]")]
    pub project: Vec<String>,

    /// Project browsed elsewhere, as NAME:PATH:URL
    #[arg(short, long, value_name = "NAME:PATH:URL")]
    pub external_project: Vec<String>,

    /// URL of the data directory, relative to the generated pages
    #[arg(short, long, value_name = "URL")]
    pub data_url: Option<String>,

    /// Process every file listed in the compilation database
    #[arg(short = 'a', long)]
    pub process_all: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Source files to process, or a single directory to walk recursively
    pub sources: Vec<String>,

    /// Compilation command applied to every source in place of a database
    #[arg(last = true)]
    pub compile_args: Vec<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut ctx = RunContext::new(cli.output.clone(), cli.data_url.clone())?;

    for spec in &cli.project {
        let info = parse_project_spec(spec)?;
        if !ctx.registry.register(info) {
            bail!("invalid project directory for : {spec}");
        }
    }
    for spec in &cli.external_project {
        let info = parse_external_spec(spec)?;
        if !ctx.registry.register(info) {
            bail!("invalid project directory for : {spec}");
        }
    }

    let database = if !cli.compile_args.is_empty() {
        CompilationDatabase::fixed(cli.compile_args.clone())?
    } else if let Some(build_path) = &cli.build {
        CompilationDatabase::load(build_path).context(DATABASE_LOAD_HINT)?
    } else {
        bail!(DATABASE_LOAD_HINT);
    };

    let mut sources = cli.sources.clone();
    let mut whole_directory = false;

    if cli.process_all {
        if !sources.is_empty() {
            bail!("Cannot use both sources and '-a'");
        }
        sources = database.all_files().to_vec();
    }

    if sources.len() == 1 && Path::new(&sources[0]).is_dir() {
        let root = canonical_source_path(&sources[0])?;
        if cli.project.is_empty() {
            let name = Path::new(&root)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sources".to_string());
            if !ctx.registry.register(ProjectInfo::new(name, root.clone())) {
                bail!("invalid project directory for : {root}");
            }
        }
        sources = collect_directory_sources(Path::new(&root))?;
        whole_directory = true;
    }

    if sources.is_empty() {
        bail!("No source files. Please pass source files as argument, or use '-a'");
    }
    if cli.project.is_empty() && !whole_directory {
        bail!("You must specify a project name and directory with '-p name:directory'");
    }

    let dispatcher = Dispatcher::new(cli.jobs)?;
    let stats = dispatcher.run(&sources, &database, &ctx, &PlainPageProcessor, whole_directory);

    eprintln!(
        "Done: {} sources, {} processed from the database, {} recovered, {} fallback pages, {} skipped, {} failures",
        stats.total_sources,
        stats.submitted_in_database,
        stats.submitted_recovered,
        stats.fallback_pages,
        stats.skipped_no_project + stats.skipped_claimed + stats.duplicates,
        stats.failures,
    );

    Ok(())
}

fn parse_project_spec(spec: &str) -> Result<ProjectInfo> {
    let Some((name, rest)) = spec.split_once(':') else {
        bail!("fail to parse project option : {spec}");
    };
    let (path, revision) = match rest.split_once(':') {
        Some((path, revision)) => (path, Some(revision)),
        None => (rest, None),
    };
    if name.is_empty() || path.is_empty() {
        bail!("fail to parse project option : {spec}");
    }
    Ok(match revision.filter(|r| !r.is_empty()) {
        Some(revision) => ProjectInfo::with_revision(name, path, revision),
        None => ProjectInfo::new(name, path),
    })
}

fn parse_external_spec(spec: &str) -> Result<ProjectInfo> {
    let parts: Vec<&str> = spec.splitn(3, ':').collect();
    match parts.as_slice() {
        [name, path, url] if !name.is_empty() && !path.is_empty() && !url.is_empty() => {
            Ok(ProjectInfo::external(*name, *path, *url))
        }
        _ => bail!("fail to parse project option : {spec}"),
    }
}

/// Collects every regular file under `dir`, skipping hidden entries.
fn collect_directory_sources(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e));
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Error reading the directory: {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}
