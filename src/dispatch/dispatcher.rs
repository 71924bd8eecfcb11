use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::ThreadPool;

use super::{fallback, jobs};
use crate::compdb::{CompilationDatabase, CompileEntry};
use crate::context::RunContext;
use crate::models::{Job, ProjectKind, SourceStatus};
use crate::processor::UnitProcessor;
use crate::utils::{canonical_source_path, is_header_path};

/// Counters accumulated over one dispatch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total_sources: usize,
    /// Jobs submitted during the database phase.
    pub submitted_in_database: usize,
    /// Jobs submitted during the recovery phase.
    pub submitted_recovered: usize,
    /// Unannotated pages emitted because no command could be found.
    pub fallback_pages: usize,
    /// Files owned by no registered project.
    pub skipped_no_project: usize,
    /// Files whose page was already claimed, or that belong to an external
    /// project and are never admitted.
    pub skipped_claimed: usize,
    /// Jobs rejected by the dedup guard on a worker.
    pub duplicates: usize,
    /// Jobs whose processing failed, including fallback pages that could not
    /// be written.
    pub failures: usize,
}

/// Fixed-size worker pool driving the two dispatch phases.
pub struct Dispatcher {
    pool: ThreadPool,
}

impl Dispatcher {
    /// Builds the worker pool. `workers` falls back to the available
    /// parallelism when not given.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|i| format!("atlas-worker-{i}"))
            .build()
            .context("Failed to build the worker pool")?;
        Ok(Self { pool })
    }

    /// Drives both dispatch phases over `sources` and blocks until every
    /// submitted job has finished.
    ///
    /// The calling thread is the sole producer. Phase 1 walks the sources in
    /// order and submits every non-header file with a direct database entry;
    /// everything else lands on the delayed queue. Phase 2 starts once phase
    /// 1 submission is complete and resolves each delayed file through the
    /// recovery path, falling back to an unannotated page when no command
    /// exists anywhere. The surrounding scope is the drain barrier: no job
    /// outlives this call.
    ///
    /// Per-file problems are reported and counted, never propagated; one bad
    /// file cannot abort the batch.
    pub fn run(
        &self,
        sources: &[String],
        db: &CompilationDatabase,
        ctx: &RunContext,
        processor: &dyn UnitProcessor,
        whole_directory: bool,
    ) -> RunStats {
        let mut stats = RunStats { total_sources: sources.len(), ..RunStats::default() };
        let total = sources.len().max(1);
        let duplicates = AtomicUsize::new(0);
        let failures = AtomicUsize::new(0);

        self.pool.in_place_scope(|scope| {
            let duplicates = &duplicates;
            let failures = &failures;
            let submit = |job: Job| {
                scope.spawn(move |_| {
                    let file = job.absolute_path.clone();
                    if !ctx.dedup.try_admit(&file) {
                        eprintln!("Skipping already processed {file}");
                        duplicates.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                    if !processor.process(job, ctx) {
                        eprintln!("Error: The file was not recognized as source code: {file}");
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                });
            };

            let mut delayed: Vec<String> = Vec::new();
            let mut progress = 0usize;

            // Phase 1: files with their own database entry.
            for source in sources {
                progress += 1;
                if source.is_empty() || source == "-" {
                    continue;
                }
                let file = match canonical_source_path(source) {
                    Ok(file) => file,
                    Err(e) => {
                        eprintln!("Warning: {e:#}");
                        continue;
                    }
                };

                let Some(project) = ctx.registry.resolve(&file) else {
                    eprintln!("Sources: Skipping file not included by any project {file}");
                    stats.skipped_no_project += 1;
                    continue;
                };
                if project.kind == ProjectKind::External {
                    eprintln!("Sources: Skipping external project file {file}");
                    stats.skipped_claimed += 1;
                    continue;
                }

                // Headers are always delayed; their entry, if any, is picked
                // up again in phase 2.
                let entry = if is_header_path(&file) { None } else { db.command_for(&file) };
                let Some(entry) = entry else {
                    eprintln!("Delayed {file}");
                    progress -= 1;
                    delayed.push(file);
                    continue;
                };

                if !ctx.registry.admits(&file, Some(project)) {
                    eprintln!("Sources: Skipping already processed {file}");
                    stats.skipped_claimed += 1;
                    continue;
                }

                eprintln!("[{}%] Processing {file}", 100 * progress / total);
                let status = if whole_directory {
                    SourceStatus::ProcessFullDirectory
                } else {
                    SourceStatus::InDatabase
                };
                stats.submitted_in_database += 1;
                submit(jobs::build_job(file, entry, status));
            }

            // Phase 2: delayed files run on borrowed commands.
            for file in delayed {
                progress += 1;

                let Some(project) = ctx.registry.resolve(&file) else {
                    eprintln!("NotInDB: Skipping file not included by any project {file}");
                    stats.skipped_no_project += 1;
                    continue;
                };
                if !ctx.registry.admits(&file, Some(project)) {
                    eprintln!("NotInDB: Skipping already processed {file}");
                    stats.skipped_claimed += 1;
                    continue;
                }

                let found = match db.command_for(&file) {
                    Some(entry) => Some((entry, file.clone())),
                    None => jobs::recover_entry(db, &file),
                };
                let Some((entry, borrowed)) = found else {
                    eprintln!("Could not find commands for {file}");
                    if !whole_directory {
                        match fallback::emit_fallback_page(ctx, project, &file) {
                            Ok(()) => stats.fallback_pages += 1,
                            Err(e) => {
                                eprintln!("Warning: {e:#}");
                                failures.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    continue;
                };

                eprintln!("[{}%] Processing {file}", 100 * progress / total);
                let status = if whole_directory {
                    SourceStatus::ProcessFullDirectory
                } else {
                    SourceStatus::Recovered
                };
                let CompileEntry { directory, tokens } = entry;
                let tokens = jobs::recovered_tokens(tokens, &borrowed, &file);
                stats.submitted_recovered += 1;
                submit(jobs::build_job(file, CompileEntry { directory, tokens }, status));
            }
        });

        stats.duplicates = duplicates.load(Ordering::Relaxed);
        stats.failures = failures.load(Ordering::Relaxed);
        stats
    }
}
