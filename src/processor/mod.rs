//! The unit-processing boundary
//!
//! The annotating compiler frontend lives behind [`UnitProcessor`] and is
//! expected to be implemented out of tree. [`PlainPageProcessor`] is the
//! built-in implementation: it renders escaped source listings without any
//! cross-referencing, which keeps the binary usable end to end.

use std::fs;

use crate::context::RunContext;
use crate::models::Job;
use crate::output::page;

/// Processes one translation unit: consumes a resolved job and produces a
/// page plus any reference-stream appends through the context's aggregator.
///
/// Implementations run concurrently on worker threads. Returning false marks
/// this unit failed; it never affects any other unit.
pub trait UnitProcessor: Sync {
    fn process(&self, job: Job, ctx: &RunContext) -> bool;
}

/// Renders one escaped source listing per job.
pub struct PlainPageProcessor;

impl UnitProcessor for PlainPageProcessor {
    fn process(&self, job: Job, ctx: &RunContext) -> bool {
        let Some(project) = ctx.registry.resolve(&job.absolute_path) else {
            return false;
        };
        let Ok(bytes) = fs::read(&job.absolute_path) else {
            return false;
        };
        let source = String::from_utf8_lossy(&bytes);

        let relative = project.relative_path(&job.absolute_path);
        let page_ref = format!("{}/{}", project.name, relative);
        let footer = page::page_footer(project);
        let html = page::render_page(ctx.layout.data_url(), &page_ref, None, &source, &footer);

        let page_path = ctx.layout.page_path(&project.name, relative);
        if let Some(parent) = page_path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        if fs::write(&page_path, html).is_err() {
            return false;
        }

        let logged = ctx
            .output
            .append_to_file_index(&page_ref)
            .and_then(|_| ctx.output.append_to_project_log(&project.name, relative));
        if let Err(e) = logged {
            eprintln!("Warning: {e:#}");
        }
        true
    }
}
