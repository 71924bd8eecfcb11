//! Dispatch under contention: many files over a small worker pool, with
//! every page generated exactly once and the shared index streams intact.

mod common;

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::WorkspaceBuilder;
use source_atlas::{
    CompilationDatabase, Dispatcher, Job, PlainPageProcessor, ProjectInfo, RunContext,
    UnitProcessor,
};

/// Counts invocations before delegating to the real page renderer.
struct CountingProcessor {
    calls: AtomicUsize,
}

impl CountingProcessor {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }
}

impl UnitProcessor for CountingProcessor {
    fn process(&self, job: Job, ctx: &RunContext) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed);
        PlainPageProcessor.process(job, ctx)
    }
}

fn populated_workspace(count: usize) -> WorkspaceBuilder {
    let mut ws = WorkspaceBuilder::new();
    for i in 0..count {
        let name = format!("file_{i:02}.cpp");
        ws = ws.with_source(&name, &format!("int value_{i} = {i};\n")).with_db_entry(&name, &[]);
    }
    ws
}

#[test]
fn test_forty_files_over_four_workers_render_exactly_once() {
    let ws = populated_workspace(40);
    let db = CompilationDatabase::load(&ws.write_db()).unwrap();

    let mut ctx = RunContext::new(ws.out_dir(), None).unwrap();
    assert!(ctx.registry.register(ProjectInfo::new("demo", ws.src_dir().to_string_lossy())));
    let processor = CountingProcessor::new();

    let sources: Vec<String> =
        (0..40).map(|i| ws.source_path(&format!("file_{i:02}.cpp"))).collect();
    let stats = Dispatcher::new(Some(4)).unwrap().run(&sources, &db, &ctx, &processor, false);
    drop(ctx);

    assert_eq!(stats.submitted_in_database, 40);
    assert_eq!(stats.failures, 0);
    assert_eq!(processor.calls.load(Ordering::Relaxed), 40);

    for i in 0..40 {
        assert!(ws.out_dir().join(format!("demo/file_{i:02}.cpp.html")).exists());
    }

    let file_index = fs::read_to_string(ws.out_dir().join("fileIndex")).unwrap();
    let lines: Vec<&str> = file_index.lines().collect();
    assert_eq!(lines.len(), 40);
    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(unique.len(), 40);

    let project_log = fs::read_to_string(ws.out_dir().join("demo/fileIndex")).unwrap();
    assert_eq!(project_log.lines().count(), 40);
}

#[test]
fn test_double_listed_sources_are_claimed_once() {
    let ws = populated_workspace(30);
    let db = CompilationDatabase::load(&ws.write_db()).unwrap();

    let mut ctx = RunContext::new(ws.out_dir(), None).unwrap();
    assert!(ctx.registry.register(ProjectInfo::new("demo", ws.src_dir().to_string_lossy())));
    let processor = CountingProcessor::new();

    let mut sources: Vec<String> =
        (0..30).map(|i| ws.source_path(&format!("file_{i:02}.cpp"))).collect();
    sources.extend(sources.clone());

    let stats = Dispatcher::new(Some(4)).unwrap().run(&sources, &db, &ctx, &processor, false);
    drop(ctx);

    assert_eq!(stats.submitted_in_database, 30);
    assert_eq!(stats.skipped_claimed, 30);
    assert_eq!(processor.calls.load(Ordering::Relaxed), 30);

    let file_index = fs::read_to_string(ws.out_dir().join("fileIndex")).unwrap();
    assert_eq!(file_index.lines().count(), 30);
}
