use std::fs;

use anyhow::{Context, Result};

use crate::context::RunContext;
use crate::models::ProjectInfo;
use crate::output::page;

/// Disclaimer shown at the top of pages generated without annotation.
pub const FALLBACK_DISCLAIMER: &str =
    "Warning: This file is not a C or C++ file. It does not have highlighting.";

/// Writes the unannotated page for a file no compile command could be found
/// for, and records it in the other index. `path` is canonical and owned by
/// `project`; the page claim has already been taken by the dispatcher.
///
/// An unreadable source file is skipped without error; there is nothing to
/// show for it.
pub fn emit_fallback_page(ctx: &RunContext, project: &ProjectInfo, path: &str) -> Result<()> {
    let Ok(bytes) = fs::read(path) else {
        return Ok(());
    };
    let source = String::from_utf8_lossy(&bytes);

    let relative = project.relative_path(path);
    let page_ref = format!("{}/{}", project.name, relative);
    let footer = page::page_footer(project);
    let html = page::render_page(
        ctx.layout.data_url(),
        &page_ref,
        Some(FALLBACK_DISCLAIMER),
        &source,
        &footer,
    );

    let page_path = ctx.layout.page_path(&project.name, relative);
    if let Some(parent) = page_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create page directory: {}", parent.display()))?;
    }
    fs::write(&page_path, html)
        .with_context(|| format!("Failed to write page: {}", page_path.display()))?;

    ctx.output.append_to_other_index(&page_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> RunContext {
        RunContext::new(dir.path().join("out"), None).unwrap()
    }

    #[test]
    fn test_emits_page_and_other_index_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let source = dir.path().join("src/README");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, "docs & <notes>").unwrap();

        let mut project = ProjectInfo::with_revision("app", "x", "0.3");
        project.source_path = format!("{}/src/", dir.path().display());

        emit_fallback_page(&ctx, &project, &source.to_string_lossy()).unwrap();
        drop(ctx);

        let page = fs::read_to_string(dir.path().join("out/app/README.html")).unwrap();
        assert!(page.contains(FALLBACK_DISCLAIMER));
        assert!(page.contains("docs &amp; &lt;notes&gt;"));
        assert!(page.contains("from project app"));
        assert!(page.contains("revision <em>0.3</em>"));

        let other_index = fs::read_to_string(dir.path().join("out/otherIndex")).unwrap();
        assert_eq!(other_index, "app/README\n");
    }

    #[test]
    fn test_unreadable_source_is_silently_skipped() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let mut project = ProjectInfo::new("app", "x");
        project.source_path = format!("{}/src/", dir.path().display());

        let missing = format!("{}/src/gone.txt", dir.path().display());
        emit_fallback_page(&ctx, &project, &missing).unwrap();
        drop(ctx);

        assert!(!dir.path().join("out/app/gone.txt.html").exists());
        assert_eq!(fs::read_to_string(dir.path().join("out/otherIndex")).unwrap(), "");
    }
}
