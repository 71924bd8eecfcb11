use std::collections::HashSet;
use std::sync::Mutex;

use crate::models::{ProjectInfo, ProjectKind};
use crate::output::OutputLayout;
use crate::utils::canonical_source_path;

/// Built-in roots registered in every run so system headers resolve to a
/// project instead of falling out of the universe.
fn system_projects() -> Vec<ProjectInfo> {
    vec![ProjectInfo::internal("include", "/usr/include/")]
}

/// Maps canonical file paths to their owning project and hands out claims on
/// output pages.
///
/// Resolution is longest-prefix match over the registered source roots. A
/// path may fall under several roots; the longest one wins, and among equal
/// lengths the latest registration wins. Claims are one-way: once a page path
/// is admitted it stays claimed for the life of the registry.
pub struct ProjectRegistry {
    layout: OutputLayout,
    projects: Vec<ProjectInfo>,
    claimed_pages: Mutex<HashSet<String>>,
}

impl ProjectRegistry {
    pub fn new(layout: OutputLayout) -> Self {
        let mut registry = Self {
            layout,
            projects: Vec::new(),
            claimed_pages: Mutex::new(HashSet::new()),
        };
        for info in system_projects() {
            registry.register(info);
        }
        registry
    }

    /// Registers a project after canonicalizing its source root and ensuring
    /// the trailing slash. Returns false when the root is empty. Duplicate
    /// roots are allowed; `resolve` arbitrates.
    pub fn register(&mut self, mut info: ProjectInfo) -> bool {
        if info.source_path.is_empty() {
            return false;
        }
        let Ok(mut canonical) = canonical_source_path(&info.source_path) else {
            return false;
        };
        if canonical.is_empty() {
            return false;
        }
        if !canonical.ends_with('/') {
            canonical.push('/');
        }
        info.source_path = canonical;

        self.projects.push(info);
        true
    }

    /// Returns the project owning `path`, the one whose source root is the
    /// longest matching prefix. Re-scans on every call; no caching, since
    /// projects may still be added between calls before dispatch starts.
    pub fn resolve(&self, path: &str) -> Option<&ProjectInfo> {
        let mut match_length = 0;
        let mut result = None;

        for project in &self.projects {
            let source_path = &project.source_path;
            if source_path.len() < match_length {
                continue;
            }
            if path.starts_with(source_path.as_str()) {
                match_length = source_path.len();
                result = Some(project);
            }
        }
        result
    }

    /// Claims the output page for `path`. `project` is the resolution result
    /// for the same path; `None` and External projects are never admitted.
    /// Returns true exactly once per page, no matter how many jobs race here.
    pub fn admits(&self, path: &str, project: Option<&ProjectInfo>) -> bool {
        let Some(project) = project else {
            return false;
        };
        if project.kind == ProjectKind::External {
            return false;
        }

        let relative = project.relative_path(path);
        let page = self.layout.page_path(&project.name, relative).to_string_lossy().into_owned();
        self.claimed_pages.lock().unwrap().insert(page)
    }
}
