/// How a registered project participates in generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Named on the command line; pages and references are generated.
    Normal,
    /// Built-in coverage for system include roots; generated like Normal.
    Internal,
    /// A path range browsed elsewhere; resolved for ownership but never a
    /// target of generation.
    External,
}

/// A registered project: a name plus the source root it owns.
///
/// `source_path` is canonical (absolute, lexically normalized) and always
/// slash-terminated once the registry has accepted the project, so ownership
/// checks reduce to a string prefix test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub source_path: String,
    pub revision: Option<String>,
    pub kind: ProjectKind,
    /// Base URL of the external browser; set iff `kind` is `External`.
    pub external_root_url: Option<String>,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            revision: None,
            kind: ProjectKind::Normal,
            external_root_url: None,
        }
    }

    pub fn with_revision(
        name: impl Into<String>,
        source_path: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self { revision: Some(revision.into()), ..Self::new(name, source_path) }
    }

    pub fn external(
        name: impl Into<String>,
        source_path: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            kind: ProjectKind::External,
            external_root_url: Some(url.into()),
            ..Self::new(name, source_path)
        }
    }

    pub(crate) fn internal(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self { kind: ProjectKind::Internal, ..Self::new(name, source_path) }
    }

    /// Path of `path` relative to this project's source root. `path` is
    /// expected to be owned by this project; an unowned path comes back
    /// unchanged.
    pub fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.source_path.as_str()).unwrap_or(path)
    }
}
