//! Scope queries over supported paths.

use arbor_mount::path;

/// The validated set of paths where CUG policies may be defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedPaths {
    paths: Vec<String>,
}

impl SupportedPaths {
    /// Wrap an already validated path set.
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// The supported paths.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether no path is supported.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether a CUG policy may be defined at `path`.
    pub fn includes(&self, path: &str) -> bool {
        self.paths
            .iter()
            .any(|supported| path::is_same_or_descendant(path, supported))
    }

    /// Whether the subtree at `path` may hold a CUG policy anywhere.
    pub fn may_contain_cug(&self, path: &str) -> bool {
        self.paths
            .iter()
            .any(|supported| path::is_related(path, supported))
    }
}
