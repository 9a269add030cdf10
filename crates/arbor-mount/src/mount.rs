//! Mounts.
//!
//! A mount claims one or more subtrees of the repository for a separate
//! store. Everything not claimed by a named mount belongs to the default
//! mount.

use serde::{Deserialize, Serialize};

use crate::path;

/// Name of the default mount.
pub const DEFAULT_MOUNT_NAME: &str = "<default>";

/// Serializable description of a named mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    /// Mount name.
    pub name: String,
    /// Root paths of the subtrees the mount claims.
    pub paths: Vec<String>,
    /// Whether the mount is read-only.
    #[serde(default)]
    pub read_only: bool,
}

/// A named partition of the repository namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    name: String,
    paths: Vec<String>,
    read_only: bool,
    default: bool,
}

impl Mount {
    pub(crate) fn named(spec: MountSpec) -> Self {
        Self {
            name: spec.name,
            paths: spec.paths,
            read_only: spec.read_only,
            default: false,
        }
    }

    pub(crate) fn default_mount() -> Self {
        Self {
            name: DEFAULT_MOUNT_NAME.to_string(),
            paths: Vec::new(),
            read_only: false,
            default: true,
        }
    }

    /// The mount name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root paths of the claimed subtrees. Empty for the default mount.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether the mount is read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether this is the default mount.
    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Whether `path` lies in one of the subtrees this mount claims.
    ///
    /// Always false for the default mount; ask the provider which mount
    /// owns a path instead.
    pub fn is_mounted(&self, path: &str) -> bool {
        self.paths
            .iter()
            .any(|root| path::is_same_or_descendant(path, root))
    }

    /// Whether one of this mount's roots lies strictly below `path`.
    pub fn is_under(&self, path: &str) -> bool {
        self.paths.iter().any(|root| path::is_ancestor(path, root))
    }

    /// Whether one of this mount's roots is a direct child of `path`.
    pub fn is_directly_under(&self, path: &str) -> bool {
        self.paths
            .iter()
            .any(|root| path::parent(root) == Some(path))
    }

    /// The first mount root that equals, contains or lies below `path`.
    pub fn related_path(&self, path: &str) -> Option<&str> {
        self.paths
            .iter()
            .find(|root| path::is_related(root, path))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount(paths: &[&str]) -> Mount {
        Mount::named(MountSpec {
            name: "mnt".to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            read_only: false,
        })
    }

    #[test]
    fn test_is_mounted() {
        let m = mount(&["/libs", "/apps/shared"]);
        assert!(m.is_mounted("/libs"));
        assert!(m.is_mounted("/libs/core"));
        assert!(m.is_mounted("/apps/shared/x"));
        assert!(!m.is_mounted("/apps"));
        assert!(!m.is_mounted("/content"));
    }

    #[test]
    fn test_is_under() {
        let m = mount(&["/apps/shared"]);
        assert!(m.is_under("/apps"));
        assert!(m.is_under("/"));
        assert!(!m.is_under("/apps/shared"));
        assert!(m.is_directly_under("/apps"));
        assert!(!m.is_directly_under("/"));
    }

    #[test]
    fn test_related_path() {
        let m = mount(&["/libs", "/content/mnt"]);
        assert_eq!(m.related_path("/content"), Some("/content/mnt"));
        assert_eq!(m.related_path("/libs/x"), Some("/libs"));
        assert_eq!(m.related_path("/apps"), None);
    }

    #[test]
    fn test_default_mount() {
        let m = Mount::default_mount();
        assert!(m.is_default());
        assert!(m.paths().is_empty());
        assert!(!m.is_mounted("/content"));
    }

    #[test]
    fn test_spec_deserialize() {
        let spec: MountSpec =
            serde_json::from_str(r#"{"name": "libs", "paths": ["/libs"]}"#).unwrap();
        assert!(!spec.read_only);
        assert_eq!(spec.paths, vec!["/libs".to_string()]);
    }
}
