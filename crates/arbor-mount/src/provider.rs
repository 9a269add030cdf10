//! Mount layouts.

use std::collections::HashSet;
use std::fmt::Debug;

use tracing::debug;

use crate::error::{MountError, MountResult};
use crate::mount::{Mount, MountSpec};
use crate::path;

/// Source of the mount layout of a repository.
pub trait MountInfoProvider: Send + Sync + Debug {
    /// The mount owning every path no named mount claims.
    fn default_mount(&self) -> &Mount;

    /// All named mounts, in declaration order.
    fn non_default_mounts(&self) -> &[Mount];

    /// Whether any named mount exists.
    fn has_non_default_mounts(&self) -> bool {
        !self.non_default_mounts().is_empty()
    }

    /// The mount owning `path`.
    fn mount_by_path(&self, path: &str) -> &Mount {
        self.non_default_mounts()
            .iter()
            .find(|mount| mount.is_mounted(path))
            .unwrap_or_else(|| self.default_mount())
    }

    /// Look up a mount by name.
    fn mount_by_name(&self, name: &str) -> Option<&Mount> {
        let default = self.default_mount();
        if default.name() == name {
            return Some(default);
        }
        self.non_default_mounts()
            .iter()
            .find(|mount| mount.name() == name)
    }
}

/// A fixed, validated mount layout.
#[derive(Debug, Clone)]
pub struct Mounts {
    default: Mount,
    mounts: Vec<Mount>,
}

impl Mounts {
    /// Start building a layout.
    pub fn builder() -> MountsBuilder {
        MountsBuilder::default()
    }

    /// A layout with only the default mount.
    pub fn default_provider() -> Self {
        Self {
            default: Mount::default_mount(),
            mounts: Vec::new(),
        }
    }

    /// Build a layout from serialized mount descriptions.
    pub fn from_specs(specs: impl IntoIterator<Item = MountSpec>) -> MountResult<Self> {
        specs
            .into_iter()
            .fold(Self::builder(), MountsBuilder::with_spec)
            .build()
    }
}

impl Default for Mounts {
    fn default() -> Self {
        Self::default_provider()
    }
}

impl MountInfoProvider for Mounts {
    fn default_mount(&self) -> &Mount {
        &self.default
    }

    fn non_default_mounts(&self) -> &[Mount] {
        &self.mounts
    }
}

/// Builder for [`Mounts`].
#[derive(Debug, Default)]
pub struct MountsBuilder {
    specs: Vec<MountSpec>,
}

impl MountsBuilder {
    /// Add a writable mount.
    pub fn mount<I, S>(self, name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(name.into(), paths, false)
    }

    /// Add a read-only mount.
    pub fn read_only_mount<I, S>(self, name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(name.into(), paths, true)
    }

    /// Add a mount from its serialized description.
    pub fn with_spec(mut self, spec: MountSpec) -> Self {
        self.specs.push(spec);
        self
    }

    fn add<I, S>(self, name: String, paths: I, read_only: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_spec(MountSpec {
            name,
            paths: paths.into_iter().map(Into::into).collect(),
            read_only,
        })
    }

    /// Validate the mounts and build the layout.
    ///
    /// Every path must be absolute and normalized, names must be unique
    /// and distinct from the default mount, and no two mounts may claim
    /// overlapping subtrees.
    pub fn build(self) -> MountResult<Mounts> {
        let default = Mount::default_mount();
        let mut names = HashSet::new();
        let mut mounts: Vec<Mount> = Vec::with_capacity(self.specs.len());

        for spec in self.specs {
            if spec.name == default.name() || !names.insert(spec.name.clone()) {
                return Err(MountError::DuplicateMount(spec.name));
            }
            if spec.paths.is_empty() {
                return Err(MountError::EmptyMount(spec.name));
            }
            for mount_path in &spec.paths {
                path::validate(mount_path)?;
                for other in &mounts {
                    if let Some(other_path) = other.related_path(mount_path) {
                        return Err(MountError::OverlappingMount {
                            first: other.name().to_string(),
                            first_path: other_path.to_string(),
                            second: spec.name.clone(),
                            second_path: mount_path.clone(),
                        });
                    }
                }
            }

            debug!(mount = %spec.name, paths = ?spec.paths, "Mount declared");
            mounts.push(Mount::named(spec));
        }

        Ok(Mounts { default, mounts })
    }
}
