//! Error types for CUG configuration.

use arbor_mount::MountError;
use thiserror::Error;

/// Errors raised while assembling a CUG configuration.
#[derive(Debug, Error)]
pub enum CugError {
    /// A mount boundary coincides with, contains or lies inside a supported path.
    #[error(
        "Mount '{mount}' at {mount_path} conflicts with CUG supported path {supported_path}"
    )]
    ConfigurationConflict {
        /// Name of the conflicting mount.
        mount: String,
        /// The mount path involved.
        mount_path: String,
        /// The supported path involved.
        supported_path: String,
    },

    /// Mounts are present but no supported paths scope the CUG policies.
    #[error("No CUG supported paths configured while mounts are present: {}", mounts.join(", "))]
    MountsWithoutScope {
        /// Names of the non-default mounts.
        mounts: Vec<String>,
    },

    /// A supported path is not a normalized absolute path.
    #[error("Invalid CUG supported path '{path}'")]
    InvalidSupportedPath {
        /// The rejected path.
        path: String,
        /// The underlying path error.
        #[source]
        source: MountError,
    },
}

impl CugError {
    /// Whether the configuration conflicts with the mount layout.
    ///
    /// Such a configuration must never become active.
    pub fn is_configuration_conflict(&self) -> bool {
        matches!(
            self,
            CugError::ConfigurationConflict { .. } | CugError::MountsWithoutScope { .. }
        )
    }
}

/// Result type for CUG operations.
pub type CugResult<T> = std::result::Result<T, CugError>;
