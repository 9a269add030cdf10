//! Error types for mount layouts.

use thiserror::Error;

/// Errors raised while building a mount layout.
#[derive(Debug, Error)]
pub enum MountError {
    /// A path is not a normalized absolute repository path.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two mounts share a name.
    #[error("Duplicate mount name: {0}")]
    DuplicateMount(String),

    /// A mount has no paths.
    #[error("Mount '{0}' has no paths")]
    EmptyMount(String),

    /// Paths of two mounts overlap.
    #[error("Mount '{first}' path {first_path} overlaps mount '{second}' path {second_path}")]
    OverlappingMount {
        /// The mount declared first.
        first: String,
        /// Its overlapping path.
        first_path: String,
        /// The mount declared second.
        second: String,
        /// Its overlapping path.
        second_path: String,
    },
}

/// Result type for mount operations.
pub type MountResult<T> = std::result::Result<T, MountError>;
