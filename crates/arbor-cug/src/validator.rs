//! Validation of supported paths against a mount layout.
//!
//! A CUG boundary must not straddle a mount boundary: enforcing it would
//! need atomic updates across stores. Mount paths that equal, contain or
//! lie inside a supported path are therefore fatal, as is any named mount
//! when no supported path scopes the policies.

use arbor_mount::{MountInfoProvider, path};
use tracing::{debug, info, warn};

use crate::error::{CugError, CugResult};

/// Checks configured supported paths against a [`MountInfoProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MountAwarePathValidator;

impl MountAwarePathValidator {
    /// Validate `supported_paths` and return the narrowed set.
    ///
    /// Duplicates are dropped and paths nested under another supported path
    /// are folded into it, keeping the order of first appearance.
    pub fn validate<S: AsRef<str>>(
        supported_paths: &[S],
        provider: &dyn MountInfoProvider,
    ) -> CugResult<Vec<String>> {
        for supported in supported_paths {
            let supported = supported.as_ref();
            path::validate(supported).map_err(|source| CugError::InvalidSupportedPath {
                path: supported.to_string(),
                source,
            })?;
        }

        let narrowed = narrow(supported_paths);
        if narrowed.len() != supported_paths.len() {
            debug!(
                configured = supported_paths.len(),
                effective = narrowed.len(),
                "Folded nested CUG supported paths"
            );
        }

        let mounts = provider.non_default_mounts();
        if mounts.is_empty() {
            return Ok(narrowed);
        }

        if narrowed.is_empty() {
            let names: Vec<String> = mounts.iter().map(|m| m.name().to_string()).collect();
            warn!(mounts = ?names, "Mounts present without CUG supported paths");
            return Err(CugError::MountsWithoutScope { mounts: names });
        }

        for mount in mounts {
            for supported in &narrowed {
                if let Some(mount_path) = mount.related_path(supported) {
                    warn!(
                        mount = %mount.name(),
                        mount_path = %mount_path,
                        supported_path = %supported,
                        "Mount conflicts with CUG supported path"
                    );
                    return Err(CugError::ConfigurationConflict {
                        mount: mount.name().to_string(),
                        mount_path: mount_path.to_string(),
                        supported_path: supported.clone(),
                    });
                }
            }
            debug!(mount = %mount.name(), "Mount outside CUG scope");
        }

        info!(paths = ?narrowed, "CUG supported paths accepted");
        Ok(narrowed)
    }
}

fn narrow<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut narrowed: Vec<String> = Vec::with_capacity(paths.len());
    for candidate in paths {
        let candidate = candidate.as_ref();
        let covered = paths
            .iter()
            .any(|other| path::is_ancestor(other.as_ref(), candidate));
        if !covered && !narrowed.iter().any(|p| p == candidate) {
            narrowed.push(candidate.to_string());
        }
    }
    narrowed
}
