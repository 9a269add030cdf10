//! Assembled CUG configuration.

use std::sync::Arc;

use arbor_mount::MountInfoProvider;
use tracing::info;

use crate::config::CugParameters;
use crate::error::CugResult;
use crate::supported_paths::SupportedPaths;
use crate::validator::MountAwarePathValidator;

/// A CUG configuration whose supported paths have been validated against
/// the mount layout.
#[derive(Debug, Clone)]
pub struct CugConfiguration {
    parameters: CugParameters,
    supported: SupportedPaths,
    mount_provider: Arc<dyn MountInfoProvider>,
}

impl CugConfiguration {
    /// Validate `parameters` against `mount_provider`.
    ///
    /// The narrowed path set replaces the configured one. A conflicting
    /// configuration is refused.
    pub fn new(
        mut parameters: CugParameters,
        mount_provider: Arc<dyn MountInfoProvider>,
    ) -> CugResult<Self> {
        let paths =
            MountAwarePathValidator::validate(&parameters.supported_paths, mount_provider.as_ref())?;
        parameters.supported_paths = paths.clone();

        info!(
            enabled = parameters.enabled,
            supported_paths = paths.len(),
            "CUG configuration assembled"
        );

        Ok(Self {
            parameters,
            supported: SupportedPaths::new(paths),
            mount_provider,
        })
    }

    /// The effective parameters.
    pub fn parameters(&self) -> &CugParameters {
        &self.parameters
    }

    /// Whether CUG evaluation is enabled.
    pub fn is_enabled(&self) -> bool {
        self.parameters.enabled
    }

    /// The validated supported paths.
    pub fn supported_paths(&self) -> &SupportedPaths {
        &self.supported
    }

    /// The mount layout the configuration was validated against.
    pub fn mount_provider(&self) -> &Arc<dyn MountInfoProvider> {
        &self.mount_provider
    }
}
