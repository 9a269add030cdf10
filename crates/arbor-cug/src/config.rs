//! CUG configuration parameters.

use serde::{Deserialize, Serialize};

/// Parameters of the closed user group authorization model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CugParameters {
    /// Whether CUG policies are evaluated.
    pub enabled: bool,

    /// Paths under which CUG policies may be defined.
    pub supported_paths: Vec<String>,
}

impl CugParameters {
    /// Create disabled parameters with no supported paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable CUG evaluation.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a supported path.
    pub fn with_supported_path(mut self, path: impl Into<String>) -> Self {
        self.supported_paths.push(path.into());
        self
    }

    /// Replace the supported paths.
    pub fn with_supported_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}
