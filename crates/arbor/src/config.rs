//! File-based configuration.

use std::path::Path;

use arbor_cug::CugParameters;
use arbor_mount::MountSpec;
use arbor_privilege::{PrivilegeDefinition, RegistryConfig};
use serde::{Deserialize, Serialize};

use crate::ArborError;

/// Complete configuration of a [`SecurityProvider`](crate::SecurityProvider).
///
/// ```toml
/// [registry]
/// max_privileges = 256
///
/// [cug]
/// enabled = true
/// supported_paths = ["/content"]
///
/// [[mounts]]
/// name = "libs"
/// paths = ["/libs", "/apps"]
/// read_only = true
///
/// [[privileges]]
/// name = "acme:approve"
///
/// [[privileges]]
/// name = "acme:publish"
/// aggregates = ["acme:approve", "jcr:write"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArborConfig {
    /// Privilege registry settings.
    pub registry: RegistryConfig,

    /// CUG settings.
    pub cug: CugParameters,

    /// Named mounts.
    pub mounts: Vec<MountSpec>,

    /// Custom privileges to register at startup.
    pub privileges: Vec<PrivilegeDefinition>,
}

impl ArborConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ArborError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArborError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ArborError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ArborError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
