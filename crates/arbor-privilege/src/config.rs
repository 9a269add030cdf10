//! Configuration for the privilege registry.

use serde::{Deserialize, Serialize};

/// Configuration for a [`PrivilegeRegistry`](crate::PrivilegeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of atomic privileges, built-ins included.
    ///
    /// Each atomic privilege consumes one bit position. Defaults to 512.
    pub max_privileges: u32,

    /// Whether custom privileges may be registered after startup.
    pub allow_custom_registration: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_privileges: 512,
            allow_custom_registration: true,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of atomic privileges.
    pub fn with_max_privileges(mut self, max: u32) -> Self {
        self.max_privileges = max;
        self
    }

    /// Allow or forbid custom privilege registration.
    pub fn with_custom_registration(mut self, allowed: bool) -> Self {
        self.allow_custom_registration = allowed;
        self
    }

    /// A configuration that only serves the built-in and stored privileges.
    pub fn read_only() -> Self {
        Self {
            allow_custom_registration: false,
            ..Self::default()
        }
    }
}
