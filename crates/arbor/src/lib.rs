//! # Arbor - Repository Access Control
//!
//! Arbor assembles the access-control building blocks of a tree-structured
//! content repository: the privilege registry with its aggregation graph
//! and bit encoding, and the closed user group (CUG) configuration
//! validated against the repository's mount layout.
//!
//! ## Quick Start
//!
//! ```
//! use arbor::prelude::*;
//!
//! let provider = Arbor::builder()
//!     .with_mount("libs", ["/libs"])
//!     .with_cug_parameters(
//!         CugParameters::new()
//!             .with_enabled(true)
//!             .with_supported_path("/content"),
//!     )
//!     .with_privilege(PrivilegeDefinition::atomic("acme:approve"))
//!     .build()?;
//!
//! let approve = provider.registry().bits_of("acme:approve")?;
//! assert!(provider.registry().universal()?.bits().includes(&approve));
//! assert!(provider.cug().supported_paths().includes("/content/site"));
//! # Ok::<(), ArborError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     arbor (facade)                       │
//! │                  ┌──────────────────┐                    │
//! │                  │  Arbor Builder   │                    │
//! │                  └────────┬─────────┘                    │
//! │  ┌────────────────────┬──┴─────────────┬──────────────┐  │
//! │  │ arbor-privilege    │ arbor-cug      │ arbor-mount  │  │
//! │  │ (registry, graph,  │ (supported     │ (mount       │  │
//! │  │  bit encoding)     │  paths)        │  layouts)    │  │
//! │  └────────────────────┴────────────────┴──────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;

use std::sync::Arc;

use arbor_cug::{CugConfiguration, CugParameters};
use arbor_mount::{MountInfoProvider, MountSpec, Mounts};
use arbor_privilege::{
    MemoryPrivilegeStore, PrivilegeDefinition, PrivilegeRegistry, PrivilegeStore, RegistryConfig,
};
use tracing::{debug, info};

pub use config::ArborConfig;

// Re-export from sub-crates
pub use arbor_cug;
pub use arbor_mount;
pub use arbor_privilege;

/// Main entry point for Arbor.
pub struct Arbor;

impl Arbor {
    /// Create a new builder.
    pub fn builder() -> ArborBuilder {
        ArborBuilder::new()
    }

    /// Create a provider with built-in privileges, no mounts and CUG disabled.
    pub fn with_defaults() -> Result<SecurityProvider, ArborError> {
        ArborBuilder::new().build()
    }

    /// Create a provider from a TOML configuration file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<SecurityProvider, ArborError> {
        ArborBuilder::new()
            .with_config(ArborConfig::from_file(path)?)
            .build()
    }
}

/// Builder for a [`SecurityProvider`].
#[derive(Debug, Default)]
pub struct ArborBuilder {
    registry_config: RegistryConfig,
    store: Option<Arc<dyn PrivilegeStore>>,
    privileges: Vec<PrivilegeDefinition>,
    cug_parameters: CugParameters,
    mount_provider: Option<Arc<dyn MountInfoProvider>>,
    mounts: Vec<MountSpec>,
}

impl ArborBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a complete configuration.
    ///
    /// Replaces the registry and CUG settings and appends the configured
    /// mounts and privileges.
    pub fn with_config(mut self, config: ArborConfig) -> Self {
        self.registry_config = config.registry;
        self.cug_parameters = config.cug;
        self.mounts.extend(config.mounts);
        self.privileges.extend(config.privileges);
        self
    }

    // Privileges

    /// Set the registry configuration.
    pub fn with_registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Load and persist custom privileges through `store`.
    pub fn with_store(mut self, store: Arc<dyn PrivilegeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add a custom privilege to register at startup.
    pub fn with_privilege(mut self, definition: PrivilegeDefinition) -> Self {
        self.privileges.push(definition);
        self
    }

    // CUG and mounts

    /// Set the CUG parameters.
    pub fn with_cug_parameters(mut self, parameters: CugParameters) -> Self {
        self.cug_parameters = parameters;
        self
    }

    /// Use an existing mount layout.
    ///
    /// Takes precedence over mounts added with [`with_mount`](Self::with_mount).
    pub fn with_mount_provider(mut self, provider: Arc<dyn MountInfoProvider>) -> Self {
        self.mount_provider = Some(provider);
        self
    }

    /// Add a writable mount.
    pub fn with_mount<I, S>(mut self, name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mounts.push(MountSpec {
            name: name.into(),
            paths: paths.into_iter().map(Into::into).collect(),
            read_only: false,
        });
        self
    }

    /// Build the provider.
    ///
    /// Without an explicit store, the configured privileges seed an
    /// in-memory store and are loaded like stored definitions. With a
    /// store, those not already stored are registered as custom privileges.
    ///
    /// # Errors
    ///
    /// Fails if the mount layout is invalid, if a privilege cannot be
    /// registered, or if the CUG supported paths conflict with the mounts.
    pub fn build(self) -> Result<SecurityProvider, ArborError> {
        let mount_provider = match self.mount_provider {
            Some(provider) => provider,
            None => Arc::new(Mounts::from_specs(self.mounts)?),
        };
        let cug = CugConfiguration::new(self.cug_parameters, Arc::clone(&mount_provider))?;

        let registry = match self.store {
            None => {
                let store = MemoryPrivilegeStore::with_definitions(self.privileges);
                PrivilegeRegistry::with_store(self.registry_config, Arc::new(store))?
            }
            Some(store) => {
                let registry = PrivilegeRegistry::with_store(self.registry_config, store)?;
                for definition in self.privileges {
                    if registry.snapshot().contains(&definition.name) {
                        debug!(privilege = %definition.name, "Privilege already stored");
                        continue;
                    }
                    registry.register(definition)?;
                }
                registry
            }
        };

        info!(
            privileges = registry.len(),
            mounts = mount_provider.non_default_mounts().len(),
            cug_enabled = cug.is_enabled(),
            "Security provider built"
        );

        Ok(SecurityProvider {
            registry: Arc::new(registry),
            cug,
        })
    }
}

/// An assembled access-control configuration.
#[derive(Debug)]
pub struct SecurityProvider {
    registry: Arc<PrivilegeRegistry>,
    cug: CugConfiguration,
}

impl SecurityProvider {
    /// The privilege registry.
    pub fn registry(&self) -> &Arc<PrivilegeRegistry> {
        &self.registry
    }

    /// The validated CUG configuration.
    pub fn cug(&self) -> &CugConfiguration {
        &self.cug
    }

    /// The mount layout.
    pub fn mount_provider(&self) -> &Arc<dyn MountInfoProvider> {
        self.cug.mount_provider()
    }
}

/// Errors from assembling Arbor.
#[derive(Debug, thiserror::Error)]
pub enum ArborError {
    /// Privilege error.
    #[error("Privilege error: {0}")]
    Privilege(#[from] arbor_privilege::PrivilegeError),

    /// Mount layout error.
    #[error("Mount error: {0}")]
    Mount(#[from] arbor_mount::MountError),

    /// CUG configuration error.
    #[error("CUG error: {0}")]
    Cug(#[from] arbor_cug::CugError),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be rendered.
    #[error("Configuration error: {0}")]
    Render(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Main types
    pub use crate::{Arbor, ArborBuilder, ArborConfig, ArborError, SecurityProvider};

    // Privilege types
    pub use arbor_privilege::{
        MemoryPrivilegeStore, Privilege, PrivilegeBits, PrivilegeDefinition, PrivilegeName,
        PrivilegeRegistry, PrivilegeStore, RegistryConfig, builtin,
    };

    // Mount types
    pub use arbor_mount::{Mount, MountInfoProvider, MountSpec, Mounts};

    // CUG types
    pub use arbor_cug::{CugConfiguration, CugParameters, MountAwarePathValidator, SupportedPaths};

    // Common std types
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_privilege::builtin;

    #[test]
    fn test_defaults() {
        let provider = Arbor::with_defaults().unwrap();

        assert_eq!(provider.registry().len(), builtin::definitions().len() + 1);
        assert!(!provider.cug().is_enabled());
        assert!(!provider.mount_provider().has_non_default_mounts());
    }

    #[test]
    fn test_builder_registers_privileges() {
        let provider = Arbor::builder()
            .with_privilege(PrivilegeDefinition::aggregate(
                "acme:publish",
                ["acme:approve", "jcr:write"],
            ))
            .with_privilege(PrivilegeDefinition::atomic("acme:approve"))
            .build()
            .unwrap();

        let registry = provider.registry();
        let publish = registry.get_privilege("acme:publish").unwrap();
        assert!(publish.is_aggregate());
        assert!(registry.bits_of("acme:publish").unwrap().includes(&registry.bits_of("jcr:write").unwrap()));
    }

    #[test]
    fn test_builder_with_store() {
        let store = Arc::new(MemoryPrivilegeStore::with_definitions([
            PrivilegeDefinition::atomic("acme:approve"),
        ]));
        let provider = Arbor::builder()
            .with_store(store.clone())
            .with_privilege(PrivilegeDefinition::atomic("acme:approve"))
            .with_privilege(PrivilegeDefinition::atomic("acme:reject"))
            .build()
            .unwrap();

        assert!(provider.registry().get_privilege("acme:approve").is_ok());
        assert!(provider.registry().get_privilege("acme:reject").is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_conflicting_mount_prevents_build() {
        let err = Arbor::builder()
            .with_mount("mnt", ["/content/mnt"])
            .with_cug_parameters(CugParameters::new().with_supported_path("/content"))
            .build()
            .unwrap_err();

        assert!(matches!(err, ArborError::Cug(e) if e.is_configuration_conflict()));
    }

    #[test]
    fn test_mounts_without_scope_prevents_build() {
        let err = Arbor::builder()
            .with_mount("mnt", ["/testNode/mount"])
            .build()
            .unwrap_err();
        assert!(matches!(err, ArborError::Cug(_)));
    }

    #[test]
    fn test_invalid_mount_prevents_build() {
        let err = Arbor::builder()
            .with_mount("mnt", ["relative"])
            .with_cug_parameters(CugParameters::new().with_supported_path("/content"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ArborError::Mount(_)));
    }

    #[test]
    fn test_explicit_mount_provider() {
        let mounts: Arc<dyn MountInfoProvider> =
            Arc::new(Mounts::builder().mount("libs", ["/libs"]).build().unwrap());
        let provider = Arbor::builder()
            .with_mount_provider(Arc::clone(&mounts))
            .with_cug_parameters(CugParameters::new().with_supported_path("/content"))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(provider.mount_provider(), &mounts));
    }

    #[test]
    fn test_from_config() {
        let config = ArborConfig::from_toml_str(
            r#"
            [registry]
            allow_custom_registration = false

            [cug]
            enabled = true
            supported_paths = ["/content", "/content/site"]

            [[mounts]]
            name = "libs"
            paths = ["/libs"]

            [[privileges]]
            name = "acme:approve"
            "#,
        )
        .unwrap();

        let provider = Arbor::builder().with_config(config).build().unwrap();
        let registry = provider.registry();

        assert!(registry.get_privilege("acme:approve").is_ok());
        assert!(registry.register_custom_privilege("acme:other", false, &[]).is_err());
        assert_eq!(provider.cug().parameters().supported_paths, vec!["/content"]);
    }

    #[test]
    fn test_privilege_error_prevents_build() {
        let err = Arbor::builder()
            .with_privilege(PrivilegeDefinition::aggregate("acme:broken", ["acme:missing"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ArborError::Privilege(_)));
    }
}
