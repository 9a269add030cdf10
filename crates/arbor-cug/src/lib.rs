//! Arbor Closed User Groups
//!
//! A closed user group (CUG) restricts read access below selected paths.
//! CUG policies may only be defined under configured supported paths, and
//! those paths must not straddle a mount boundary.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use arbor_cug::prelude::*;
//! use arbor_mount::Mounts;
//!
//! let mounts = Mounts::builder().mount("libs", ["/libs"]).build().unwrap();
//! let params = CugParameters::new()
//!     .with_enabled(true)
//!     .with_supported_path("/content");
//!
//! let configuration = CugConfiguration::new(params, Arc::new(mounts))?;
//! assert!(configuration.supported_paths().includes("/content/site"));
//! # Ok::<(), CugError>(())
//! ```

pub mod config;
pub mod configuration;
pub mod error;
pub mod supported_paths;
pub mod validator;

// Re-export main types
pub use config::CugParameters;
pub use configuration::CugConfiguration;
pub use error::{CugError, CugResult};
pub use supported_paths::SupportedPaths;
pub use validator::MountAwarePathValidator;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::CugParameters;
    pub use crate::configuration::CugConfiguration;
    pub use crate::error::{CugError, CugResult};
    pub use crate::supported_paths::SupportedPaths;
    pub use crate::validator::MountAwarePathValidator;
}
