//! Arbor Mount Layouts
//!
//! A repository namespace can be partitioned into mounts: named subtrees
//! served by separate stores. Paths that no named mount claims belong to
//! the default mount.
//!
//! # Usage
//!
//! ```
//! use arbor_mount::prelude::*;
//!
//! let mounts = Mounts::builder()
//!     .read_only_mount("libs", ["/libs", "/apps"])
//!     .build()?;
//!
//! assert_eq!(mounts.mount_by_path("/libs/core").name(), "libs");
//! assert!(mounts.mount_by_path("/content").is_default());
//! # Ok::<(), MountError>(())
//! ```

pub mod error;
pub mod mount;
pub mod path;
pub mod provider;

// Re-export main types
pub use error::{MountError, MountResult};
pub use mount::{DEFAULT_MOUNT_NAME, Mount, MountSpec};
pub use provider::{MountInfoProvider, Mounts, MountsBuilder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MountError, MountResult};
    pub use crate::mount::{Mount, MountSpec};
    pub use crate::provider::{MountInfoProvider, Mounts};
}
