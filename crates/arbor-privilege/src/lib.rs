//! Arbor Privilege System
//!
//! This crate provides the privilege catalog for the Arbor access-control
//! layer. Privileges are named permission units. Some are atomic, others
//! are aggregates defined as the union of other privileges, and the
//! universal privilege `jcr:all` aggregates every registered privilege.
//!
//! # Model
//!
//! - Every atomic privilege owns one bit position; every privilege is
//!   encoded as the [`PrivilegeBits`] of the atomic privileges it covers
//! - Aggregates may only reference privileges that already exist, so the
//!   aggregation graph is acyclic by construction
//! - Closures are computed once at registration, never at lookup time
//! - The registry is published as immutable snapshots; registration is
//!   serialized and swaps in a new snapshot atomically
//!
//! # Usage
//!
//! ```
//! use arbor_privilege::prelude::*;
//!
//! let registry = PrivilegeRegistry::with_defaults()?;
//!
//! let write = registry.bits_of("jcr:write")?;
//! let add_child = registry.bits_of("jcr:addChildNodes")?;
//! assert!(write.includes(&add_child));
//!
//! registry.register_custom_privilege("acme:approve", false, &[])?;
//! registry.register_custom_privilege("acme:release", false, &["acme:approve", "jcr:write"])?;
//!
//! let release = registry.get_privilege("acme:release")?;
//! assert!(registry.universal()?.bits().includes(release.bits()));
//! # Ok::<(), PrivilegeError>(())
//! ```

pub mod bits;
pub mod builtin;
pub mod config;
pub mod error;
pub mod graph;
pub mod name;
pub mod privilege;
pub mod registry;
pub mod store;

// Re-export main types
pub use bits::{BitAllocator, PrivilegeBits};
pub use config::RegistryConfig;
pub use error::{PrivilegeError, PrivilegeResult};
pub use graph::{PrivilegeGraph, ResolvedAggregates};
pub use name::PrivilegeName;
pub use privilege::{Privilege, PrivilegeDefinition, PrivilegeKind, SharedPrivilege};
pub use registry::PrivilegeRegistry;
pub use store::{MemoryPrivilegeStore, PrivilegeStore};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bits::PrivilegeBits;
    pub use crate::config::RegistryConfig;
    pub use crate::error::{PrivilegeError, PrivilegeResult};
    pub use crate::name::PrivilegeName;
    pub use crate::privilege::{Privilege, PrivilegeDefinition};
    pub use crate::registry::PrivilegeRegistry;
    pub use crate::store::{MemoryPrivilegeStore, PrivilegeStore};
}
