//! Error types for the privilege system.

use thiserror::Error;

use crate::name::PrivilegeName;

/// Errors related to privilege definitions and lookups.
#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// The supplied name is empty or malformed.
    #[error("Invalid privilege name '{name}': {reason}")]
    InvalidPrivilegeName {
        /// The offending name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// No privilege with this name is registered.
    #[error("Unknown privilege: {0}")]
    UnknownPrivilege(String),

    /// A privilege with this name already exists.
    #[error("Privilege already registered: {0}")]
    DuplicateName(PrivilegeName),

    /// All atomic bit positions are in use.
    #[error("Privilege bit capacity exceeded: at most {capacity} atomic privileges")]
    CapacityExceeded {
        /// The configured number of bit positions.
        capacity: u32,
    },

    /// The aggregation would introduce a cycle.
    #[error("Cyclic aggregation: {name} cannot aggregate {aggregate}")]
    CyclicAggregation {
        /// The privilege whose aggregation was being defined.
        name: PrivilegeName,
        /// The declared aggregate closing the cycle.
        aggregate: PrivilegeName,
    },

    /// A custom aggregate covers exactly the same privileges as an existing one.
    #[error("Aggregate privilege {name} is already covered by {existing}")]
    RedundantAggregate {
        /// The rejected aggregate.
        name: PrivilegeName,
        /// The existing aggregate with identical bits.
        existing: PrivilegeName,
    },

    /// The privilege is atomic where an aggregate was required.
    #[error("Privilege is not an aggregate: {0}")]
    NotAggregate(PrivilegeName),

    /// The repository state does not permit registering privileges.
    #[error("Privilege registration denied: {0}")]
    RegistrationDenied(String),
}

impl PrivilegeError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        PrivilegeError::InvalidPrivilegeName {
            name: name.into(),
            reason,
        }
    }

    /// Whether this error is an access-control violation.
    ///
    /// Invalid, unknown and denied privilege references all share this
    /// kind; they only differ in their message.
    pub fn is_access_control_violation(&self) -> bool {
        matches!(
            self,
            PrivilegeError::InvalidPrivilegeName { .. }
                | PrivilegeError::UnknownPrivilege(_)
                | PrivilegeError::RegistrationDenied(_)
        )
    }
}

/// Result type for privilege operations.
pub type PrivilegeResult<T> = std::result::Result<T, PrivilegeError>;
