//! Privilege records and definitions.
//!
//! A [`PrivilegeDefinition`] is what callers register and what stores
//! persist. A [`Privilege`] is the resolved record held by the graph, with
//! its bit encoding and aggregation closure already computed.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bits::PrivilegeBits;
use crate::name::PrivilegeName;

/// A privilege definition as registered or persisted.
///
/// An empty `aggregates` list defines an atomic privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeDefinition {
    /// The privilege name.
    pub name: PrivilegeName,
    /// Whether the privilege is abstract.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Names of the privileges this one is directly composed from.
    #[serde(default)]
    pub aggregates: Vec<PrivilegeName>,
}

impl PrivilegeDefinition {
    /// Define an atomic privilege.
    pub fn atomic(name: impl Into<PrivilegeName>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            aggregates: Vec::new(),
        }
    }

    /// Define an aggregate privilege.
    pub fn aggregate<N: Into<PrivilegeName>>(
        name: impl Into<PrivilegeName>,
        aggregates: impl IntoIterator<Item = N>,
    ) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            aggregates: aggregates.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark the privilege as abstract.
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// Atomic or aggregate shape of a privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrivilegeKind {
    /// A privilege owning a single bit position.
    Atomic {
        /// The bit position.
        bit: u32,
    },
    /// A privilege defined as the union of other privileges.
    Aggregate {
        /// Directly declared members, in declaration order.
        declared: Vec<PrivilegeName>,
        /// Every privilege reachable through the declared members.
        aggregates: BTreeSet<PrivilegeName>,
    },
}

/// A registered privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Privilege {
    name: PrivilegeName,
    is_abstract: bool,
    kind: PrivilegeKind,
    bits: PrivilegeBits,
}

/// A shared privilege reference.
pub type SharedPrivilege = Arc<Privilege>;

impl Privilege {
    pub(crate) fn atomic(name: PrivilegeName, is_abstract: bool, bit: u32) -> Self {
        Self {
            name,
            is_abstract,
            kind: PrivilegeKind::Atomic { bit },
            bits: PrivilegeBits::singleton(bit),
        }
    }

    pub(crate) fn aggregate(
        name: PrivilegeName,
        is_abstract: bool,
        declared: Vec<PrivilegeName>,
        aggregates: BTreeSet<PrivilegeName>,
        bits: PrivilegeBits,
    ) -> Self {
        Self {
            name,
            is_abstract,
            kind: PrivilegeKind::Aggregate {
                declared,
                aggregates,
            },
            bits,
        }
    }

    /// The privilege name.
    pub fn name(&self) -> &PrivilegeName {
        &self.name
    }

    /// Whether the privilege is abstract.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The atomic or aggregate shape.
    pub fn kind(&self) -> &PrivilegeKind {
        &self.kind
    }

    /// Whether this privilege aggregates others.
    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, PrivilegeKind::Aggregate { .. })
    }

    /// The bit position of an atomic privilege.
    pub fn bit(&self) -> Option<u32> {
        match self.kind {
            PrivilegeKind::Atomic { bit } => Some(bit),
            PrivilegeKind::Aggregate { .. } => None,
        }
    }

    /// The bits of every atomic privilege this privilege covers.
    pub fn bits(&self) -> &PrivilegeBits {
        &self.bits
    }

    /// Directly declared members; empty for atomic privileges.
    pub fn declared_aggregate_names(&self) -> &[PrivilegeName] {
        match &self.kind {
            PrivilegeKind::Atomic { .. } => &[],
            PrivilegeKind::Aggregate { declared, .. } => declared,
        }
    }

    /// Every privilege reachable through the declared members.
    pub fn aggregate_names(&self) -> impl Iterator<Item = &PrivilegeName> {
        let aggregates = match &self.kind {
            PrivilegeKind::Atomic { .. } => None,
            PrivilegeKind::Aggregate { aggregates, .. } => Some(aggregates),
        };
        aggregates.into_iter().flatten()
    }

    /// Whether `name` is reachable through the declared members.
    pub fn aggregates(&self, name: &PrivilegeName) -> bool {
        match &self.kind {
            PrivilegeKind::Atomic { .. } => false,
            PrivilegeKind::Aggregate { aggregates, .. } => aggregates.contains(name),
        }
    }

    /// The definition this privilege was registered from.
    pub fn definition(&self) -> PrivilegeDefinition {
        PrivilegeDefinition {
            name: self.name.clone(),
            is_abstract: self.is_abstract,
            aggregates: self.declared_aggregate_names().to_vec(),
        }
    }
}
