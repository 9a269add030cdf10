//! The privilege aggregation graph.
//!
//! Nodes are privileges, edges point from an aggregate to its declared
//! members. A node may only declare members that are already in the graph,
//! so adding nodes can never create a cycle. The only edit of an existing
//! node, [`PrivilegeGraph::relink`], checks for cycles explicitly.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::bits::{BitAllocator, PrivilegeBits};
use crate::error::{PrivilegeError, PrivilegeResult};
use crate::name::PrivilegeName;
use crate::privilege::{Privilege, PrivilegeDefinition, SharedPrivilege};

/// Declared and transitive members of a privilege.
#[derive(Debug, Clone)]
pub struct ResolvedAggregates {
    /// Directly declared members in declaration order.
    pub declared: Vec<SharedPrivilege>,
    /// Every reachable member, ordered by name.
    pub transitive: Vec<SharedPrivilege>,
}

/// Privilege definitions and their aggregation edges.
#[derive(Debug, Clone)]
pub struct PrivilegeGraph {
    nodes: HashMap<PrivilegeName, SharedPrivilege>,
    /// Registration order.
    order: Vec<PrivilegeName>,
    allocator: BitAllocator,
}

impl PrivilegeGraph {
    /// Create an empty graph with room for `capacity` atomic privileges.
    pub fn new(capacity: u32) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            allocator: BitAllocator::new(capacity),
        }
    }

    /// Insert a new privilege.
    ///
    /// Atomic privileges receive the next free bit position. Aggregates get
    /// their closure and bits computed from the already registered members.
    /// Repeated member names are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// - `InvalidPrivilegeName` if the name is malformed
    /// - `DuplicateName` if the name is already registered
    /// - `UnknownPrivilege` if a member is not registered yet
    /// - `CapacityExceeded` if no bit position is left
    pub fn add_node(&mut self, definition: &PrivilegeDefinition) -> PrivilegeResult<SharedPrivilege> {
        let name = &definition.name;
        name.validate()?;

        if self.nodes.contains_key(name) {
            return Err(PrivilegeError::DuplicateName(name.clone()));
        }

        let declared = self.check_members(&definition.aggregates)?;

        let privilege = if declared.is_empty() {
            let bit = self.allocator.allocate()?;
            Privilege::atomic(name.clone(), definition.is_abstract, bit)
        } else {
            let (aggregates, bits) = self.closure(&declared);
            Privilege::aggregate(
                name.clone(),
                definition.is_abstract,
                declared,
                aggregates,
                bits,
            )
        };

        debug!(
            privilege = %name,
            aggregate = privilege.is_aggregate(),
            bits = %privilege.bits(),
            "Privilege node added"
        );

        let privilege = Arc::new(privilege);
        self.nodes.insert(name.clone(), Arc::clone(&privilege));
        self.order.push(name.clone());
        Ok(privilege)
    }

    /// Replace the declared members of an existing aggregate.
    ///
    /// Closures and bits of the aggregate and of every aggregate containing
    /// it are recomputed.
    ///
    /// # Errors
    ///
    /// - `UnknownPrivilege` if the aggregate or a member is not registered
    /// - `NotAggregate` if the privilege is atomic or `declared` is empty
    /// - `CyclicAggregation` if a member is, or contains, the aggregate
    pub fn relink(
        &mut self,
        name: &PrivilegeName,
        declared: &[PrivilegeName],
    ) -> PrivilegeResult<SharedPrivilege> {
        let current = self.require(name)?;
        if !current.is_aggregate() || declared.is_empty() {
            return Err(PrivilegeError::NotAggregate(name.clone()));
        }

        let declared = self.check_members(declared)?;
        for member in &declared {
            let reaches_back = member == name
                || self
                    .nodes
                    .get(member)
                    .is_some_and(|node| node.aggregates(name));
            if reaches_back {
                return Err(PrivilegeError::CyclicAggregation {
                    name: name.clone(),
                    aggregate: member.clone(),
                });
            }
        }

        let (aggregates, bits) = self.closure(&declared);
        let updated = Arc::new(Privilege::aggregate(
            name.clone(),
            current.is_abstract(),
            declared,
            aggregates,
            bits,
        ));
        self.nodes.insert(name.clone(), Arc::clone(&updated));

        let dependents: Vec<SharedPrivilege> = self
            .nodes
            .values()
            .filter(|node| node.aggregates(name))
            .cloned()
            .collect();
        for dependent in dependents {
            let declared = dependent.declared_aggregate_names().to_vec();
            let (aggregates, bits) = self.closure(&declared);
            let refreshed = Privilege::aggregate(
                dependent.name().clone(),
                dependent.is_abstract(),
                declared,
                aggregates,
                bits,
            );
            self.nodes
                .insert(dependent.name().clone(), Arc::new(refreshed));
        }

        debug!(privilege = %name, bits = %updated.bits(), "Aggregate relinked");
        Ok(updated)
    }

    /// Declared and transitive members of a privilege.
    pub fn resolve_aggregates(&self, name: &PrivilegeName) -> PrivilegeResult<ResolvedAggregates> {
        let privilege = self.require(name)?;
        let declared = privilege
            .declared_aggregate_names()
            .iter()
            .map(|member| self.require(member))
            .collect::<PrivilegeResult<Vec<_>>>()?;
        let transitive = privilege
            .aggregate_names()
            .map(|member| self.require(member))
            .collect::<PrivilegeResult<Vec<_>>>()?;
        Ok(ResolvedAggregates {
            declared,
            transitive,
        })
    }

    /// Look up a privilege by name.
    pub fn get<Q>(&self, name: &Q) -> Option<&SharedPrivilege>
    where
        PrivilegeName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.get(name)
    }

    /// Look up a privilege, failing if it is not registered.
    pub fn require(&self, name: &PrivilegeName) -> PrivilegeResult<SharedPrivilege> {
        self.nodes
            .get(name)
            .cloned()
            .ok_or_else(|| PrivilegeError::UnknownPrivilege(name.to_string()))
    }

    /// Whether a privilege is registered.
    pub fn contains(&self, name: &PrivilegeName) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of registered privileges.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over privileges in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedPrivilege> + '_ {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    /// The bit allocator state.
    pub fn allocator(&self) -> &BitAllocator {
        &self.allocator
    }

    /// Privileges no other privilege declares, in registration order.
    ///
    /// `root` is left out, and its own declarations are ignored.
    pub fn top_level(&self, root: &PrivilegeName) -> Vec<PrivilegeName> {
        let declared: HashSet<&PrivilegeName> = self
            .nodes
            .values()
            .filter(|node| node.name() != root)
            .flat_map(|node| node.declared_aggregate_names())
            .collect();

        self.order
            .iter()
            .filter(|name| *name != root && !declared.contains(name))
            .cloned()
            .collect()
    }

    /// The smallest set of names whose bits together equal `bits`.
    ///
    /// An aggregate replaces its members whenever all of its bits are
    /// present. Positions that belong to no registered privilege are
    /// ignored.
    pub fn names_for_bits(&self, bits: &PrivilegeBits) -> BTreeSet<PrivilegeName> {
        let covered: Vec<&SharedPrivilege> = self
            .iter()
            .filter(|p| !p.bits().is_empty() && bits.includes(p.bits()))
            .collect();

        covered
            .iter()
            .filter(|candidate| {
                !covered
                    .iter()
                    .any(|other| other.aggregates(candidate.name()))
            })
            .map(|p| p.name().clone())
            .collect()
    }

    fn check_members(&self, members: &[PrivilegeName]) -> PrivilegeResult<Vec<PrivilegeName>> {
        let mut seen = HashSet::new();
        let mut declared = Vec::with_capacity(members.len());
        for member in members {
            if !self.nodes.contains_key(member) {
                return Err(PrivilegeError::UnknownPrivilege(member.to_string()));
            }
            if seen.insert(member) {
                declared.push(member.clone());
            }
        }
        Ok(declared)
    }

    /// Expand declared members until no new privilege is found.
    fn closure(&self, declared: &[PrivilegeName]) -> (BTreeSet<PrivilegeName>, PrivilegeBits) {
        let mut aggregates = BTreeSet::new();
        let mut bits = PrivilegeBits::empty();
        let mut pending: Vec<&PrivilegeName> = declared.iter().collect();

        while let Some(name) = pending.pop() {
            if !aggregates.insert(name.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(name) {
                if let Some(bit) = node.bit() {
                    bits.insert(bit);
                }
                pending.extend(node.declared_aggregate_names());
            }
        }

        trace!(members = aggregates.len(), bits = %bits, "Closure computed");
        (aggregates, bits)
    }
}
