//! Built-in privileges.
//!
//! The atomic built-ins are registered in the order of [`ATOMIC`], which
//! fixes their bit positions. Reordering this list changes the meaning of
//! persisted bit-encoded entries.

use crate::name::PrivilegeName;
use crate::privilege::PrivilegeDefinition;

/// Read nodes and properties.
pub const JCR_READ: PrivilegeName = PrivilegeName::from_static("jcr:read");
/// Add properties to a node.
pub const REP_ADD_PROPERTIES: PrivilegeName = PrivilegeName::from_static("rep:addProperties");
/// Change existing property values.
pub const REP_ALTER_PROPERTIES: PrivilegeName = PrivilegeName::from_static("rep:alterProperties");
/// Remove properties from a node.
pub const REP_REMOVE_PROPERTIES: PrivilegeName =
    PrivilegeName::from_static("rep:removeProperties");
/// Add child nodes.
pub const JCR_ADD_CHILD_NODES: PrivilegeName = PrivilegeName::from_static("jcr:addChildNodes");
/// Remove child nodes.
pub const JCR_REMOVE_CHILD_NODES: PrivilegeName =
    PrivilegeName::from_static("jcr:removeChildNodes");
/// Remove the node itself.
pub const JCR_REMOVE_NODE: PrivilegeName = PrivilegeName::from_static("jcr:removeNode");
/// Read access-control content.
pub const JCR_READ_ACCESS_CONTROL: PrivilegeName =
    PrivilegeName::from_static("jcr:readAccessControl");
/// Modify access-control content.
pub const JCR_MODIFY_ACCESS_CONTROL: PrivilegeName =
    PrivilegeName::from_static("jcr:modifyAccessControl");
/// Change primary and mixin node types.
pub const JCR_NODE_TYPE_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:nodeTypeManagement");
/// Version operations.
pub const JCR_VERSION_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:versionManagement");
/// Lock and unlock nodes.
pub const JCR_LOCK_MANAGEMENT: PrivilegeName = PrivilegeName::from_static("jcr:lockManagement");
/// Lifecycle transitions.
pub const JCR_LIFECYCLE_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:lifecycleManagement");
/// Holds and retention policies.
pub const JCR_RETENTION_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:retentionManagement");
/// Create and delete workspaces.
pub const JCR_WORKSPACE_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:workspaceManagement");
/// Register node type definitions.
pub const JCR_NODE_TYPE_DEFINITION_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:nodeTypeDefinitionManagement");
/// Register namespaces.
pub const JCR_NAMESPACE_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("jcr:namespaceManagement");
/// Register custom privileges.
pub const REP_PRIVILEGE_MANAGEMENT: PrivilegeName =
    PrivilegeName::from_static("rep:privilegeManagement");

/// All property modifications.
pub const JCR_MODIFY_PROPERTIES: PrivilegeName =
    PrivilegeName::from_static("jcr:modifyProperties");
/// Content writes.
pub const JCR_WRITE: PrivilegeName = PrivilegeName::from_static("jcr:write");
/// Content writes plus node type changes.
pub const REP_WRITE: PrivilegeName = PrivilegeName::from_static("rep:write");

/// The universal privilege.
pub const JCR_ALL: PrivilegeName = PrivilegeName::from_static("jcr:all");

/// Atomic built-ins in bit-position order.
pub const ATOMIC: [PrivilegeName; 18] = [
    JCR_READ,
    REP_ADD_PROPERTIES,
    REP_ALTER_PROPERTIES,
    REP_REMOVE_PROPERTIES,
    JCR_ADD_CHILD_NODES,
    JCR_REMOVE_CHILD_NODES,
    JCR_REMOVE_NODE,
    JCR_READ_ACCESS_CONTROL,
    JCR_MODIFY_ACCESS_CONTROL,
    JCR_NODE_TYPE_MANAGEMENT,
    JCR_VERSION_MANAGEMENT,
    JCR_LOCK_MANAGEMENT,
    JCR_LIFECYCLE_MANAGEMENT,
    JCR_RETENTION_MANAGEMENT,
    JCR_WORKSPACE_MANAGEMENT,
    JCR_NODE_TYPE_DEFINITION_MANAGEMENT,
    JCR_NAMESPACE_MANAGEMENT,
    REP_PRIVILEGE_MANAGEMENT,
];

/// Namespace prefixes reserved for built-in privileges.
pub const RESERVED_PREFIXES: [&str; 6] = ["jcr", "rep", "nt", "mix", "sv", "xml"];

/// Whether a name falls in a reserved namespace.
pub fn is_reserved(name: &PrivilegeName) -> bool {
    name.prefix()
        .is_some_and(|prefix| RESERVED_PREFIXES.contains(&prefix))
}

/// Built-in definitions, atomics first and aggregates bottom-up.
///
/// The universal privilege is not included: its members depend on what
/// else is registered.
pub fn definitions() -> Vec<PrivilegeDefinition> {
    let mut definitions: Vec<_> = ATOMIC
        .iter()
        .cloned()
        .map(PrivilegeDefinition::atomic)
        .collect();

    definitions.push(PrivilegeDefinition::aggregate(
        JCR_MODIFY_PROPERTIES,
        [REP_ADD_PROPERTIES, REP_ALTER_PROPERTIES, REP_REMOVE_PROPERTIES],
    ));
    definitions.push(PrivilegeDefinition::aggregate(
        JCR_WRITE,
        [
            JCR_MODIFY_PROPERTIES,
            JCR_ADD_CHILD_NODES,
            JCR_REMOVE_CHILD_NODES,
            JCR_REMOVE_NODE,
        ],
    ));
    definitions.push(PrivilegeDefinition::aggregate(
        REP_WRITE,
        [JCR_WRITE, JCR_NODE_TYPE_MANAGEMENT],
    ));

    definitions
}
