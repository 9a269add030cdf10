//! The privilege registry.
//!
//! The registry is built once from the built-in privileges and whatever
//! custom definitions its store holds, then published as an immutable
//! [`PrivilegeGraph`] snapshot. Lookups clone the current snapshot handle
//! and never wait on a registration in progress. Registration works on a
//! private copy of the graph and swaps it in with a single assignment, so
//! readers see either the old or the new universal privilege, never a mix.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::bits::PrivilegeBits;
use crate::builtin;
use crate::config::RegistryConfig;
use crate::error::{PrivilegeError, PrivilegeResult};
use crate::graph::PrivilegeGraph;
use crate::name::PrivilegeName;
use crate::privilege::{PrivilegeDefinition, SharedPrivilege};
use crate::store::{MemoryPrivilegeStore, PrivilegeStore};

/// Catalog of built-in and custom privileges.
///
/// # Example
///
/// ```
/// use arbor_privilege::{PrivilegeRegistry, builtin};
///
/// let registry = PrivilegeRegistry::with_defaults().unwrap();
///
/// let write = registry.get_privilege("jcr:write").unwrap();
/// assert!(write.is_aggregate());
///
/// let approve = registry
///     .register_custom_privilege("acme:approve", false, &[])
///     .unwrap();
/// let all = registry.aggregate_privileges(builtin::JCR_ALL.as_str()).unwrap();
/// assert!(all.contains(&approve));
/// ```
pub struct PrivilegeRegistry {
    config: RegistryConfig,
    current: RwLock<Arc<PrivilegeGraph>>,
    /// Serializes registrations.
    registration: Mutex<()>,
    store: Arc<dyn PrivilegeStore>,
}

impl PrivilegeRegistry {
    /// Create a registry with an empty in-memory store.
    pub fn new(config: RegistryConfig) -> PrivilegeResult<Self> {
        Self::with_store(config, Arc::new(MemoryPrivilegeStore::new()))
    }

    /// Create a registry with default configuration.
    pub fn with_defaults() -> PrivilegeResult<Self> {
        Self::new(RegistryConfig::default())
    }

    /// Create a registry backed by `store`.
    ///
    /// Built-ins are registered first, then every stored definition. Stored
    /// definitions are taken in the order the store returns them, except
    /// that a definition is held back until everything it aggregates is
    /// registered.
    ///
    /// # Errors
    ///
    /// Fails if the built-ins do not fit into `max_privileges`, or if a
    /// stored definition is invalid or references an unknown privilege.
    pub fn with_store(
        config: RegistryConfig,
        store: Arc<dyn PrivilegeStore>,
    ) -> PrivilegeResult<Self> {
        let mut graph = register_builtins(config.max_privileges)?;
        let builtins = graph.len();

        load_custom(&mut graph, store.load()?)?;

        info!(
            builtin = builtins,
            custom = graph.len() - builtins,
            bits_used = graph.allocator().allocated(),
            "Privilege registry initialized"
        );

        Ok(Self {
            config,
            current: RwLock::new(Arc::new(graph)),
            registration: Mutex::new(()),
            store,
        })
    }

    /// The registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The current immutable graph.
    ///
    /// Use a snapshot to answer several questions against one consistent
    /// state.
    pub fn snapshot(&self) -> Arc<PrivilegeGraph> {
        Arc::clone(&self.current.read())
    }

    /// Look up a privilege by exact name.
    ///
    /// # Errors
    ///
    /// `InvalidPrivilegeName` for an empty or malformed name and
    /// `UnknownPrivilege` for a name that is not registered. Both are
    /// access-control violations.
    pub fn get_privilege(&self, name: &str) -> PrivilegeResult<SharedPrivilege> {
        resolve(&self.snapshot(), name)
    }

    /// Every registered privilege, built-in and custom.
    ///
    /// Callers should not rely on the order.
    pub fn registered_privileges(&self) -> Vec<SharedPrivilege> {
        self.snapshot().iter().cloned().collect()
    }

    /// The directly declared members of a privilege, in declaration order.
    pub fn declared_aggregate_privileges(&self, name: &str) -> PrivilegeResult<Vec<SharedPrivilege>> {
        let graph = self.snapshot();
        let privilege = resolve(&graph, name)?;
        Ok(graph.resolve_aggregates(privilege.name())?.declared)
    }

    /// Every privilege reachable from a privilege, excluding itself.
    pub fn aggregate_privileges(&self, name: &str) -> PrivilegeResult<Vec<SharedPrivilege>> {
        let graph = self.snapshot();
        let privilege = resolve(&graph, name)?;
        let transitive = graph.resolve_aggregates(privilege.name())?.transitive;
        debug!(privilege = %privilege.name(), members = transitive.len(), "Aggregates resolved");
        Ok(transitive)
    }

    /// Whether a privilege aggregates others.
    pub fn is_aggregate(&self, name: &str) -> PrivilegeResult<bool> {
        Ok(self.get_privilege(name)?.is_aggregate())
    }

    /// The bits of a single privilege.
    pub fn bits_of(&self, name: &str) -> PrivilegeResult<PrivilegeBits> {
        Ok(self.get_privilege(name)?.bits().clone())
    }

    /// The union of the bits of several privileges.
    pub fn bits_for(&self, names: &[&str]) -> PrivilegeResult<PrivilegeBits> {
        let graph = self.snapshot();
        let mut bits = PrivilegeBits::empty();
        for name in names {
            bits.add(resolve(&graph, name)?.bits());
        }
        Ok(bits)
    }

    /// The smallest set of privilege names covering `bits`.
    pub fn privilege_names(&self, bits: &PrivilegeBits) -> BTreeSet<PrivilegeName> {
        self.snapshot().names_for_bits(bits)
    }

    /// The universal privilege.
    pub fn universal(&self) -> PrivilegeResult<SharedPrivilege> {
        self.get_privilege(builtin::JCR_ALL.as_str())
    }

    /// Number of registered privileges.
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Whether the registry is empty. It never is once built.
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Register a custom privilege by name.
    ///
    /// See [`register`](Self::register).
    pub fn register_custom_privilege(
        &self,
        name: &str,
        is_abstract: bool,
        declared_aggregates: &[&str],
    ) -> PrivilegeResult<SharedPrivilege> {
        let name = PrivilegeName::parse(name.to_string())?;
        let aggregates = declared_aggregates
            .iter()
            .map(|member| PrivilegeName::parse(member.to_string()))
            .collect::<PrivilegeResult<Vec<_>>>()?;

        self.register(PrivilegeDefinition {
            name,
            is_abstract,
            aggregates,
        })
    }

    /// Register a custom privilege.
    ///
    /// The new privilege is appended to the declared members of the
    /// universal privilege, whose existing members are kept.
    ///
    /// # Errors
    ///
    /// - `RegistrationDenied` if registration is disabled or the store
    ///   refuses the definition
    /// - `InvalidPrivilegeName` for malformed names or reserved namespaces
    /// - `DuplicateName`, `UnknownPrivilege`, `CapacityExceeded` as for
    ///   [`PrivilegeGraph::add_node`]
    /// - `CyclicAggregation` if the universal privilege is declared
    /// - `RedundantAggregate` if an existing aggregate has the same bits
    ///
    /// On error the registry is left unchanged.
    pub fn register(&self, definition: PrivilegeDefinition) -> PrivilegeResult<SharedPrivilege> {
        if !self.config.allow_custom_registration {
            warn!(privilege = %definition.name, "Custom privilege registration is disabled");
            return Err(PrivilegeError::RegistrationDenied(
                "custom privilege registration is disabled".to_string(),
            ));
        }

        let _guard = self.registration.lock();

        let mut next = PrivilegeGraph::clone(&self.snapshot());
        let privilege = add_custom(&mut next, &definition).inspect_err(|e| {
            warn!(privilege = %definition.name, error = %e, "Privilege registration rejected");
        })?;

        self.store.persist(&privilege.definition())?;
        *self.current.write() = Arc::new(next);

        info!(
            privilege = %privilege.name(),
            aggregate = privilege.is_aggregate(),
            bits = %privilege.bits(),
            "Custom privilege registered"
        );
        Ok(privilege)
    }
}

impl fmt::Debug for PrivilegeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.snapshot();
        f.debug_struct("PrivilegeRegistry")
            .field("config", &self.config)
            .field("privileges", &graph.len())
            .field("bits_used", &graph.allocator().allocated())
            .finish()
    }
}

fn resolve(graph: &PrivilegeGraph, name: &str) -> PrivilegeResult<SharedPrivilege> {
    PrivilegeName::check(name)?;
    graph
        .get(name)
        .cloned()
        .ok_or_else(|| PrivilegeError::UnknownPrivilege(name.to_string()))
}

/// Built-in atomics in fixed order, then aggregates, then the universal
/// privilege over every top-level built-in.
fn register_builtins(capacity: u32) -> PrivilegeResult<PrivilegeGraph> {
    let mut graph = PrivilegeGraph::new(capacity);
    for definition in builtin::definitions() {
        graph.add_node(&definition)?;
    }

    let top_level = graph.top_level(&builtin::JCR_ALL);
    graph.add_node(&PrivilegeDefinition::aggregate(builtin::JCR_ALL, top_level))?;
    Ok(graph)
}

fn add_custom(
    graph: &mut PrivilegeGraph,
    definition: &PrivilegeDefinition,
) -> PrivilegeResult<SharedPrivilege> {
    let name = &definition.name;
    name.validate()?;

    if graph.contains(name) {
        return Err(PrivilegeError::DuplicateName(name.clone()));
    }
    if builtin::is_reserved(name) {
        return Err(PrivilegeError::invalid_name(
            name.as_str(),
            "namespace is reserved for built-in privileges",
        ));
    }
    if definition.aggregates.contains(&builtin::JCR_ALL) {
        return Err(PrivilegeError::CyclicAggregation {
            name: name.clone(),
            aggregate: builtin::JCR_ALL,
        });
    }

    let privilege = graph.add_node(definition)?;

    if privilege.is_aggregate() {
        let existing = graph
            .iter()
            .find(|p| p.is_aggregate() && p.name() != name && p.bits() == privilege.bits());
        if let Some(existing) = existing {
            return Err(PrivilegeError::RedundantAggregate {
                name: name.clone(),
                existing: existing.name().clone(),
            });
        }
    }

    // A new privilege is always top-level: nothing can declare it yet.
    let mut declared = graph
        .require(&builtin::JCR_ALL)?
        .declared_aggregate_names()
        .to_vec();
    declared.push(name.clone());
    graph.relink(&builtin::JCR_ALL, &declared)?;
    Ok(privilege)
}

fn load_custom(
    graph: &mut PrivilegeGraph,
    mut pending: Vec<PrivilegeDefinition>,
) -> PrivilegeResult<()> {
    while !pending.is_empty() {
        let (ready, blocked): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|def| def.aggregates.iter().all(|member| graph.contains(member)));

        if ready.is_empty() {
            let missing = blocked
                .iter()
                .flat_map(|def| &def.aggregates)
                .find(|member| !graph.contains(member))
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(PrivilegeError::UnknownPrivilege(missing));
        }

        for definition in &ready {
            let privilege = add_custom(graph, definition)?;
            debug!(privilege = %privilege.name(), "Stored privilege loaded");
        }
        pending = blocked;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::Privilege;
    use std::collections::HashSet;

    fn names(privileges: &[SharedPrivilege]) -> BTreeSet<String> {
        privileges.iter().map(|p| p.name().to_string()).collect()
    }

    fn atomic_union(privileges: &[SharedPrivilege]) -> PrivilegeBits {
        PrivilegeBits::union_all(
            privileges
                .iter()
                .filter(|p| !p.is_aggregate())
                .map(|p| p.bits()),
        )
    }

    #[test]
    fn test_builtin_all_aggregates() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let aggregates = registry.aggregate_privileges("jcr:all").unwrap();

        let expected: BTreeSet<String> = [
            "jcr:read",
            "jcr:addChildNodes",
            "jcr:removeChildNodes",
            "jcr:modifyProperties",
            "jcr:removeNode",
            "jcr:readAccessControl",
            "jcr:modifyAccessControl",
            "jcr:lifecycleManagement",
            "jcr:lockManagement",
            "jcr:nodeTypeManagement",
            "jcr:retentionManagement",
            "jcr:versionManagement",
            "jcr:write",
            "rep:write",
            "rep:addProperties",
            "rep:alterProperties",
            "rep:removeProperties",
            "jcr:namespaceManagement",
            "jcr:nodeTypeDefinitionManagement",
            "jcr:workspaceManagement",
            "rep:privilegeManagement",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        assert_eq!(names(&aggregates), expected);
    }

    #[test]
    fn test_all_has_no_self_membership() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let all = registry.universal().unwrap();

        let declared = registry.declared_aggregate_privileges("jcr:all").unwrap();
        let aggregates = registry.aggregate_privileges("jcr:all").unwrap();

        assert!(!declared.contains(&all));
        assert!(!aggregates.contains(&all));
        for p in &declared {
            assert!(aggregates.contains(p));
        }
    }

    #[test]
    fn test_all_declares_top_level_builtins() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let declared = names(&registry.declared_aggregate_privileges("jcr:all").unwrap());

        assert_eq!(declared.len(), 12);
        assert!(declared.contains("rep:write"));
        assert!(declared.contains("jcr:read"));
        assert!(!declared.contains("jcr:write"));
        assert!(!declared.contains("jcr:nodeTypeManagement"));
    }

    #[test]
    fn test_builtin_bit_positions_are_stable() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        for (position, name) in builtin::ATOMIC.iter().enumerate() {
            let p = registry.get_privilege(name.as_str()).unwrap();
            assert_eq!(p.bit(), Some(position as u32), "{name}");
        }
    }

    #[test]
    fn test_atomic_bits_unique_and_singleton() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let mut seen = HashSet::new();
        for p in registry.registered_privileges() {
            if let Some(bit) = p.bit() {
                assert_eq!(p.bits().len(), 1);
                assert!(seen.insert(bit), "bit {bit} assigned twice");
            }
        }
        assert_eq!(seen.len(), builtin::ATOMIC.len());
    }

    #[test]
    fn test_aggregate_bits_equal_atomic_closure() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        for p in registry.registered_privileges() {
            if p.is_aggregate() {
                let closure = registry.aggregate_privileges(p.name().as_str()).unwrap();
                assert_eq!(p.bits(), &atomic_union(&closure), "{}", p.name());
            }
        }
    }

    #[test]
    fn test_registered_privileges_are_all_plus_members() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let registered = names(&registry.registered_privileges());
        let mut expected = names(&registry.aggregate_privileges("jcr:all").unwrap());
        expected.insert("jcr:all".to_string());
        assert_eq!(registered, expected);
    }

    #[test]
    fn test_get_privilege_from_name() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();

        let read = registry.get_privilege("jcr:read").unwrap();
        assert_eq!(read.name().as_str(), "jcr:read");
        assert!(!read.is_aggregate());

        let write = registry.get_privilege("jcr:write").unwrap();
        assert!(write.is_aggregate());
        assert!(registry.is_aggregate("rep:write").unwrap());
    }

    #[test]
    fn test_get_privilege_invalid_names() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();

        let empty = registry.get_privilege("").unwrap_err();
        assert!(matches!(empty, PrivilegeError::InvalidPrivilegeName { .. }));

        for unknown in ["unknown", "unknown:name"] {
            let err = registry.get_privilege(unknown).unwrap_err();
            assert!(matches!(err, PrivilegeError::UnknownPrivilege(_)));
            assert!(err.is_access_control_violation());
        }
        assert!(empty.is_access_control_violation());
    }

    #[test]
    fn test_aggregate_privileges_idempotent() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let first = registry.aggregate_privileges("rep:write").unwrap();
        let second = registry.aggregate_privileges("rep:write").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_register_custom_round_trip() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let before = registry.universal().unwrap();

        let registered = registry
            .register_custom_privilege("acme:approve", true, &[])
            .unwrap();
        let fetched = registry.get_privilege("acme:approve").unwrap();

        assert_eq!(fetched, registered);
        assert_eq!(
            fetched.definition(),
            PrivilegeDefinition::atomic("acme:approve").with_abstract(true)
        );

        let all = registry.universal().unwrap();
        assert!(all.aggregates(fetched.name()));
        assert!(all.bits().includes(before.bits()));
        assert!(all.bits().includes(fetched.bits()));
        assert!(
            registry
                .aggregate_privileges("jcr:all")
                .unwrap()
                .contains(&fetched)
        );
    }

    #[test]
    fn test_registration_extends_all_declared_aggregates() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let before = names(&registry.declared_aggregate_privileges("jcr:all").unwrap());

        registry
            .register_custom_privilege("acme:approve", false, &[])
            .unwrap();
        let reader = registry
            .register_custom_privilege("acme:reader", false, &["jcr:read", "jcr:lockManagement"])
            .unwrap();
        let release = registry
            .register_custom_privilege("acme:release", false, &["acme:approve", "jcr:write"])
            .unwrap();

        let declared = registry.declared_aggregate_privileges("jcr:all").unwrap();
        let after = names(&declared);
        assert!(before.is_subset(&after));
        assert_eq!(after.len(), before.len() + 3);
        assert!(after.contains("jcr:read"));
        assert!(after.contains("jcr:lockManagement"));
        assert!(after.contains("acme:approve"));

        // Appended in registration order after the built-ins.
        let tail: Vec<String> = declared[before.len()..]
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(tail, ["acme:approve", "acme:reader", "acme:release"]);

        let all = registry.universal().unwrap();
        assert!(all.bits().includes(reader.bits()));
        assert!(all.bits().includes(release.bits()));

        let closure = registry.aggregate_privileges("jcr:all").unwrap();
        assert_eq!(all.bits(), &atomic_union(&closure));
        assert_eq!(closure.len(), registry.len() - 1);
    }

    #[test]
    fn test_all_covers_every_atomic_after_registration() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        registry
            .register_custom_privilege("acme:a", false, &[])
            .unwrap();
        registry
            .register_custom_privilege("acme:b", false, &["acme:a", "jcr:write"])
            .unwrap();

        let all = registry.universal().unwrap();
        let every_atomic: PrivilegeBits = atomic_union(&registry.registered_privileges());
        assert_eq!(all.bits(), &every_atomic);
    }

    #[test]
    fn test_register_rejections_leave_registry_unchanged() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();
        let before = registry.snapshot();

        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("jcr:read", vec![]),
            ("jcr:mine", vec![]),
            ("acme:x", vec!["acme:missing"]),
            ("acme:y", vec!["jcr:all"]),
            ("acme:z", vec!["jcr:write"]),
            ("", vec![]),
        ];
        for (name, declared) in cases {
            assert!(
                registry
                    .register_custom_privilege(name, false, &declared)
                    .is_err(),
                "{name} should be rejected"
            );
        }

        let after = registry.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_register_error_kinds() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();

        assert!(matches!(
            registry.register_custom_privilege("jcr:read", false, &[]),
            Err(PrivilegeError::DuplicateName(_))
        ));
        assert!(matches!(
            registry.register_custom_privilege("rep:custom", false, &[]),
            Err(PrivilegeError::InvalidPrivilegeName { .. })
        ));
        assert!(matches!(
            registry.register_custom_privilege("acme:x", false, &["acme:missing"]),
            Err(PrivilegeError::UnknownPrivilege(_))
        ));
        assert!(matches!(
            registry.register_custom_privilege("acme:y", false, &["jcr:all"]),
            Err(PrivilegeError::CyclicAggregation { .. })
        ));
        assert!(matches!(
            registry.register_custom_privilege("acme:z", false, &["rep:addProperties", "rep:alterProperties", "rep:removeProperties"]),
            Err(PrivilegeError::RedundantAggregate { .. })
        ));
    }

    #[test]
    fn test_capacity_exceeded_on_custom() {
        let config = RegistryConfig::new().with_max_privileges(builtin::ATOMIC.len() as u32 + 1);
        let registry = PrivilegeRegistry::new(config).unwrap();

        registry
            .register_custom_privilege("acme:one", false, &[])
            .unwrap();
        let err = registry
            .register_custom_privilege("acme:two", false, &[])
            .unwrap_err();
        assert!(matches!(err, PrivilegeError::CapacityExceeded { .. }));
        assert!(registry.get_privilege("acme:two").is_err());
    }

    #[test]
    fn test_builtins_must_fit() {
        let config = RegistryConfig::new().with_max_privileges(4);
        assert!(matches!(
            PrivilegeRegistry::new(config),
            Err(PrivilegeError::CapacityExceeded { capacity: 4 })
        ));
    }

    #[test]
    fn test_registration_disabled() {
        let registry = PrivilegeRegistry::new(RegistryConfig::read_only()).unwrap();
        let err = registry
            .register_custom_privilege("acme:approve", false, &[])
            .unwrap_err();
        assert!(matches!(err, PrivilegeError::RegistrationDenied(_)));
        assert!(err.is_access_control_violation());
    }

    #[test]
    fn test_store_refusal_publishes_nothing() {
        let store = Arc::new(MemoryPrivilegeStore::new().into_read_only());
        let registry = PrivilegeRegistry::with_store(RegistryConfig::default(), store).unwrap();

        let err = registry
            .register_custom_privilege("acme:approve", false, &[])
            .unwrap_err();
        assert!(matches!(err, PrivilegeError::RegistrationDenied(_)));
        assert!(registry.get_privilege("acme:approve").is_err());
        assert!(!registry.universal().unwrap().aggregates(&"acme:approve".into()));
    }

    #[test]
    fn test_registration_persists_definition() {
        let store = Arc::new(MemoryPrivilegeStore::new());
        let registry =
            PrivilegeRegistry::with_store(RegistryConfig::default(), store.clone()).unwrap();

        registry
            .register_custom_privilege("acme:approve", false, &[])
            .unwrap();
        assert_eq!(
            store.get(&"acme:approve".into()),
            Some(PrivilegeDefinition::atomic("acme:approve"))
        );
    }

    #[test]
    fn test_load_from_store_orders_dependencies() {
        let store = MemoryPrivilegeStore::with_definitions([
            PrivilegeDefinition::aggregate("acme:release", ["acme:approve", "acme:publish"]),
            PrivilegeDefinition::atomic("acme:publish"),
            PrivilegeDefinition::atomic("acme:approve"),
        ]);
        let registry =
            PrivilegeRegistry::with_store(RegistryConfig::default(), Arc::new(store)).unwrap();

        let release = registry.get_privilege("acme:release").unwrap();
        assert_eq!(release.bits().len(), 2);
        assert!(registry.universal().unwrap().aggregates(release.name()));
    }

    #[test]
    fn test_load_from_store_unknown_reference() {
        let store = MemoryPrivilegeStore::with_definitions([PrivilegeDefinition::aggregate(
            "acme:release",
            ["acme:missing"],
        )]);
        let err = PrivilegeRegistry::with_store(RegistryConfig::default(), Arc::new(store))
            .unwrap_err();
        assert!(matches!(err, PrivilegeError::UnknownPrivilege(n) if n == "acme:missing"));
    }

    fn custom_bits(registry: &PrivilegeRegistry) -> Vec<(String, Vec<u32>)> {
        registry
            .registered_privileges()
            .iter()
            .filter(|p| !builtin::is_reserved(p.name()))
            .map(|p| (p.name().to_string(), p.bits().positions().collect()))
            .collect()
    }

    #[test]
    fn test_equal_stores_yield_equal_bits() {
        let definitions: Vec<PrivilegeDefinition> = (0..16)
            .map(|i| PrivilegeDefinition::atomic(format!("acme:p{i:02}")))
            .chain([PrivilegeDefinition::aggregate(
                "acme:bundle",
                ["acme:p03", "acme:p11"],
            )])
            .collect();

        let layouts: Vec<_> = (0..5)
            .map(|_| {
                let store = MemoryPrivilegeStore::with_definitions(definitions.clone());
                let registry =
                    PrivilegeRegistry::with_store(RegistryConfig::default(), Arc::new(store))
                        .unwrap();
                custom_bits(&registry)
            })
            .collect();

        for layout in &layouts[1..] {
            assert_eq!(layout, &layouts[0]);
        }
        let first = registry_bit(&layouts[0], "acme:p00");
        assert_eq!(first, vec![builtin::ATOMIC.len() as u32]);
    }

    fn registry_bit(layout: &[(String, Vec<u32>)], name: &str) -> Vec<u32> {
        layout
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bits)| bits.clone())
            .unwrap()
    }

    #[test]
    fn test_restart_from_store_keeps_bits() {
        let store = Arc::new(MemoryPrivilegeStore::new());
        let registry =
            PrivilegeRegistry::with_store(RegistryConfig::default(), store.clone()).unwrap();
        for name in ["acme:zeta", "acme:alpha", "acme:mid"] {
            registry.register_custom_privilege(name, false, &[]).unwrap();
        }
        registry
            .register_custom_privilege("acme:pair", false, &["acme:zeta", "acme:mid"])
            .unwrap();
        registry
            .register_custom_privilege("acme:omega", false, &[])
            .unwrap();

        let restarted =
            PrivilegeRegistry::with_store(RegistryConfig::default(), store).unwrap();
        assert_eq!(custom_bits(&restarted), custom_bits(&registry));
        assert_eq!(
            names(&restarted.declared_aggregate_privileges("jcr:all").unwrap()),
            names(&registry.declared_aggregate_privileges("jcr:all").unwrap())
        );
    }

    #[test]
    fn test_bits_and_names() {
        let registry = PrivilegeRegistry::with_defaults().unwrap();

        let write = registry.bits_of("jcr:write").unwrap();
        let read = registry.bits_of("jcr:read").unwrap();
        let both = registry.bits_for(&["jcr:write", "jcr:read"]).unwrap();
        assert_eq!(both, write.union(&read));

        let names = registry.privilege_names(&both);
        assert_eq!(
            names,
            BTreeSet::from([builtin::JCR_READ, builtin::JCR_WRITE])
        );

        let all = registry.universal().unwrap();
        assert_eq!(
            registry.privilege_names(all.bits()),
            BTreeSet::from([builtin::JCR_ALL])
        );
    }

    #[test]
    fn test_concurrent_readers_see_consistent_universal() {
        let registry = Arc::new(PrivilegeRegistry::with_defaults().unwrap());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let graph = registry.snapshot();
                        let all: &Privilege = graph.get("jcr:all").unwrap();
                        let closure = graph.resolve_aggregates(all.name()).unwrap().transitive;
                        assert_eq!(all.bits(), &atomic_union(&closure));
                        assert_eq!(closure.len(), graph.len() - 1);
                    }
                });
            }

            for i in 0..20 {
                registry
                    .register_custom_privilege(&format!("acme:p{i}"), false, &[])
                    .unwrap();
            }
        });

        assert_eq!(registry.universal().unwrap().bits().len(), builtin::ATOMIC.len() + 20);
    }
}
