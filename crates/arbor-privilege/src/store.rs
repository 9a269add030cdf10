//! Storage of custom privilege definitions.
//!
//! The registry never performs I/O itself. It loads custom definitions from
//! a [`PrivilegeStore`] at startup and hands each newly registered
//! definition to the store before publishing it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::{PrivilegeError, PrivilegeResult};
use crate::name::PrivilegeName;
use crate::privilege::PrivilegeDefinition;

/// Durable home of custom privilege definitions.
pub trait PrivilegeStore: Send + Sync + fmt::Debug {
    /// Every stored custom definition, in the order it was persisted.
    ///
    /// Custom atomic privileges receive their bit positions in this order,
    /// so it must be the same on every load.
    fn load(&self) -> PrivilegeResult<Vec<PrivilegeDefinition>>;

    /// Persist a newly registered definition.
    ///
    /// Returning an error aborts the registration.
    fn persist(&self, definition: &PrivilegeDefinition) -> PrivilegeResult<()>;
}

/// In-memory privilege store.
///
/// Definitions are kept with an insertion sequence so that loading
/// replays them in persistence order.
#[derive(Debug, Default)]
pub struct MemoryPrivilegeStore {
    definitions: DashMap<PrivilegeName, (u64, PrivilegeDefinition)>,
    sequence: AtomicU64,
    read_only: bool,
}

impl MemoryPrivilegeStore {
    /// Create an empty, writable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writable store holding the given definitions, in order.
    ///
    /// A repeated name replaces the earlier definition.
    pub fn with_definitions(definitions: impl IntoIterator<Item = PrivilegeDefinition>) -> Self {
        let store = Self::new();
        for definition in definitions {
            let seq = store.next_sequence();
            store
                .definitions
                .insert(definition.name.clone(), (seq, definition));
        }
        store
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Forbid further writes.
    pub fn into_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Number of stored definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Get a stored definition.
    pub fn get(&self, name: &PrivilegeName) -> Option<PrivilegeDefinition> {
        self.definitions.get(name).map(|r| r.value().1.clone())
    }
}

impl PrivilegeStore for MemoryPrivilegeStore {
    fn load(&self) -> PrivilegeResult<Vec<PrivilegeDefinition>> {
        let mut stored: Vec<(u64, PrivilegeDefinition)> =
            self.definitions.iter().map(|r| r.value().clone()).collect();
        stored.sort_by_key(|(seq, _)| *seq);
        Ok(stored.into_iter().map(|(_, definition)| definition).collect())
    }

    fn persist(&self, definition: &PrivilegeDefinition) -> PrivilegeResult<()> {
        if self.read_only {
            return Err(PrivilegeError::RegistrationDenied(
                "privilege store is read-only".to_string(),
            ));
        }
        match self.definitions.entry(definition.name.clone()) {
            Entry::Occupied(_) => {
                return Err(PrivilegeError::DuplicateName(definition.name.clone()));
            }
            Entry::Vacant(slot) => {
                slot.insert((self.next_sequence(), definition.clone()));
            }
        }
        debug!(privilege = %definition.name, "Privilege definition stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_and_load() {
        let store = MemoryPrivilegeStore::new();
        store
            .persist(&PrivilegeDefinition::atomic("acme:approve"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
        assert!(store.get(&"acme:approve".into()).is_some());
    }

    #[test]
    fn test_persist_duplicate() {
        let store =
            MemoryPrivilegeStore::with_definitions([PrivilegeDefinition::atomic("acme:approve")]);
        let err = store
            .persist(&PrivilegeDefinition::atomic("acme:approve"))
            .unwrap_err();
        assert!(matches!(err, PrivilegeError::DuplicateName(_)));
    }

    #[test]
    fn test_read_only_store_denies() {
        let store = MemoryPrivilegeStore::new().into_read_only();
        let err = store
            .persist(&PrivilegeDefinition::atomic("acme:approve"))
            .unwrap_err();
        assert!(err.is_access_control_violation());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_follows_persistence_order() {
        let names = ["acme:e", "acme:b", "acme:d", "acme:a", "acme:c"];
        let store = MemoryPrivilegeStore::with_definitions(
            names[..2].iter().map(|n| PrivilegeDefinition::atomic(*n)),
        );
        for name in &names[2..] {
            store.persist(&PrivilegeDefinition::atomic(*name)).unwrap();
        }

        let loaded: Vec<String> = store
            .load()
            .unwrap()
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(loaded, names);
    }
}
