use crate::core::Result;
use crate::entity::Entity;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory backing store: one typed table per entity type.
///
/// This is the layer's store collaborator. It knows nothing about
/// repositories, staging, or audit stamping; it holds committed rows and a
/// single identity sequence for store-assigned keys.
pub struct MemStore {
    tables: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    sequence: u64,
}

struct Table<E> {
    rows: Vec<E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            sequence: 0,
        }
    }

    fn table<E: Entity>(&self) -> Option<&Table<E>> {
        self.tables
            .get(&TypeId::of::<E>())
            .and_then(|t| t.downcast_ref::<Table<E>>())
    }

    fn table_mut<E: Entity>(&mut self) -> &mut Table<E> {
        self.tables
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Table::<E>::default()))
            .downcast_mut::<Table<E>>()
            .expect("table type keyed by TypeId")
    }

    /// Untracked snapshot of every committed row of `E`.
    pub fn snapshot<E: Entity>(&self) -> Vec<E> {
        self.table::<E>().map_or_else(Vec::new, |t| t.rows.clone())
    }

    /// Committed rows of `E`, if the table exists.
    pub fn rows<E: Entity>(&self) -> &[E] {
        self.table::<E>().map_or(&[], |t| t.rows.as_slice())
    }

    pub fn rows_mut<E: Entity>(&mut self) -> &mut Vec<E> {
        &mut self.table_mut::<E>().rows
    }

    /// Next identity value. Starts at 1; 0 stays reserved as the universal
    /// "not yet persisted" marker.
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle over one store. Read and write contexts over the same
/// logical database clone this handle; lock poisoning surfaces as
/// [`crate::RepoError::Lock`].
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<MemStore>>,
}

impl StoreHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemStore::new())),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, MemStore>> {
        Ok(self.inner.read()?)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, MemStore>> {
        Ok(self.inner.write()?)
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}
