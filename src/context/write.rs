use super::store::{MemStore, StoreHandle};
use crate::core::Result;
use crate::entity::{AuditTimestamps, Entity, Identifiable, Identifier};
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::sync::Mutex;

/// Pending state of a staged entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    Added,
    Modified,
}

/// Type-erased staged change. The audit hook inspects entries through this
/// trait; commit consumes them.
trait PendingOp: Send {
    fn state(&self) -> ChangeState;
    fn audit_mut(&mut self) -> Option<&mut dyn AuditTimestamps>;
    fn apply(self: Box<Self>, store: &mut MemStore);
}

struct StagedChange<E: Entity> {
    entity: E,
    state: ChangeState,
    apply: fn(E, ChangeState, &mut MemStore),
}

impl<E: Entity> PendingOp for StagedChange<E> {
    fn state(&self) -> ChangeState {
        self.state
    }

    fn audit_mut(&mut self) -> Option<&mut dyn AuditTimestamps> {
        self.entity.audit_mut()
    }

    fn apply(self: Box<Self>, store: &mut MemStore) {
        (self.apply)(self.entity, self.state, store)
    }
}

/// Apply a staged change whose identifier the caller assigned.
///
/// The entity replaces the stored row with the matching identifier and is
/// appended when none matches, whatever its staged state, so a committed
/// identifier stays unique. On a replace the stored creation time is copied
/// over the incoming one first, so a caller mutation of the in-memory
/// creation field never reaches the store.
fn apply_caller_assigned<E>(mut entity: E, _state: ChangeState, store: &mut MemStore)
where
    E: Entity + Identifiable,
{
    let rows = store.rows_mut::<E>();
    match rows.iter_mut().find(|row| row.id() == entity.id()) {
        Some(existing) => {
            let stored_create = existing.audit().and_then(|a| a.create_date());
            if let Some(audit) = entity.audit_mut() {
                audit.set_create_date(stored_create);
            }
            *existing = entity;
        }
        None => rows.push(entity),
    }
}

/// Same as [`apply_caller_assigned`], plus store-side identity assignment
/// for empty-id inserts of sequence-capable key types.
fn apply_sequenced<E>(mut entity: E, state: ChangeState, store: &mut MemStore)
where
    E: Entity + Identifiable,
    E::Id: Identifier,
{
    if state == ChangeState::Added
        && entity.id().is_empty()
        && let Some(id) = E::Id::from_sequence(store.next_sequence())
    {
        entity.set_id(id);
    }
    apply_caller_assigned(entity, state, store);
}

/// Write connection: the sole mutation path over the store.
///
/// Staged inserts and updates accumulate in an explicit pending list; a
/// single commit stamps audit timestamps and applies every entry in staging
/// order. One write context belongs to one logical unit of work; its
/// pending set is not meant to be fed from multiple execution contexts.
pub struct WriteContext {
    pub(crate) store: StoreHandle,
    pending: Mutex<Vec<Box<dyn PendingOp>>>,
    clock: fn() -> DateTime<Utc>,
}

impl WriteContext {
    pub fn new(store: StoreHandle) -> Self {
        Self::with_clock(store, Utc::now)
    }

    /// Write context with an injected clock. Test seam for the timestamp
    /// invariants.
    pub fn with_clock(store: StoreHandle, clock: fn() -> DateTime<Utc>) -> Self {
        Self {
            store,
            pending: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Mutable collection handle for `E`, staging into this context.
    pub fn writable<E: Entity + Identifiable>(&self) -> Writable<'_, E> {
        Writable {
            ctx: self,
            _entity: PhantomData,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn stage<E: Entity>(
        &self,
        entity: E,
        state: ChangeState,
        apply: fn(E, ChangeState, &mut MemStore),
    ) -> Result<()> {
        let mut pending = self.pending.lock()?;
        pending.push(Box::new(StagedChange {
            entity,
            state,
            apply,
        }));
        Ok(())
    }

    /// Commit every staged change.
    ///
    /// Runs the audit lifecycle hook first, then applies the pending list to
    /// the store in staging order under one write lock, so stamped values
    /// land in the same unit of work. Returns the number of applied changes.
    pub fn save_changes(&self) -> Result<usize> {
        let mut drained: Vec<Box<dyn PendingOp>> = {
            let mut pending = self.pending.lock()?;
            pending.drain(..).collect()
        };

        self.stamp_audit_entries(&mut drained);

        let applied = drained.len();
        if applied > 0 {
            let mut store = self.store.write()?;
            for op in drained {
                op.apply(&mut store);
            }
        }
        tracing::debug!(applied, "write context committed");
        Ok(applied)
    }

    /// Asynchronous commit shape. Identical pipeline; cancellation is the
    /// caller dropping the future before the store boundary.
    pub async fn save_changes_async(&self) -> Result<usize> {
        self.save_changes()
    }

    /// Audit lifecycle hook.
    ///
    /// One `now` snapshot covers the whole invocation, so every entity
    /// committed in this unit of work carries identical timestamps. Added
    /// entries get creation and update time; modified entries get update
    /// time only (their stored creation time survives at apply). Without
    /// audit-tracked entries this never samples the clock.
    fn stamp_audit_entries(&self, entries: &mut [Box<dyn PendingOp>]) {
        let mut now: Option<DateTime<Utc>> = None;
        let mut stamped = 0usize;

        for entry in entries.iter_mut() {
            let state = entry.state();
            let Some(audit) = entry.audit_mut() else {
                continue;
            };
            let instant = *now.get_or_insert_with(self.clock);
            if state == ChangeState::Added {
                audit.set_create_date(Some(instant));
            }
            audit.set_update_date(Some(instant));
            stamped += 1;
        }

        if stamped > 0 {
            tracing::debug!(stamped, "audit hook stamped pending entities");
        }
    }
}

/// Staging handle for one entity type on a write context.
///
/// The upsert operations live in [`crate::repository::upsert`]; this type
/// only exposes the explicit insert/update staging primitives.
pub struct Writable<'a, E: Entity + Identifiable> {
    pub(crate) ctx: &'a WriteContext,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity + Identifiable> Writable<'a, E> {
    /// Stage a change of a caller-assigned-identifier entity.
    pub(crate) fn stage_caller_assigned(&self, entity: E, state: ChangeState) -> Result<()> {
        self.ctx.stage(entity, state, apply_caller_assigned::<E>)
    }
}

impl<'a, E> Writable<'a, E>
where
    E: Entity + Identifiable,
    E::Id: Identifier,
{
    /// Stage an insert. The store assigns an identity to an empty-id row of
    /// a sequence-capable key type at commit.
    pub fn add(&self, entity: E) -> Result<()> {
        self.ctx.stage(entity, ChangeState::Added, apply_sequenced::<E>)
    }

    /// Stage an update of an already-persisted entity.
    pub fn update(&self, entity: E) -> Result<()> {
        self.ctx
            .stage(entity, ChangeState::Modified, apply_sequenced::<E>)
    }
}
