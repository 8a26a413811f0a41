use crate::context::write::{ChangeState, Writable};
use crate::core::Result;
use crate::entity::{Entity, Identifiable, Identifier};

impl<'a, E> Writable<'a, E>
where
    E: Entity + Identifiable,
    E::Id: Identifier,
{
    /// Resolve insert vs. update from identifier emptiness and stage the
    /// entity accordingly. An empty identifier (zero, blank string) means
    /// "not yet persisted" and resolves to an insert; anything else to an
    /// update. Staging only; nothing commits until `save_changes`.
    pub fn create_or_update(&self, entity: E) -> Result<ChangeState> {
        if entity.id().is_empty() {
            self.add(entity)?;
            Ok(ChangeState::Added)
        } else {
            self.update(entity)?;
            Ok(ChangeState::Modified)
        }
    }

    /// Resolve each entity independently, in order. A batch is a sequence of
    /// independent resolutions, not a transaction boundary: element `i`
    /// never depends on the outcome of element `i - 1`.
    pub fn create_or_update_list(
        &self,
        entities: impl IntoIterator<Item = E>,
    ) -> Result<Vec<ChangeState>> {
        entities
            .into_iter()
            .map(|entity| self.create_or_update(entity))
            .collect()
    }
}

impl<'a, E> Writable<'a, E>
where
    E: Entity + Identifiable,
{
    /// Upsert resolution for caller-assigned identifiers of opaque
    /// comparable types, where the zero-value convention does not apply.
    ///
    /// Costs one untracked lookup against committed rows: a match resolves
    /// to update, no match to insert. Not interchangeable with
    /// [`Writable::create_or_update`]; this path exists for key types that
    /// have no "empty" value.
    pub fn find_create_or_update(&self, entity: E) -> Result<ChangeState> {
        let found = {
            let store = self.ctx.store.read()?;
            store.rows::<E>().iter().any(|row| row.id() == entity.id())
        };

        let state = if found {
            ChangeState::Modified
        } else {
            ChangeState::Added
        };
        self.stage_caller_assigned(entity, state)?;
        Ok(state)
    }

    pub async fn find_create_or_update_async(&self, entity: E) -> Result<ChangeState> {
        self.find_create_or_update(entity)
    }
}
