pub mod upsert;

use crate::context::{ReadContext, Writable, WriteContext};
use crate::core::{RepoError, Result};
use crate::entity::{Entity, Identifiable};
use crate::query::{Pagination, Query};
use async_trait::async_trait;

/// Reusable CRUD-by-identifier surface over one read and one write
/// connection.
///
/// Concrete repositories supply the two contexts and override [`filter`]
/// with entity-specific predicates; everything else is provided. Both
/// contexts live for one logical unit of work.
///
/// [`filter`]: Repository::filter
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Entity + Identifiable;

    fn read_context(&self) -> &ReadContext;
    fn write_context(&self) -> &WriteContext;

    /// Entity-specific predicate hook applied before sort and pagination.
    /// Identity by default.
    fn filter(&self, query: Query<Self::Entity>, _pagination: &Pagination) -> Query<Self::Entity> {
        query
    }

    /// Read-only, untracked queryable over the repository's entity.
    fn get_queryable(&self) -> Result<Query<Self::Entity>> {
        self.read_context().get_queryable()
    }

    /// Read-only queryable over another entity type, for ad hoc
    /// cross-entity reads.
    fn get_queryable_of<T: Entity>(&self) -> Result<Query<T>> {
        self.read_context().get_queryable()
    }

    /// Mutable collection handle staging into the write connection.
    fn get_writable(&self) -> Writable<'_, Self::Entity> {
        self.write_context().writable()
    }

    fn get_writable_of<T: Entity + Identifiable>(&self) -> Writable<'_, T> {
        self.write_context().writable()
    }

    /// The canonical "must exist" guard: a fetched entity that resolved to
    /// absent fails with [`RepoError::EntityNotFound`].
    fn validate_entity(&self, entity: Option<Self::Entity>) -> Result<Self::Entity> {
        entity.ok_or(RepoError::EntityNotFound)
    }

    /// Guard for the incoming identifier-bearing reference itself: absent
    /// input fails with [`RepoError::RequiredField`], a distinct code from
    /// "not found" so callers can tell bad input from missing data.
    fn validate_identifiable<'i, I>(&self, identifiable: Option<&'i I>) -> Result<&'i I>
    where
        I: Identifiable<Id = <Self::Entity as Identifiable>::Id> + Sync,
    {
        identifiable.ok_or(RepoError::RequiredField("Id"))
    }

    /// Validate the reference and fetch by its identifier, tolerating an
    /// absent entity.
    fn get_by_identifiable<I>(&self, identifiable: Option<&I>) -> Result<Option<Self::Entity>>
    where
        I: Identifiable<Id = <Self::Entity as Identifiable>::Id> + Sync,
    {
        let identifiable = self.validate_identifiable(identifiable)?;
        Ok(self.get_queryable()?.get(identifiable.id()))
    }

    /// The common lookup-or-fail pattern: validate the reference, fetch,
    /// validate presence.
    fn get_by_identifiable_and_validate<I>(&self, identifiable: Option<&I>) -> Result<Self::Entity>
    where
        I: Identifiable<Id = <Self::Entity as Identifiable>::Id> + Sync,
    {
        let identifiable = self.validate_identifiable(identifiable)?;
        let entity = self.get_queryable()?.get(identifiable.id());
        self.validate_entity(entity)
    }

    async fn get_by_identifiable_async<I>(
        &self,
        identifiable: Option<&I>,
    ) -> Result<Option<Self::Entity>>
    where
        I: Identifiable<Id = <Self::Entity as Identifiable>::Id> + Sync,
    {
        self.get_by_identifiable(identifiable)
    }

    async fn get_by_identifiable_and_validate_async<I>(
        &self,
        identifiable: Option<&I>,
    ) -> Result<Self::Entity>
    where
        I: Identifiable<Id = <Self::Entity as Identifiable>::Id> + Sync,
    {
        self.get_by_identifiable_and_validate(identifiable)
    }

    /// Commit staged changes on the write connection; the audit lifecycle
    /// hook runs first.
    fn save_changes(&self) -> Result<usize> {
        self.write_context().save_changes()
    }

    async fn save_changes_async(&self) -> Result<usize> {
        self.write_context().save_changes_async().await
    }
}
