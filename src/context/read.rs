use super::store::StoreHandle;
use crate::core::{RepoError, Result};
use crate::entity::Entity;
use crate::query::Query;

/// Read-only connection over the store.
///
/// Hands out untracked snapshots and rejects every commit attempt with
/// [`RepoError::ReadOnlyViolation`], synchronous and asynchronous shapes
/// alike. For mutation use [`super::WriteContext`].
pub struct ReadContext {
    store: StoreHandle,
}

impl ReadContext {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Untracked queryable over every committed row of `E`.
    pub fn get_queryable<E: Entity>(&self) -> Result<Query<E>> {
        Ok(Query::from_rows(self.store.read()?.snapshot::<E>()))
    }

    /// Always fails: this connection forbids commits rather than silently
    /// degrading them to a no-op.
    pub fn save_changes(&self) -> Result<usize> {
        Err(RepoError::ReadOnlyViolation)
    }

    /// Always fails, before any state change.
    ///
    /// # Examples
    ///
    /// ```
    /// use repokit::{ReadContext, StoreHandle};
    ///
    /// # tokio_test::block_on(async {
    /// let ctx = ReadContext::new(StoreHandle::new());
    /// assert!(ctx.save_changes_async().await.is_err());
    /// # });
    /// ```
    pub async fn save_changes_async(&self) -> Result<usize> {
        Err(RepoError::ReadOnlyViolation)
    }
}
