// ============================================================================
// repokit - generic repository layer over a composable queryable store
// ============================================================================

pub mod context;
pub mod core;
pub mod entity;
pub mod mapper;
pub mod query;
pub mod repository;

// Re-export main types for convenience
pub use self::core::{RepoError, Result, Value};

pub use context::{ChangeState, MemStore, ReadContext, StoreHandle, Writable, WriteContext};
pub use entity::{
    AuditStamp, AuditTimestamps, Entity, EntityId, FieldAccess, FieldDef, FieldKind, FieldRead,
    FieldRef, Identifiable, Identifier,
};
pub use mapper::{MapFrom, MapTo};
pub use query::{FieldPath, PaginatedList, Pagination, Query, SortDirection};
pub use repository::Repository;
