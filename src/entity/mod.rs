pub mod fields;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use fields::{FieldAccess, FieldDef, FieldKind, FieldRead, FieldRef, find_field};

/// Base capability of any identifier type: cloneable, comparable for
/// equality, and shareable across threads. Caller-assigned opaque key types
/// (UUIDs and the like) satisfy this without implementing [`Identifier`];
/// they go through the lookup-based upsert path instead of the zero-value
/// convention.
pub trait EntityId: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> EntityId for T {}

/// Identifier family with zero-value "not yet persisted" semantics.
///
/// An empty identifier universally means the entity has never been committed;
/// the store must never hand out an empty value as a persisted identifier.
pub trait Identifier: EntityId {
    fn is_empty(&self) -> bool;

    /// Identity value the store assigns to an empty-id insert. `None` for
    /// key types the store does not generate (strings are caller-assigned).
    fn from_sequence(_sequence: u64) -> Option<Self> {
        None
    }
}

impl Identifier for i16 {
    fn is_empty(&self) -> bool {
        *self == 0
    }

    fn from_sequence(sequence: u64) -> Option<Self> {
        i16::try_from(sequence).ok()
    }
}

impl Identifier for i32 {
    fn is_empty(&self) -> bool {
        *self == 0
    }

    fn from_sequence(sequence: u64) -> Option<Self> {
        i32::try_from(sequence).ok()
    }
}

impl Identifier for i64 {
    fn is_empty(&self) -> bool {
        *self == 0
    }

    fn from_sequence(sequence: u64) -> Option<Self> {
        i64::try_from(sequence).ok()
    }
}

impl Identifier for String {
    /// Null/empty/all-whitespace all read as "not yet persisted".
    fn is_empty(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Anything carrying a declared identifier: persisted entities as well as
/// incoming identifier-bearing references.
pub trait Identifiable {
    type Id: EntityId;

    fn id(&self) -> &Self::Id;

    /// Store-side identity assignment writes generated keys back through
    /// this setter.
    fn set_id(&mut self, id: Self::Id);
}

/// Audit capability: creation and last-update instants maintained by the
/// write pipeline. Creation time is set exactly once, at the first committed
/// insert, and survives every later update regardless of what the caller
/// put in the in-memory field.
pub trait AuditTimestamps {
    fn create_date(&self) -> Option<DateTime<Utc>>;
    fn set_create_date(&mut self, value: Option<DateTime<Utc>>);
    fn update_date(&self) -> Option<DateTime<Utc>>;
    fn set_update_date(&mut self, value: Option<DateTime<Utc>>);
}

/// Embeddable audit field pair. Concrete entities compose the capability by
/// embedding a stamp and delegating [`AuditTimestamps`] to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub create_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
}

impl AuditTimestamps for AuditStamp {
    fn create_date(&self) -> Option<DateTime<Utc>> {
        self.create_date
    }

    fn set_create_date(&mut self, value: Option<DateTime<Utc>>) {
        self.create_date = value;
    }

    fn update_date(&self) -> Option<DateTime<Utc>> {
        self.update_date
    }

    fn set_update_date(&mut self, value: Option<DateTime<Utc>>) {
        self.update_date = value;
    }
}

/// A storable record.
///
/// The audit capability is opt-in: the commit hook type-tests through
/// `audit`/`audit_mut` instead of requiring a common ancestor, so entity
/// types declare which capabilities they carry.
pub trait Entity: Clone + Send + Sync + 'static {
    fn audit(&self) -> Option<&dyn AuditTimestamps> {
        None
    }

    fn audit_mut(&mut self) -> Option<&mut dyn AuditTimestamps> {
        None
    }
}
