use crate::core::Value;

/// Shape of one member in an entity's field graph.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Leaf member producing a sortable [`Value`].
    Scalar,
    /// Member holding a nested record; the function returns the nested graph.
    Nested(fn() -> &'static [FieldDef]),
}

/// One member of an entity's static field graph.
///
/// The sort engine resolves dotted field paths against these definitions
/// before any query executes, so an unknown member fails at
/// sort-application time rather than during materialization.
#[derive(Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn nested(name: &'static str, fields: fn() -> &'static [FieldDef]) -> Self {
        Self {
            name,
            kind: FieldKind::Nested(fields),
        }
    }
}

/// Case-insensitive member lookup within one field graph level.
pub fn find_field<'a>(defs: &'a [FieldDef], name: &str) -> Option<&'a FieldDef> {
    defs.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

/// A field read from a live record: either a leaf value or a nested record
/// that the path walk descends into.
pub enum FieldRef<'a> {
    Value(Value),
    Nested(&'a dyn FieldRead),
}

/// Object-safe runtime field access by member name.
///
/// `field` receives the canonical member name from the resolved path, so
/// implementations match on exact names. Absent optional members report
/// `Some(FieldRef::Value(Value::Null))`, while `None` means "no such member".
pub trait FieldRead {
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;
}

/// Static field graph for a record type, consumed by path resolution.
pub trait FieldAccess: FieldRead {
    /// Entity name used in field-resolution error messages.
    fn entity_name() -> &'static str
    where
        Self: Sized;

    fn fields() -> &'static [FieldDef]
    where
        Self: Sized;
}
