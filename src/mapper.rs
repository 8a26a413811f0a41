use crate::core::Result;

/// Projection of an entity into a caller-facing result shape.
///
/// A failed projection surfaces as [`crate::RepoError::Mapping`] and aborts
/// the enclosing page or list operation; there are no partial pages.
pub trait MapTo<R> {
    fn map_to(&self) -> Result<R>;
}

/// Absorption of an external representation into an entity. Implementations
/// pick the members to absorb; identity and audit fields normally stay with
/// the entity.
pub trait MapFrom<S> {
    fn map_from(&mut self, source: &S);
}
