use crate::core::{RepoError, Result, Value};
use crate::entity::{FieldAccess, FieldKind, FieldRead, FieldRef, find_field};
use lazy_static::lazy_static;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Sort direction for one ordering key. Ascending when unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A dotted member path resolved against an entity's static field graph.
///
/// Resolution happens once per distinct `(entity type, path)` pair and is
/// cached; extraction is a plain walk over the canonical segment names.
#[derive(Debug)]
pub struct FieldPath {
    entity: &'static str,
    text: String,
    segments: Vec<&'static str>,
}

lazy_static! {
    static ref PATH_CACHE: Mutex<LruCache<(TypeId, String), Arc<FieldPath>>> =
        Mutex::new(LruCache::new(NonZeroUsize::new(256).unwrap()));
}

impl FieldPath {
    /// Resolve `path` against `E`'s field graph.
    ///
    /// Splits on `.`, matches the first segment against `E` and each later
    /// segment against the previous segment's nested graph, case-insensitive.
    /// Any segment that does not name a member fails with
    /// [`RepoError::FieldResolution`] here, before the query runs.
    pub fn resolve<E: FieldAccess + 'static>(path: &str) -> Result<Arc<FieldPath>> {
        let key = (TypeId::of::<E>(), path.to_ascii_lowercase());
        if let Ok(mut cache) = PATH_CACHE.lock()
            && let Some(found) = cache.get(&key)
        {
            return Ok(Arc::clone(found));
        }

        let resolved = Arc::new(Self::resolve_uncached::<E>(path)?);
        tracing::trace!(entity = E::entity_name(), path, "resolved sort field path");
        if let Ok(mut cache) = PATH_CACHE.lock() {
            cache.put(key, Arc::clone(&resolved));
        }
        Ok(resolved)
    }

    fn resolve_uncached<E: FieldAccess>(path: &str) -> Result<FieldPath> {
        let unresolved = || RepoError::FieldResolution {
            entity: E::entity_name(),
            field: path.to_string(),
        };

        let mut defs = E::fields();
        let mut segments = Vec::new();
        let raw: Vec<&str> = path.split('.').collect();
        let last = raw.len() - 1;

        for (i, segment) in raw.iter().enumerate() {
            let def = find_field(defs, segment.trim()).ok_or_else(unresolved)?;
            segments.push(def.name);
            match def.kind {
                FieldKind::Scalar => {
                    // A scalar member has no members of its own.
                    if i != last {
                        return Err(unresolved());
                    }
                }
                FieldKind::Nested(nested) => defs = nested(),
            }
        }

        Ok(FieldPath {
            entity: E::entity_name(),
            text: path.to_string(),
            segments,
        })
    }

    /// Extract the sort key this path names from a live record.
    ///
    /// Absent optional members anywhere along the path extract as
    /// [`Value::Null`], which sorts last under an ascending order.
    pub fn extract(&self, record: &dyn FieldRead) -> Value {
        let mut current = record;
        let last = self.segments.len() - 1;
        for (i, segment) in self.segments.iter().enumerate() {
            match current.field(segment) {
                Some(FieldRef::Value(value)) => {
                    return if i == last { value } else { Value::Null };
                }
                Some(FieldRef::Nested(next)) => {
                    if i == last {
                        return Value::Null;
                    }
                    current = next;
                }
                None => return Value::Null,
            }
        }
        Value::Null
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of member hops the path resolves through.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

/// One ordering key over `E`: the typed accessor produced by path
/// resolution plus its direction.
pub struct OrderStep<E> {
    pub(crate) key: Arc<dyn Fn(&E) -> Value + Send + Sync>,
    pub(crate) direction: SortDirection,
}

impl<E> std::fmt::Debug for OrderStep<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStep")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<E> Clone for OrderStep<E> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            direction: self.direction,
        }
    }
}

impl<E: FieldAccess + Send + Sync + 'static> OrderStep<E> {
    pub(crate) fn resolve(field: &str, direction: SortDirection) -> Result<Self> {
        let path = FieldPath::resolve::<E>(field)?;
        Ok(Self {
            key: Arc::new(move |entity: &E| path.extract(entity)),
            direction,
        })
    }
}
