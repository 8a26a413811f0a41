pub mod order;
pub mod paginate;

pub use order::{FieldPath, OrderStep, SortDirection};
pub use paginate::{PaginatedList, Pagination};

use crate::core::{Result, Value};
use crate::entity::{Entity, FieldAccess, Identifiable};
use crate::mapper::MapTo;
use futures::Stream;
use futures::stream;
use std::cmp::Ordering;

/// Untracked, composable query over a snapshot of one entity collection.
///
/// Filtering applies eagerly; ordering is held as a list of `(path,
/// direction)` keys and applied as a single stable multi-key sort when the
/// query materializes, so chained secondary keys never override an earlier
/// pair's ordering. All operations are pure transformations: nothing here
/// mutates the underlying store.
#[derive(Debug)]
pub struct Query<E> {
    rows: Vec<E>,
    order: Vec<OrderStep<E>>,
    skip: Option<usize>,
    take: Option<usize>,
}

impl<E: Entity> Query<E> {
    pub fn from_rows(rows: Vec<E>) -> Self {
        Self {
            rows,
            order: Vec::new(),
            skip: None,
            take: None,
        }
    }

    /// Keep only rows matching the predicate.
    pub fn filter(mut self, predicate: impl Fn(&E) -> bool) -> Self {
        self.rows.retain(|row| predicate(row));
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(self.skip.unwrap_or(0) + n);
        self
    }

    pub fn take(mut self, n: usize) -> Self {
        self.take = Some(self.take.map_or(n, |t| t.min(n)));
        self
    }

    /// Number of rows the query would materialize.
    pub fn count(&self) -> usize {
        let after_skip = self.rows.len().saturating_sub(self.skip.unwrap_or(0));
        self.take.map_or(after_skip, |t| after_skip.min(t))
    }

    pub async fn count_async(&self) -> usize {
        self.count()
    }

    /// Materialize raw entities: stable multi-key sort, then the window.
    pub fn to_vec(self) -> Vec<E> {
        let Self {
            rows,
            order,
            skip,
            take,
        } = self;

        let rows = if order.is_empty() {
            rows
        } else {
            // Pre-extract sort keys once per row, then sort stably.
            let mut keyed: Vec<(E, Vec<Value>)> = rows
                .into_iter()
                .map(|row| {
                    let keys = order.iter().map(|step| (step.key)(&row)).collect();
                    (row, keys)
                })
                .collect();
            keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b, &order));
            keyed.into_iter().map(|(row, _)| row).collect()
        };

        let iter = rows.into_iter().skip(skip.unwrap_or(0));
        match take {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }

    pub async fn to_vec_async(self) -> Vec<E> {
        self.to_vec()
    }
}

fn compare_keys<E>(a: &[Value], b: &[Value], steps: &[OrderStep<E>]) -> Ordering {
    for (i, step) in steps.iter().enumerate() {
        let mut cmp = a[i].compare(&b[i]);
        if step.direction == SortDirection::Descending {
            cmp = cmp.reverse();
        }
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

impl<E: Entity + Identifiable> Query<E> {
    /// First row whose identifier equals `id`.
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.rows.iter().find(|row| row.id() == id).cloned()
    }

    pub async fn get_async(&self, id: &E::Id) -> Option<E> {
        self.get(id)
    }
}

impl<E: Entity + FieldAccess> Query<E> {
    /// Establish the primary ordering by `field`, ascending. Replaces any
    /// ordering already present.
    pub fn order_by(mut self, field: &str) -> Result<Self> {
        self.order = vec![OrderStep::resolve(field, SortDirection::Ascending)?];
        Ok(self)
    }

    /// Establish the primary ordering by `field`, descending.
    pub fn order_by_descending(mut self, field: &str) -> Result<Self> {
        self.order = vec![OrderStep::resolve(field, SortDirection::Descending)?];
        Ok(self)
    }

    /// Chain a strictly-secondary ascending key; earlier pairs keep priority.
    pub fn then_by(mut self, field: &str) -> Result<Self> {
        self.order
            .push(OrderStep::resolve(field, SortDirection::Ascending)?);
        Ok(self)
    }

    /// Chain a strictly-secondary descending key.
    pub fn then_by_descending(mut self, field: &str) -> Result<Self> {
        self.order
            .push(OrderStep::resolve(field, SortDirection::Descending)?);
        Ok(self)
    }

    /// Apply a comma-separated sort expression: `"field"` or `"field DESC"`
    /// tokens, whitespace-trimmed, `DESC` case-insensitive. The first token
    /// is the primary order, each later token a chained secondary. A blank
    /// expression leaves the query unchanged.
    pub fn order_using_sort_expression(self, expression: &str) -> Result<Self> {
        let mut query = self;
        let mut first = true;
        for token in expression.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let mut parts = token.split_whitespace();
            let field = parts.next().unwrap_or_default();
            let descending = parts.next().is_some_and(|d| d.eq_ignore_ascii_case("DESC"));

            query = match (first, descending) {
                (true, false) => query.order_by(field)?,
                (true, true) => query.order_by_descending(field)?,
                (false, false) => query.then_by(field)?,
                (false, true) => query.then_by_descending(field)?,
            };
            first = false;
        }
        Ok(query)
    }

    /// Order for a pagination request: the request's sort field wins
    /// exclusively when present; otherwise the supplied default field with
    /// the default direction; otherwise the query is returned unchanged
    /// (callers relying on a stable order must supply one).
    pub fn sort(
        self,
        pagination: &Pagination,
        default_field: Option<&str>,
        default_direction: SortDirection,
    ) -> Result<Self> {
        if let Some(field) = pagination.sort_field.as_deref() {
            return match pagination.sort_direction {
                SortDirection::Ascending => self.order_by(field),
                SortDirection::Descending => self.order_by_descending(field),
            };
        }
        if let Some(field) = default_field {
            return match default_direction {
                SortDirection::Ascending => self.order_by(field),
                SortDirection::Descending => self.order_by_descending(field),
            };
        }
        Ok(self)
    }
}

impl<E: Entity> Query<E> {
    /// Materialize and map every row. Bounded result sets only; a mapping
    /// failure aborts the whole list.
    pub fn get_list<R>(self) -> Result<Vec<R>>
    where
        E: MapTo<R>,
    {
        self.to_vec().iter().map(MapTo::map_to).collect()
    }

    pub async fn get_list_async<R>(self) -> Result<Vec<R>>
    where
        E: MapTo<R>,
    {
        self.get_list()
    }

    /// Stream mapped rows one at a time.
    pub fn stream<R>(self) -> impl Stream<Item = Result<R>>
    where
        E: MapTo<R>,
    {
        stream::iter(self.to_vec().into_iter().map(|row| row.map_to()))
    }

    /// Materialize one page: count the whole query, window it, map the
    /// window. A page past the end yields empty items with correct totals.
    pub fn get_paginated_list<R>(self, pagination: &Pagination) -> Result<PaginatedList<R>>
    where
        E: MapTo<R>,
    {
        let page = pagination.page;
        let page_size = pagination.page_size;

        let rows = self.to_vec();
        let total_count = rows.len();
        let page_count = pagination.page_count(total_count);

        let items = rows
            .iter()
            .skip(pagination.skip())
            .take(page_size as usize)
            .map(MapTo::map_to)
            .collect::<Result<Vec<R>>>()?;

        Ok(PaginatedList::new(
            items,
            page,
            page_size,
            page_count,
            total_count,
        ))
    }

    pub async fn get_paginated_list_async<R>(
        self,
        pagination: &Pagination,
    ) -> Result<PaginatedList<R>>
    where
        E: MapTo<R>,
    {
        self.get_paginated_list(pagination)
    }
}
