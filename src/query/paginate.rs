use super::order::SortDirection;
use serde::{Deserialize, Serialize};

/// Pagination request: 1-based page, positive page size, optional sort
/// field and direction. Out-of-range inputs are clamped both in [`new`] and
/// when a request deserializes off the wire, and the windowing arithmetic
/// saturates, so a zero page or page size never reaches a division.
///
/// [`new`]: Pagination::new
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PaginationRequest")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
}

/// Unvalidated wire shape; every deserialized request converts through the
/// clamp in [`Pagination::new`].
#[derive(Deserialize)]
struct PaginationRequest {
    page: u32,
    page_size: u32,
    sort_field: Option<String>,
    #[serde(default)]
    sort_direction: SortDirection,
}

impl From<PaginationRequest> for Pagination {
    fn from(request: PaginationRequest) -> Self {
        let mut pagination = Pagination::new(request.page, request.page_size);
        pagination.sort_field = request.sort_field;
        pagination.sort_direction = request.sort_direction;
        pagination
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            sort_field: None,
            sort_direction: SortDirection::Ascending,
        }
    }

    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    /// Rows to skip: `(page - 1) * page_size`. Saturates, so a literal with
    /// `page: 0` reads as the first page.
    pub fn skip(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.page_size as usize
    }

    /// Total page count: `ceil(total_count / page_size)`, 0 for an empty set.
    /// A zero page size in a hand-built literal counts as 1.
    pub fn page_count(&self, total_count: usize) -> u32 {
        total_count.div_ceil(self.page_size.max(1) as usize) as u32
    }
}

/// One page of mapped results plus the metadata needed to reconstruct the
/// full result set across repeated calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total_count: usize,
}

impl<T> PaginatedList<T> {
    pub fn new(
        items: Vec<T>,
        page: u32,
        page_size: u32,
        page_count: u32,
        total_count: usize,
    ) -> Self {
        Self {
            items,
            page,
            page_size,
            page_count,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
