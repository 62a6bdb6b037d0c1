use super::builder::QueryBuilder;
use super::sort::{apply_order, apply_pagination, SortDescriptor};
use crate::domain::value_objects::{Pagination, SortOrder};

/// A fully filtered list statement, not yet ordered or paged.
///
/// The count variant wraps the filtered statement as is; the page variant
/// appends ORDER BY and LIMIT/OFFSET.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filtered: QueryBuilder,
    pub sort: SortDescriptor,
    pub order: SortOrder,
    /// Primary id column, always sorted ascending after the sort column
    pub tie_breaker: &'static str,
    /// A non-indexed predicate is present
    pub ignore_index: bool,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn count_statement(&self) -> String {
        self.filtered.build_count_string()
    }

    pub fn into_page_query(self) -> QueryBuilder {
        let mut query = self.filtered;
        apply_order(&mut query, &self.sort, self.order, self.tie_breaker, self.ignore_index);
        apply_pagination(&mut query, &self.pagination);
        query
    }
}
