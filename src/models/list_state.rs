use crate::store::Query;
use crate::store::query::CREATED_AT;

use super::Page;

/// Rows per page on the management screens.
pub const DEFAULT_PER_PAGE: u32 = 5;
const MAX_PER_PAGE: u32 = 100;

/// Pagination and search state of a management list.
///
/// Transitions return a new value; the current state is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
        }
    }
}

impl ListState {
    /// Build from raw request parameters.
    pub fn from_params(page: Option<u32>, per_page: Option<u32>, search: Option<&str>) -> Self {
        let state = Self {
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
            ..Self::default()
        };
        state.with_search(search).with_page(page.unwrap_or(1))
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// A new search term always starts again from the first page.
    pub fn with_search(&self, term: Option<&str>) -> Self {
        let search = term.map(str::trim).filter(|t| !t.is_empty()).map(String::from);
        Self {
            page: 1,
            search,
            ..self.clone()
        }
    }

    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn to_query(&self, search_attribute: &str) -> Query {
        let query = Query::new()
            .order_desc(CREATED_AT)
            .limit(self.per_page)
            .offset(self.offset());
        match &self.search {
            Some(term) => query.search(search_attribute, term),
            None => query,
        }
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.per_page))
    }

    pub fn page_of<T>(&self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages: self.total_pages(total),
        }
    }
}
