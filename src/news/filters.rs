use crate::domain::query::{DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE};
use crate::domain::HeadlinesQuery;

/// Caller-supplied headline filters; `None` falls back to the last used
/// value.
#[derive(Debug, Clone, Default)]
pub struct HeadlineFilters {
    pub country: Option<String>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub sources: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl HeadlineFilters {
    pub fn category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..Default::default()
        }
    }
}

/// Caller-supplied search filters. Only `query`, `page` and `page_size`
/// fall back to stored values.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub search_in: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<String>,
    pub domains: Option<String>,
    pub exclude_domains: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchFilters {
    pub fn query(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            ..Default::default()
        }
    }
}

/// Filters remembered between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyFilters {
    pub country: String,
    pub category: String,
    pub sources: String,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for StickyFilters {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            category: String::new(),
            sources: String::new(),
            query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StickyFilters {
    /// Overlay `filters` on the stored values. Non-empty strings and
    /// non-zero numbers win; an explicit query wins even when empty.
    pub fn merge(&self, filters: &HeadlineFilters) -> StickyFilters {
        StickyFilters {
            country: non_empty(&filters.country).unwrap_or(self.country.as_str()).to_string(),
            category: non_empty(&filters.category).unwrap_or(self.category.as_str()).to_string(),
            sources: non_empty(&filters.sources).unwrap_or(self.sources.as_str()).to_string(),
            query: filters.query.clone().unwrap_or_else(|| self.query.clone()),
            page: non_zero(filters.page).unwrap_or(self.page),
            page_size: non_zero(filters.page_size).unwrap_or(self.page_size),
        }
    }

    pub fn to_query(&self) -> HeadlinesQuery {
        HeadlinesQuery {
            country: self.country.clone(),
            query: self.query.clone(),
            category: self.category.clone(),
            sources: self.sources.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub(crate) fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}
