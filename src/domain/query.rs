use serde::{Deserialize, Serialize};

use crate::domain::Article;

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SORT_BY: &str = "publishedAt";

/// Response payload of both source operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total_results: u64,
}

impl ArticlePage {
    pub fn new(articles: Vec<Article>, total_results: u64) -> Self {
        Self {
            articles,
            total_results,
        }
    }
}

/// Parameters of the `/top-headlines` endpoint. Empty strings are omitted
/// from the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesQuery {
    pub country: String,
    pub query: String,
    pub category: String,
    pub sources: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for HeadlinesQuery {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            query: String::new(),
            category: String::new(),
            sources: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HeadlinesQuery {
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "q", &self.query);
        push_non_empty(&mut pairs, "country", &self.country);
        push_non_empty(&mut pairs, "category", &self.category);
        push_non_empty(&mut pairs, "sources", &self.sources);
        pairs.push(("page", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }
}

/// Parameters of the `/everything` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EverythingQuery {
    pub query: String,
    pub search_in: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub language: Option<String>,
    pub sort_by: String,
    pub domains: String,
    pub exclude_domains: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for EverythingQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_in: String::new(),
            from: None,
            to: None,
            language: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            domains: String::new(),
            exclude_domains: String::new(),
            page: 1,
            page_size: DEFAULT_SEARCH_PAGE_SIZE,
        }
    }
}

impl EverythingQuery {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Default::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "q", &self.query);
        push_non_empty(&mut pairs, "searchIn", &self.search_in);
        push_non_empty(&mut pairs, "from", self.from.as_deref().unwrap_or(""));
        push_non_empty(&mut pairs, "to", self.to.as_deref().unwrap_or(""));
        push_non_empty(&mut pairs, "language", self.language.as_deref().unwrap_or(""));
        push_non_empty(&mut pairs, "sortBy", &self.sort_by);
        push_non_empty(&mut pairs, "domains", &self.domains);
        push_non_empty(&mut pairs, "excludeDomains", &self.exclude_domains);
        pairs.push(("page", self.page.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));
        pairs
    }
}

fn push_non_empty(pairs: &mut Vec<(&'static str, String)>, name: &'static str, value: &str) {
    if !value.is_empty() {
        pairs.push((name, value.to_string()));
    }
}
