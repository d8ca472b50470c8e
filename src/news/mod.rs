//! Headline and search queries with remembered filters.
//!
//! Unlike [`RequestCache`](crate::cache::RequestCache), failures here are
//! recorded in the error signal and not returned to the caller.

mod filters;

pub use filters::{HeadlineFilters, SearchFilters, StickyFilters};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::app::Signal;
use crate::domain::query::DEFAULT_SORT_BY;
use crate::domain::{Article, ArticlePage, EverythingQuery};
use crate::fetcher::ArticleSource;
use crate::normalizer::Normalizer;
use filters::{non_empty, non_zero};

#[derive(Default)]
struct NewsState {
    top_headlines: ArticlePage,
    search_results: ArticlePage,
    filters: StickyFilters,
}

pub struct NewsStore {
    source: Arc<dyn ArticleSource + Send + Sync>,
    normalizer: Normalizer,
    state: Mutex<NewsState>,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

impl NewsStore {
    pub fn new(source: Arc<dyn ArticleSource + Send + Sync>) -> Self {
        Self::with_filters(source, StickyFilters::default())
    }

    /// Start from `filters` instead of the built-in defaults.
    pub fn with_filters(source: Arc<dyn ArticleSource + Send + Sync>, filters: StickyFilters) -> Self {
        Self {
            source,
            normalizer: Normalizer::new(),
            state: Mutex::new(NewsState {
                filters,
                ..Default::default()
            }),
            loading: Signal::new(false),
            error: Signal::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, NewsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch headlines. Omitted filters reuse the previous call's values,
    /// and the merged filters are remembered on success.
    pub async fn fetch_top_headlines(&self, filters: HeadlineFilters) {
        let params = self.state().filters.merge(&filters);

        let _loading = self.loading.raise();
        self.error.set(None);

        match self.source.top_headlines(&params.to_query()).await {
            Ok(page) => {
                let page = self.normalizer.headlines(page, &params.category);
                tracing::info!(
                    "Fetched {} of {} headlines",
                    page.articles.len(),
                    page.total_results
                );
                let mut state = self.state();
                state.top_headlines = page;
                state.filters = params;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch headlines: {}", e);
                self.error.set(Some(e.user_message()));
            }
        }
    }

    /// Run a full-archive search. On success the stored page resets to the
    /// requested page, or 1.
    pub async fn search_articles(&self, filters: SearchFilters) {
        let request = {
            let state = self.state();
            EverythingQuery {
                query: non_empty(&filters.query)
                    .unwrap_or(state.filters.query.as_str())
                    .to_string(),
                search_in: filters.search_in.clone().unwrap_or_default(),
                from: filters.from.clone(),
                to: filters.to.clone(),
                language: filters.language.clone(),
                sort_by: non_empty(&filters.sort_by)
                    .unwrap_or(DEFAULT_SORT_BY)
                    .to_string(),
                domains: filters.domains.clone().unwrap_or_default(),
                exclude_domains: filters.exclude_domains.clone().unwrap_or_default(),
                page: non_zero(filters.page).unwrap_or(state.filters.page),
                page_size: non_zero(filters.page_size).unwrap_or(state.filters.page_size),
            }
        };

        let _loading = self.loading.raise();
        self.error.set(None);

        match self.source.everything(&request).await {
            Ok(page) => {
                let page = self.normalizer.search(page);
                tracing::info!(
                    "Search '{}' returned {} of {} articles",
                    request.query,
                    page.articles.len(),
                    page.total_results
                );
                let mut state = self.state();
                state.search_results = page;
                state.filters.page = non_zero(filters.page).unwrap_or(1);
            }
            Err(e) => {
                tracing::warn!("Search '{}' failed: {}", request.query, e);
                self.error.set(Some(e.user_message()));
            }
        }
    }

    pub fn top_headlines(&self) -> ArticlePage {
        self.state().top_headlines.clone()
    }

    pub fn search_results(&self) -> ArticlePage {
        self.state().search_results.clone()
    }

    pub fn filters(&self) -> StickyFilters {
        self.state().filters.clone()
    }

    pub fn has_headlines(&self) -> bool {
        !self.state().top_headlines.articles.is_empty()
    }

    pub fn has_search_results(&self) -> bool {
        !self.state().search_results.articles.is_empty()
    }

    /// Pages of headlines at the current page size.
    pub fn total_pages(&self) -> u64 {
        let state = self.state();
        page_count(state.top_headlines.total_results, state.filters.page_size)
    }

    pub fn search_total_pages(&self) -> u64 {
        let state = self.state();
        page_count(state.search_results.total_results, state.filters.page_size)
    }

    /// Headlines in `[(page - 1) * page_size, page * page_size)`, clamped to
    /// what has been fetched.
    pub fn headlines_page(&self, page: usize, page_size: usize) -> Vec<Article> {
        if page == 0 {
            return Vec::new();
        }
        let state = self.state();
        let articles = &state.top_headlines.articles;
        let start = (page - 1).saturating_mul(page_size).min(articles.len());
        let end = page.saturating_mul(page_size).min(articles.len());
        articles[start..end].to_vec()
    }

    /// Find a fetched headline or search result by id.
    pub fn find(&self, id: &str) -> Option<Article> {
        let state = self.state();
        state
            .top_headlines
            .articles
            .iter()
            .chain(state.search_results.articles.iter())
            .find(|a| a.key() == Some(id))
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}

fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockSource;
    use crate::normalizer::{SEARCHED_CATEGORY, TOP_HEADLINES_CATEGORY};

    fn store() -> (Arc<MockSource>, NewsStore) {
        let source = Arc::new(MockSource::new());
        let store = NewsStore::new(source.clone());
        (source, store)
    }

    #[tokio::test]
    async fn test_category_is_sticky() {
        let (_, store) = store();

        store.fetch_top_headlines(HeadlineFilters::category("Technology")).await;
        assert_eq!(store.filters().category, "Technology");
        assert_eq!(store.top_headlines().total_results, 2);

        store.fetch_top_headlines(HeadlineFilters::default()).await;
        assert_eq!(store.filters().category, "Technology");
        assert_eq!(store.top_headlines().total_results, 2);
        assert!(store
            .top_headlines()
            .articles
            .iter()
            .all(|a| a.category.as_deref() == Some("Technology")));
    }

    #[tokio::test]
    async fn test_headlines_get_derived_ids() {
        let (_, store) = store();
        store.fetch_top_headlines(HeadlineFilters::default()).await;

        let page = store.top_headlines();
        assert_eq!(page.articles.len(), 5);
        assert_eq!(
            page.articles[0].id.as_deref(),
            Some("TechCrunch::New developments in artificial intelligence::1705276800000")
        );
        assert_eq!(page.articles[0].category.as_deref(), Some(TOP_HEADLINES_CATEGORY));
        assert!(store.has_headlines());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failure_is_recorded_not_returned() {
        let (source, store) = store();
        store.fetch_top_headlines(HeadlineFilters::default()).await;

        source.set_failure(Some("rateLimited"));
        store.fetch_top_headlines(HeadlineFilters::category("Health")).await;

        assert_eq!(store.error().as_deref(), Some("rateLimited"));
        assert!(!store.is_loading());
        // failed calls leave results and filters alone
        assert_eq!(store.top_headlines().articles.len(), 5);
        assert_eq!(store.filters().category, "");

        source.set_failure(None);
        store.fetch_top_headlines(HeadlineFilters::default()).await;
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_search_forces_category() {
        let (_, store) = store();
        store.search_articles(SearchFilters::query("economy")).await;

        let results = store.search_results();
        assert_eq!(results.articles.len(), 1);
        assert_eq!(results.articles[0].category.as_deref(), Some(SEARCHED_CATEGORY));
        assert!(store.has_search_results());
    }

    #[tokio::test]
    async fn test_search_resets_page() {
        let (_, store) = store();
        store
            .fetch_top_headlines(HeadlineFilters {
                page: Some(3),
                page_size: Some(1),
                ..Default::default()
            })
            .await;
        assert_eq!(store.filters().page, 3);

        store.search_articles(SearchFilters::default()).await;

        let results = store.search_results();
        assert_eq!(results.articles.len(), 1);
        assert_eq!(results.articles[0].title.as_deref(), Some("Blockchain in healthcare"));
        assert_eq!(store.filters().page, 1);
    }

    #[tokio::test]
    async fn test_search_uses_stored_page_for_request() {
        let (_, store) = store();
        store
            .fetch_top_headlines(HeadlineFilters {
                page: Some(2),
                page_size: Some(2),
                ..Default::default()
            })
            .await;

        // page 2 of size 2 over all five articles
        store.search_articles(SearchFilters::default()).await;
        let ids: Vec<String> = store
            .search_results()
            .articles
            .iter()
            .map(|a| a.title.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["Blockchain in healthcare", "Robots on the factory floor"]);
        assert_eq!(store.filters().page, 1);
    }

    #[tokio::test]
    async fn test_paging_derivations() {
        let (_, store) = store();
        store
            .fetch_top_headlines(HeadlineFilters {
                page_size: Some(2),
                ..Default::default()
            })
            .await;
        // mock paginates, so only the first two are held
        assert_eq!(store.total_pages(), 3);
        assert_eq!(store.headlines_page(1, 1).len(), 1);
        assert_eq!(store.headlines_page(2, 1).len(), 1);
        assert!(store.headlines_page(3, 1).is_empty());
        assert!(store.headlines_page(0, 1).is_empty());
        assert_eq!(store.headlines_page(1, 10).len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_derived_id() {
        let (_, store) = store();
        store.fetch_top_headlines(HeadlineFilters::default()).await;

        let id = store.top_headlines().articles[2].id.clone().unwrap();
        let found = store.find(&id).unwrap();
        assert_eq!(found.title.as_deref(), Some("Blockchain in healthcare"));
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(41, 20), 3);
        assert_eq!(page_count(40, 20), 2);
        assert_eq!(page_count(10, 0), 0);
    }
}
