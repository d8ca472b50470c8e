//! Process-lifetime memoization of article requests.
//!
//! Each completed request is stored under its [`CacheKey`] and served from
//! memory afterwards. Entries never expire; they go away through
//! [`RequestCache::clear_cache`], [`RequestCache::clear_cache_key`] or when
//! the cache is dropped. Failures are reported and returned, never stored.
//!
//! `loading` and `error` are shared by every key. Overlapping requests
//! overwrite each other's state, and two concurrent misses on the same key
//! both reach the source.

mod key;

pub use key::CacheKey;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::app::{Result, Signal};
use crate::domain::{Article, ArticlePage, EverythingQuery, HeadlinesQuery};
use crate::fetcher::ArticleSource;
use crate::normalizer::Normalizer;

#[derive(Debug, Clone)]
enum CacheEntry {
    Page(ArticlePage),
    Article(Article),
    Related(Vec<Article>),
}

impl CacheEntry {
    fn page(&self) -> Option<ArticlePage> {
        match self {
            CacheEntry::Page(page) => Some(page.clone()),
            _ => None,
        }
    }

    fn article(&self) -> Option<Article> {
        match self {
            CacheEntry::Article(article) => Some(article.clone()),
            _ => None,
        }
    }

    fn related(&self) -> Option<Vec<Article>> {
        match self {
            CacheEntry::Related(articles) => Some(articles.clone()),
            _ => None,
        }
    }
}

pub struct RequestCache {
    source: Arc<dyn ArticleSource + Send + Sync>,
    normalizer: Normalizer,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

impl RequestCache {
    pub fn new(source: Arc<dyn ArticleSource + Send + Sync>) -> Self {
        Self {
            source,
            normalizer: Normalizer::new(),
            entries: Mutex::new(HashMap::new()),
            loading: Signal::new(false),
            error: Signal::new(None),
        }
    }

    pub async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<ArticlePage> {
        let fetch = async {
            let page = self.source.top_headlines(query).await;
            page.map(|page| self.normalizer.derive_ids(page))
        };
        self.cached(CacheKey::Headlines(query.clone()), fetch, CacheEntry::page, CacheEntry::Page)
            .await
    }

    pub async fn search(&self, query: &EverythingQuery) -> Result<ArticlePage> {
        let fetch = async {
            let page = self.source.everything(query).await;
            page.map(|page| self.normalizer.derive_ids(page))
        };
        self.cached(CacheKey::Search(query.clone()), fetch, CacheEntry::page, CacheEntry::Page)
            .await
    }

    pub async fn news_by_category(
        &self,
        category: &str,
        query: &HeadlinesQuery,
    ) -> Result<ArticlePage> {
        let key = CacheKey::Category {
            category: category.to_string(),
            query: query.clone(),
        };
        let fetch = async {
            let query = query.clone().with_category(category);
            let page = self.source.top_headlines(&query).await;
            page.map(|page| self.normalizer.derive_ids(page))
        };
        self.cached(key, fetch, CacheEntry::page, CacheEntry::Page).await
    }

    pub async fn article(&self, id: &str) -> Result<Article> {
        let fetch = async {
            let article = self.source.article(id).await;
            article.map(Article::with_derived_id)
        };
        self.cached(
            CacheKey::Article(id.to_string()),
            fetch,
            CacheEntry::article,
            CacheEntry::Article,
        )
        .await
    }

    /// Up to `limit` other headlines from the article's category. Display
    /// labels such as "Top Headlines" are not sent upstream, so those
    /// articles get unfiltered headlines.
    pub async fn related_articles(&self, article: &Article, limit: usize) -> Result<Vec<Article>> {
        let article_id = article.derive_id();
        let key = CacheKey::Related {
            article_id: article_id.clone(),
            limit,
        };

        let fetch = async {
            let category = Normalizer::api_category(article).unwrap_or_default();
            let query = HeadlinesQuery::default().with_category(category);
            let page = self.source.top_headlines(&query).await;
            page.map(|page| {
                self.normalizer
                    .derive_ids(page)
                    .articles
                    .into_iter()
                    .filter(|a| a.key() != Some(article_id.as_str()))
                    .take(limit)
                    .collect::<Vec<_>>()
            })
        };
        self.cached(key, fetch, CacheEntry::related, CacheEntry::Related)
            .await
    }

    async fn cached<T, F>(
        &self,
        key: CacheKey,
        fetch: F,
        extract: fn(&CacheEntry) -> Option<T>,
        wrap: fn(T) -> CacheEntry,
    ) -> Result<T>
    where
        T: Clone,
        F: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.entries().get(&key).and_then(extract) {
            tracing::debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        tracing::debug!("Cache miss: {}", key);
        let _loading = self.loading.raise();
        self.error.set(None);

        match fetch.await {
            Ok(value) => {
                self.entries().insert(key, wrap(value.clone()));
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Request {} failed: {}", key, e);
                self.error.set(Some(e.user_message()));
                Err(e)
            }
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear_cache(&self) {
        self.entries().clear();
    }

    /// Drop one entry; returns whether it existed.
    pub fn clear_cache_key(&self, key: &CacheKey) -> bool {
        self.entries().remove(key).is_some()
    }

    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
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
