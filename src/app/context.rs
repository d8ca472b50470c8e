use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsError, Result};
use crate::cache::RequestCache;
use crate::config::Config;
use crate::fetcher::{ArticleSource, MockSource, NewsApiClient};
use crate::news::{NewsStore, StickyFilters};
use crate::store::{CommentsStore, SavedArticlesStore, SharedStorage, SqliteStorage};

/// Every store the application uses, created once at startup and dropped on
/// exit. Collection stores are hydrated on construction.
pub struct AppContext {
    pub storage: Option<SharedStorage>,
    pub source: Arc<dyn ArticleSource + Send + Sync>,
    pub cache: RequestCache,
    pub news: NewsStore,
    pub favorites: SavedArticlesStore,
    pub likes: SavedArticlesStore,
    pub comments: CommentsStore,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let storage: Option<SharedStorage> = if config.storage.headless {
            None
        } else {
            let db_path = match &config.storage.path {
                Some(p) => p.clone(),
                None => Self::default_db_path()?,
            };
            Some(Arc::new(SqliteStorage::new(&db_path)?))
        };

        let source: Arc<dyn ArticleSource + Send + Sync> = if config.api.mock {
            tracing::info!("Using mock article source");
            Arc::new(MockSource::new())
        } else {
            if config.api.api_key.is_none() {
                tracing::warn!("No API key configured; requests will likely be rejected");
            }
            Arc::new(NewsApiClient::new(&config.api)?)
        };

        let filters = StickyFilters {
            country: config.defaults.country.clone(),
            page_size: config.defaults.page_size,
            ..Default::default()
        };

        Ok(Self::assemble(source, storage, filters))
    }

    /// Mock source with nothing kept on disk.
    pub fn in_memory() -> Self {
        Self::with_source(Arc::new(MockSource::new()), None)
    }

    pub fn with_source(
        source: Arc<dyn ArticleSource + Send + Sync>,
        storage: Option<SharedStorage>,
    ) -> Self {
        Self::assemble(source, storage, StickyFilters::default())
    }

    fn assemble(
        source: Arc<dyn ArticleSource + Send + Sync>,
        storage: Option<SharedStorage>,
        filters: StickyFilters,
    ) -> Self {
        let ctx = Self {
            cache: RequestCache::new(source.clone()),
            news: NewsStore::with_filters(source.clone(), filters),
            favorites: SavedArticlesStore::favorites(storage.clone()),
            likes: SavedArticlesStore::likes(storage.clone()),
            comments: CommentsStore::new(storage.clone()),
            storage,
            source,
        };

        ctx.favorites.hydrate();
        ctx.likes.hydrate();
        ctx.comments.hydrate();
        ctx
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsError::Config("Could not find data directory".into()))?;
        let newsdesk_dir = data_dir.join("newsdesk");
        std::fs::create_dir_all(&newsdesk_dir)?;
        Ok(newsdesk_dir.join("newsdesk.db"))
    }
}
