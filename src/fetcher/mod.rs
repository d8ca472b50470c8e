pub mod http_fetcher;
pub mod mock;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, ArticlePage, EverythingQuery, HeadlinesQuery};

pub use http_fetcher::NewsApiClient;
pub use mock::MockSource;

/// Upstream provider of articles.
#[async_trait]
pub trait ArticleSource {
    /// `/top-headlines`: current headlines filtered by country, category,
    /// sources or keywords.
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<ArticlePage>;

    /// `/everything`: full-archive keyword search.
    async fn everything(&self, query: &EverythingQuery) -> Result<ArticlePage>;

    /// Look up a single article by its natural id.
    async fn article(&self, id: &str) -> Result<Article>;
}
