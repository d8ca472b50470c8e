use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{NewsError, Result};
use crate::domain::{Article, ArticlePage, EverythingQuery, HeadlinesQuery, Source};
use crate::fetcher::ArticleSource;

/// In-process stand-in for the news API.
pub struct MockSource {
    articles: Vec<Article>,
    latency: Duration,
    requests: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::with_articles(sample_articles())
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles,
            latency: Duration::ZERO,
            requests: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Delay every response, like a real round trip would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of requests served so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make subsequent requests fail with the given API message, or succeed
    /// again with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = message.map(String::from);
        }
    }

    async fn begin(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failure = self
            .failure
            .lock()
            .map_err(|e| NewsError::Other(e.to_string()))?
            .clone();
        match failure {
            Some(message) => Err(NewsError::Api {
                status: 500,
                code: Some("unexpectedError".into()),
                message: Some(message),
            }),
            None => Ok(()),
        }
    }
}

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

fn paginate(articles: Vec<Article>, page: u32, page_size: u32) -> ArticlePage {
    let total = articles.len() as u64;
    let page_size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1) * page_size;
    let articles = articles.into_iter().skip(start).take(page_size).collect();
    ArticlePage::new(articles, total)
}

#[async_trait]
impl ArticleSource for MockSource {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<ArticlePage> {
        self.begin().await?;
        tracing::debug!(?query, "mock top-headlines");

        let category = query.category.to_lowercase();
        let needle = query.query.to_lowercase();
        let matching: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| category.is_empty() || contains_ci(a.category.as_deref(), &category))
            .filter(|a| needle.is_empty() || contains_ci(a.title.as_deref(), &needle))
            .cloned()
            .collect();

        Ok(paginate(matching, query.page, query.page_size))
    }

    async fn everything(&self, query: &EverythingQuery) -> Result<ArticlePage> {
        self.begin().await?;
        tracing::debug!(?query, "mock everything");

        let needle = query.query.to_lowercase();
        let matching: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || contains_ci(a.title.as_deref(), &needle)
                    || contains_ci(a.description.as_deref(), &needle)
                    || contains_ci(a.category.as_deref(), &needle)
            })
            .cloned()
            .collect();

        Ok(paginate(matching, query.page, query.page_size))
    }

    async fn article(&self, id: &str) -> Result<Article> {
        self.begin().await?;

        // Unknown ids fall back to the first article.
        self.articles
            .iter()
            .find(|a| a.key() == Some(id))
            .or_else(|| self.articles.first())
            .cloned()
            .ok_or_else(|| NewsError::ArticleNotFound(id.to_string()))
    }
}

fn sample(
    id: u32,
    source: &str,
    title: &str,
    description: &str,
    category: &str,
    published_at: &str,
    author: &str,
) -> Article {
    Article {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        content: Some(format!("<p>{}</p>", description)),
        url: Some(format!("https://example.com/articles/{}", id)),
        url_to_image: None,
        published_at: Some(published_at.to_string()),
        author: Some(author.to_string()),
        source: Some(Source::named(source)),
        category: Some(category.to_string()),
    }
}

pub fn sample_articles() -> Vec<Article> {
    vec![
        sample(
            1,
            "TechCrunch",
            "New developments in artificial intelligence",
            "A review of recent progress in AI and its effect on the modern world",
            "Technology",
            "2024-01-15T00:00:00Z",
            "Alexey Petrov",
        ),
        sample(
            2,
            "Wired",
            "Quantum computing: a new era",
            "Breakthroughs in quantum computer hardware",
            "Science",
            "2024-01-14T00:00:00Z",
            "Maria Ivanova",
        ),
        sample(
            3,
            "Medical News Today",
            "Blockchain in healthcare",
            "How distributed ledgers are changing the medical industry",
            "Health",
            "2024-01-13T00:00:00Z",
            "Dmitry Sokolov",
        ),
        sample(
            4,
            "The Verge",
            "Robots on the factory floor",
            "Automating production with robotic systems",
            "Technology",
            "2024-01-12T00:00:00Z",
            "Elena Kozlova",
        ),
        sample(
            5,
            "Reuters",
            "Climate change and the economy",
            "How a changing climate reshapes the world economy",
            "Business",
            "2024-01-11T00:00:00Z",
            "Andrey Volkov",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_headlines_filter_by_category() {
        let source = MockSource::new();
        let page = assert_ok!(
            source
                .top_headlines(&HeadlinesQuery::default().with_category("technology"))
                .await
        );
        assert_eq!(page.total_results, 2);
        assert!(page
            .articles
            .iter()
            .all(|a| a.category.as_deref() == Some("Technology")));
    }

    #[tokio::test]
    async fn test_search_matches_description() {
        let source = MockSource::new();
        let page = assert_ok!(source.everything(&EverythingQuery::new("LEDGERS")).await);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_pagination() {
        let source = MockSource::new();
        let query = HeadlinesQuery {
            page: 2,
            page_size: 2,
            ..Default::default()
        };
        let page = assert_ok!(source.top_headlines(&query).await);
        assert_eq!(page.total_results, 5);
        let ids: Vec<_> = page.articles.iter().map(|a| a.key().unwrap()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_article_lookup_falls_back_to_first() {
        let source = MockSource::new();
        let found = assert_ok!(source.article("4").await);
        assert_eq!(found.key(), Some("4"));

        let fallback = assert_ok!(source.article("999").await);
        assert_eq!(fallback.key(), Some("1"));

        let empty = MockSource::with_articles(Vec::new());
        assert_err!(empty.article("1").await);
    }

    #[tokio::test]
    async fn test_failure_injection_counts_requests() {
        let source = MockSource::new();
        source.set_failure(Some("rate limited"));
        let err = source
            .top_headlines(&HeadlinesQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "rate limited");

        source.set_failure(None);
        assert_ok!(source.top_headlines(&HeadlinesQuery::default()).await);
        assert_eq!(source.requests(), 2);
    }
}
