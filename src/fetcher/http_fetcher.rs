use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{NewsError, Result};
use crate::config::ApiConfig;
use crate::domain::{Article, ArticlePage, EverythingQuery, HeadlinesQuery};
use crate::fetcher::ArticleSource;

/// Body NewsAPI sends alongside a non-2xx status.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

pub struct NewsApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn endpoint(&self, path: &str, pairs: Vec<(&'static str, String)>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NewsError::Config(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push(path);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn get_page(&self, url: Url) -> Result<ArticlePage> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let payload: ApiErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            return Err(NewsError::Api {
                status: status.as_u16(),
                code: payload.code,
                message: payload.message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<ArticlePage> {
        let url = self.endpoint("top-headlines", query.query_pairs())?;
        self.get_page(url).await
    }

    async fn everything(&self, query: &EverythingQuery) -> Result<ArticlePage> {
        let url = self.endpoint("everything", query.query_pairs())?;
        self.get_page(url).await
    }

    async fn article(&self, id: &str) -> Result<Article> {
        Err(NewsError::Unsupported(format!(
            "NewsAPI has no lookup by id (requested {})",
            id
        )))
    }
}
