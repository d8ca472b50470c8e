//! # newsdesk
//!
//! Browse news headlines, search the archive, bookmark and like articles
//! and keep comments on them.
//!
//! ## Architecture
//!
//! ```text
//! ArticleSource → Normalizer → RequestCache / NewsStore → CLI
//!                                  Storage ← favorites, likes, comments
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Headlines from the sample set
//! newsdesk --mock headlines --category Technology
//!
//! # Search and bookmark
//! newsdesk search "climate"
//! newsdesk bookmark <id>
//! newsdesk bookmarks
//! ```

/// Application context, error type and observable signals.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// source, cache, news store and the persisted collections.
pub mod app;

/// Memoization of article requests keyed by operation and parameters.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration loaded from `~/.config/newsdesk/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): an article with its derived identity
/// - [`SavedArticle`](domain::SavedArticle): a favorite or liked article
/// - [`Comment`](domain::Comment): a comment attached to an article id
pub mod domain;

/// Article sources.
///
/// - [`ArticleSource`](fetcher::ArticleSource): async trait for the upstream API
/// - [`NewsApiClient`](fetcher::NewsApiClient): reqwest-based implementation
/// - [`MockSource`](fetcher::MockSource): fixed sample articles
pub mod fetcher;

/// Headlines and search results with remembered filters.
pub mod news;

/// Id and category assignment for fetched articles.
pub mod normalizer;

/// Key-value persistence and the collections built on it.
pub mod store;
