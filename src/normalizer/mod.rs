use crate::domain::{Article, ArticlePage};

pub const TOP_HEADLINES_CATEGORY: &str = "Top Headlines";
pub const SEARCHED_CATEGORY: &str = "Searched";

/// Assigns derived ids and display categories to fetched articles.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Headline results: every id is replaced by the derived id, and the
    /// category becomes the requested one (or "Top Headlines").
    pub fn headlines(&self, page: ArticlePage, category: &str) -> ArticlePage {
        let category = if category.is_empty() {
            TOP_HEADLINES_CATEGORY
        } else {
            category
        };
        self.relabel(page, category)
    }

    /// Search results: derived ids, category forced to "Searched".
    pub fn search(&self, page: ArticlePage) -> ArticlePage {
        self.relabel(page, SEARCHED_CATEGORY)
    }

    /// Replace every id with the derived one and leave categories alone.
    /// Used for cached results so both fetch paths agree on identity.
    pub fn derive_ids(&self, page: ArticlePage) -> ArticlePage {
        let articles = page
            .articles
            .into_iter()
            .map(|article| Article {
                id: Some(article.derive_id()),
                ..article
            })
            .collect();

        ArticlePage {
            articles,
            total_results: page.total_results,
        }
    }

    /// The API category an article was fetched under. Display labels
    /// assigned here are not API categories.
    pub fn api_category(article: &Article) -> Option<&str> {
        article
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != TOP_HEADLINES_CATEGORY && *c != SEARCHED_CATEGORY)
    }

    fn relabel(&self, page: ArticlePage, category: &str) -> ArticlePage {
        let articles = page
            .articles
            .into_iter()
            .map(|article| Article {
                id: Some(article.derive_id()),
                category: Some(category.to_string()),
                ..article
            })
            .collect();

        ArticlePage {
            articles,
            total_results: page.total_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    fn page() -> ArticlePage {
        ArticlePage::new(
            vec![
                Article {
                    id: Some("1".into()),
                    title: Some("First".into()),
                    source: Some(Source::named("CNN")),
                    published_at: Some("2024-01-15T00:00:00Z".into()),
                    category: Some("World".into()),
                    ..Default::default()
                },
                Article {
                    title: Some("Second".into()),
                    ..Default::default()
                },
            ],
            2,
        )
    }

    #[test]
    fn test_headlines_override_ids_and_category() {
        let out = Normalizer::new().headlines(page(), "sports");
        assert_eq!(out.total_results, 2);
        assert_eq!(out.articles[0].id.as_deref(), Some("CNN::First::1705276800000"));
        assert_eq!(out.articles[1].id.as_deref(), Some("Unknown Source::Second::0"));
        assert!(out
            .articles
            .iter()
            .all(|a| a.category.as_deref() == Some("sports")));
    }

    #[test]
    fn test_headlines_default_category() {
        let out = Normalizer::new().headlines(page(), "");
        assert_eq!(out.articles[0].category.as_deref(), Some(TOP_HEADLINES_CATEGORY));
    }

    #[test]
    fn test_search_forces_category() {
        let out = Normalizer::new().search(page());
        assert!(out
            .articles
            .iter()
            .all(|a| a.category.as_deref() == Some(SEARCHED_CATEGORY)));
    }

    #[test]
    fn test_item_id_determinism() {
        let normalizer = Normalizer::new();
        let a = normalizer.search(page());
        let b = normalizer.search(page());
        assert_eq!(a.articles[0].id, b.articles[0].id);
        assert_eq!(a.articles[1].id, b.articles[1].id);
    }

    #[test]
    fn test_derive_ids_replaces_natural_ids() {
        let out = Normalizer::new().derive_ids(page());
        assert_eq!(out.articles[0].id.as_deref(), Some("CNN::First::1705276800000"));
        assert_eq!(out.articles[1].id.as_deref(), Some("Unknown Source::Second::0"));
        assert_eq!(out.articles[0].category.as_deref(), Some("World"));

        let headlines = Normalizer::new().headlines(page(), "");
        assert_eq!(out.articles[0].id, headlines.articles[0].id);
    }

    #[test]
    fn test_api_category_skips_labels() {
        let labelled = Normalizer::new().headlines(page(), "");
        assert_eq!(Normalizer::api_category(&labelled.articles[0]), None);

        let searched = Normalizer::new().search(page());
        assert_eq!(Normalizer::api_category(&searched.articles[0]), None);

        let sports = Normalizer::new().headlines(page(), "sports");
        assert_eq!(Normalizer::api_category(&sports.articles[0]), Some("sports"));
        assert_eq!(Normalizer::api_category(&page().articles[1]), None);
    }
}
