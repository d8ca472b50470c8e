use std::fmt;

use serde::Serialize;

use crate::domain::{EverythingQuery, HeadlinesQuery};

/// Identity of a memoized request: the operation plus its parameters.
///
/// Parameters are typed, so two requests with equal values share an entry
/// no matter how the caller assembled them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Headlines(HeadlinesQuery),
    Search(EverythingQuery),
    Category {
        category: String,
        query: HeadlinesQuery,
    },
    Article(String),
    Related {
        article_id: String,
        limit: usize,
    },
}

impl CacheKey {
    pub fn tag(&self) -> &'static str {
        match self {
            CacheKey::Headlines(_) => "headlines",
            CacheKey::Search(_) => "search",
            CacheKey::Category { .. } => "category",
            CacheKey::Article(_) => "article",
            CacheKey::Related { .. } => "related",
        }
    }

    /// Stable textual form, used in logs.
    pub fn signature(&self) -> String {
        match self {
            CacheKey::Headlines(query) => format!("{}_{}", self.tag(), json(query)),
            CacheKey::Search(query) => {
                format!("{}_{}_{}", self.tag(), query.query, json(query))
            }
            CacheKey::Category { category, query } => {
                format!("{}_{}_{}", self.tag(), category, json(query))
            }
            CacheKey::Article(id) => format!("{}_{}", self.tag(), id),
            CacheKey::Related { article_id, limit } => {
                format!("{}_{}_{}", self.tag(), article_id, limit)
            }
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = CacheKey::Headlines(HeadlinesQuery::default().with_category("tech"));
        let b = CacheKey::Headlines(HeadlinesQuery::default().with_category("tech"));
        assert_eq!(a, b);
        assert_eq!(a.signature(), b.signature());
        assert!(a.signature().starts_with("headlines_{\"country\":\"us\""));
    }

    #[test]
    fn test_equal_values_built_differently_match() {
        let built = HeadlinesQuery {
            page_size: 20,
            category: "tech".into(),
            ..Default::default()
        };
        let chained = HeadlinesQuery::default().with_category("tech");
        assert_eq!(CacheKey::Headlines(built), CacheKey::Headlines(chained));
    }

    #[test]
    fn test_operations_never_collide() {
        let headlines = CacheKey::Headlines(HeadlinesQuery::default());
        let category = CacheKey::Category {
            category: String::new(),
            query: HeadlinesQuery::default(),
        };
        assert_ne!(headlines, category);

        let article = CacheKey::Article("1_3".into());
        let related = CacheKey::Related {
            article_id: "1".into(),
            limit: 3,
        };
        assert_ne!(article, related);
        assert_eq!(related.to_string(), "related_1_3");
    }
}
