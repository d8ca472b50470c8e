use crate::app::Result;
use crate::domain::{Article, SavedArticle};
use crate::store::collection::Collection;
use crate::store::SharedStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedKind {
    Favorites,
    Likes,
}

impl SavedKind {
    pub fn storage_key(self) -> &'static str {
        match self {
            SavedKind::Favorites => "news-favorites",
            SavedKind::Likes => "news-liked",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SavedKind::Favorites => "favorites",
            SavedKind::Likes => "likes",
        }
    }
}

/// Bookmarked or liked articles, unique by id.
pub struct SavedArticlesStore {
    kind: SavedKind,
    collection: Collection<SavedArticle>,
}

impl SavedArticlesStore {
    pub fn new(kind: SavedKind, storage: Option<SharedStorage>) -> Self {
        Self {
            kind,
            collection: Collection::new(kind.storage_key(), kind.label(), storage),
        }
    }

    pub fn favorites(storage: Option<SharedStorage>) -> Self {
        Self::new(SavedKind::Favorites, storage)
    }

    pub fn likes(storage: Option<SharedStorage>) -> Self {
        Self::new(SavedKind::Likes, storage)
    }

    pub fn kind(&self) -> SavedKind {
        self.kind
    }

    pub fn is_initialized(&self) -> bool {
        self.collection.is_initialized()
    }

    pub fn hydrate(&self) {
        self.collection.hydrate();
    }

    pub fn persist(&self) -> Result<()> {
        self.collection.persist()
    }

    /// Save the article. Articles without an id, or already saved, are
    /// ignored.
    pub fn add(&self, article: &Article) -> Result<()> {
        let Some(saved) = SavedArticle::from_article(article) else {
            self.collection.hydrate();
            return Ok(());
        };

        self.collection.update(|items| {
            if items.iter().any(|item| item.id == saved.id) {
                return ((), false);
            }
            items.push(saved);
            ((), true)
        })
    }

    /// Drop every saved article with this id.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.collection.update(|items| {
            items.retain(|item| item.id != id);
            ((), true)
        })
    }

    /// Add when absent, remove when present. Returns whether the article is
    /// saved afterwards; articles without an id are never saved.
    pub fn toggle(&self, article: &Article) -> Result<bool> {
        let Some(saved) = SavedArticle::from_article(article) else {
            self.collection.hydrate();
            return Ok(false);
        };

        self.collection.update(|items| {
            if items.iter().any(|item| item.id == saved.id) {
                items.retain(|item| item.id != saved.id);
                (false, true)
            } else {
                items.push(saved);
                (true, true)
            }
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.collection
            .read(|items| items.iter().any(|item| item.id == id))
    }

    pub fn count(&self) -> usize {
        self.collection.read(|items| items.len())
    }

    pub fn items(&self) -> Vec<SavedArticle> {
        self.collection.read(|items| items.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStorage, Storage};
    use std::sync::Arc;

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn fresh(kind: SavedKind) -> (Arc<MemoryStorage>, SavedArticlesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SavedArticlesStore::new(kind, Some(storage.clone()));
        (storage, store)
    }

    #[test]
    fn test_add_and_remove() {
        let (_, store) = fresh(SavedKind::Favorites);
        store.add(&article("1", "Hello")).unwrap();
        assert_eq!(store.count(), 1);

        store.remove("1").unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (storage, store) = fresh(SavedKind::Likes);
        store.add(&article("1", "Hello")).unwrap();
        store.add(&article("1", "Hello again")).unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(store.items()[0].title.as_deref(), Some("Hello"));
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_add_without_id_is_ignored() {
        let (storage, store) = fresh(SavedKind::Favorites);
        store.add(&Article::default()).unwrap();
        store.add(&article("", "empty id")).unwrap();

        assert_eq!(store.count(), 0);
        assert_eq!(storage.writes(), 0);
        assert!(store.is_initialized());
    }

    #[test]
    fn test_toggle_involution() {
        for kind in [SavedKind::Favorites, SavedKind::Likes] {
            let (_, store) = fresh(kind);
            store.add(&article("a", "Other")).unwrap();
            let before = store.items();

            assert!(store.toggle(&article("1", "Hello")).unwrap());
            assert!(store.contains("1"));
            assert!(!store.toggle(&article("1", "Hello")).unwrap());

            assert_eq!(store.items(), before);
        }
    }

    #[test]
    fn test_toggle_without_id_returns_false() {
        for kind in [SavedKind::Favorites, SavedKind::Likes] {
            let (storage, store) = fresh(kind);
            assert!(!store.toggle(&Article::default()).unwrap());
            assert_eq!(store.count(), 0);
            assert_eq!(storage.writes(), 0);
        }
    }

    #[test]
    fn test_remove_missing_is_not_an_error() {
        let (storage, store) = fresh(SavedKind::Favorites);
        store.add(&article("1", "Hello")).unwrap();
        assert_eq!(storage.writes(), 1);

        store.remove("2").unwrap();
        assert_eq!(store.count(), 1);
        // still written through
        assert_eq!(storage.writes(), 2);
    }

    #[test]
    fn test_odd_stored_items_do_not_erase_the_rest() {
        let (storage, store) = fresh(SavedKind::Likes);
        storage
            .set(
                "news-liked",
                r#"[{"id":"1","title":"Keep me","source":"CNN"},{"title":"No id"}]"#,
            )
            .unwrap();

        store.hydrate();
        assert_eq!(store.count(), 1);
        assert_eq!(store.items()[0].title.as_deref(), Some("Keep me"));

        store.add(&article("3", "Added")).unwrap();
        let raw = storage.get("news-liked").unwrap().unwrap();
        assert!(raw.contains("Keep me"));
        assert!(raw.contains("No id"));
        assert!(raw.contains("Added"));
    }

    #[test]
    fn test_numeric_stored_ids_match_strings() {
        let (storage, store) = fresh(SavedKind::Likes);
        storage.set("news-liked", r#"[{"id": 1, "title": "Hello"}]"#).unwrap();

        store.hydrate();
        assert!(store.contains("1"));

        store.add(&article("1", "Hello")).unwrap();
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_hydrate_reads_once() {
        let (storage, store) = fresh(SavedKind::Favorites);
        store.hydrate();
        store.hydrate();
        store.add(&article("1", "Hello")).unwrap();
        assert_eq!(storage.reads(), 1);
    }

    #[test]
    fn test_corrupt_payload_yields_empty() {
        let (storage, store) = fresh(SavedKind::Favorites);
        storage.set("news-favorites", "{not json").unwrap();

        store.hydrate();
        assert_eq!(store.count(), 0);
        assert!(store.is_initialized());
    }

    #[test]
    fn test_headless_store() {
        let store = SavedArticlesStore::favorites(None);
        assert!(store.toggle(&article("1", "Hello")).unwrap());
        assert_eq!(store.count(), 1);
        store.persist().unwrap();
    }

    #[test]
    fn test_kinds_use_separate_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let favorites = SavedArticlesStore::favorites(Some(storage.clone()));
        let likes = SavedArticlesStore::likes(Some(storage.clone()));

        favorites.add(&article("1", "Hello")).unwrap();
        assert_eq!(likes.count(), 0);
        assert!(storage.get("news-favorites").unwrap().is_some());
        assert!(storage.get("news-liked").unwrap().is_none());
    }
}
