use crate::app::Result;
use crate::domain::{Comment, NewComment};
use crate::store::collection::Collection;
use crate::store::SharedStorage;

pub const COMMENTS_KEY: &str = "news-comments";

/// Reader comments, stored in insertion order and looked up by article id.
pub struct CommentsStore {
    collection: Collection<Comment>,
}

impl CommentsStore {
    pub fn new(storage: Option<SharedStorage>) -> Self {
        Self {
            collection: Collection::new(COMMENTS_KEY, "comments", storage),
        }
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

    pub fn add(&self, article_id: impl ToString, data: NewComment) -> Result<Comment> {
        let comment = Comment::new(article_id, data);
        let created = comment.clone();
        self.collection.update(|items| {
            items.push(comment);
            ((), true)
        })?;
        tracing::debug!("Added comment {} on {}", created.id, created.article_id);
        Ok(created)
    }

    pub fn remove(&self, comment_id: &str) -> Result<()> {
        self.collection.update(|items| {
            items.retain(|c| c.id != comment_id);
            ((), true)
        })
    }

    pub fn remove_by_article_id(&self, article_id: impl ToString) -> Result<()> {
        let article_id = article_id.to_string();
        self.collection.update(|items| {
            items.retain(|c| c.article_id != article_id);
            ((), true)
        })
    }

    pub fn for_article(&self, article_id: impl ToString) -> Vec<Comment> {
        let article_id = article_id.to_string();
        self.collection.read(|items| {
            items
                .iter()
                .filter(|c| c.article_id == article_id)
                .cloned()
                .collect()
        })
    }

    pub fn count_for_article(&self, article_id: impl ToString) -> usize {
        let article_id = article_id.to_string();
        self.collection
            .read(|items| items.iter().filter(|c| c.article_id == article_id).count())
    }

    pub fn all(&self) -> Vec<Comment> {
        self.collection.read(|items| items.to_vec())
    }

    pub fn count(&self) -> usize {
        self.collection.read(|items| items.len())
    }
}
