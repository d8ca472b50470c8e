pub mod collection;
pub mod comments;
pub mod memory;
pub mod saved;
pub mod sqlite;

use std::sync::Arc;

use crate::app::Result;

pub use comments::CommentsStore;
pub use memory::MemoryStorage;
pub use saved::{SavedArticlesStore, SavedKind};
pub use sqlite::SqliteStorage;

/// Durable string key-value storage. Writes are synchronous.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Storage handle given to the collection stores; `None` means headless.
pub type SharedStorage = Arc<dyn Storage + Send + Sync>;
