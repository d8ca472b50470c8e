pub mod article;
pub mod comment;
pub mod query;

pub use article::{Article, SavedArticle, Source};
pub use comment::{Comment, NewComment};
pub use query::{ArticlePage, EverythingQuery, HeadlinesQuery};
