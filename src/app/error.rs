use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("request failed"))]
    Api {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl NewsError {
    /// Message shown to users: the API's own message when the server sent
    /// one, otherwise the error's display text.
    pub fn user_message(&self) -> String {
        match self {
            NewsError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
