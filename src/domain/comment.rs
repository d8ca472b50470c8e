use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a comment.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub comment: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(article_id: impl ToString, data: NewComment) -> Self {
        let now = Utc::now();
        Self {
            id: Self::generate_id(now),
            article_id: article_id.to_string(),
            name: data.name,
            email: data.email,
            comment: data.comment,
            timestamp: data.timestamp.unwrap_or(now),
            created_at: now,
        }
    }

    /// Millisecond timestamp followed by nine random hex characters.
    pub fn generate_id(now: DateTime<Utc>) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}{}", now.timestamp_millis(), &suffix[..9])
    }
}
