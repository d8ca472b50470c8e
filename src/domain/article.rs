use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const NO_TITLE: &str = "No Title";
pub const DEFAULT_CATEGORY: &str = "General";

/// Title prefix length, in UTF-16 code units.
const TITLE_PREFIX_UNITS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Source {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: Some(name.to_string()),
        }
    }
}

/// An article as returned by the news API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Article {
    /// Derive a stable identity `<source>::<title prefix>::<published millis>`.
    ///
    /// Articles from the same source with the same 50-character title prefix
    /// published in the same millisecond map to the same id.
    pub fn derive_id(&self) -> String {
        let source = self
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE);

        let title = self
            .title
            .as_deref()
            .map(title_prefix)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let published = self
            .published_at
            .as_deref()
            .and_then(parse_published_millis)
            .unwrap_or(0);

        format!("{}::{}::{}", source, title, published)
    }

    /// The article's id when it carries a usable one.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Replace whatever id the source supplied with the derived one.
    pub fn with_derived_id(mut self) -> Self {
        self.id = Some(self.derive_id());
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }

    pub fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or(UNKNOWN_SOURCE)
    }
}

/// First 50 UTF-16 units of the title, then trimmed. A surrogate pair cut
/// in half becomes U+FFFD.
fn title_prefix(title: &str) -> String {
    let units: Vec<u16> = title.encode_utf16().take(TITLE_PREFIX_UNITS).collect();
    String::from_utf16_lossy(&units)
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}

/// Milliseconds since the epoch for an RFC 3339 timestamp, a naive
/// date-time (taken as UTC) or a bare date (UTC midnight).
pub fn parse_published_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// The part of an article kept in the favorites and likes collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedArticle {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: Option<Source>,
    #[serde(default = "default_category")]
    pub category: String,
}

impl SavedArticle {
    /// Project an article; `None` when it has no id.
    pub fn from_article(article: &Article) -> Option<Self> {
        let id = article.key()?.to_string();
        Some(Self {
            id,
            title: article.title.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
            url: article.url.clone(),
            url_to_image: article.url_to_image.clone(),
            published_at: article.published_at.clone(),
            author: article.author.clone(),
            source: article.source.clone(),
            category: article
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(default_category),
        })
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn id_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts a source object, or a bare name as some stored items carry.
fn lenient_source<'de, D>(deserializer: D) -> std::result::Result<Option<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(name)) => Ok(Some(Source::named(&name))),
        Some(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(id_from_value))
}

fn required_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value).ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}
