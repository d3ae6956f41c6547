use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of an article as reported by the upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// One article as returned by the upstream search API. Field names follow
/// the provider's camelCase wire format. Articles are never generated
/// locally and are immutable once fetched; the `url` is the natural
/// external identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    // Required in practice; an empty url is rejected before any write.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Option<String>,
}

/// An authenticated user as resolved by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// One user's relationship to one article. Exactly one record exists per
/// `(user_id, article_id)` pair; the article snapshot is overwritten with
/// the latest payload on every mark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserArticleState {
    pub user_id: String,
    pub article_id: String,
    pub article: Article,
    pub read: bool,
    pub favourite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
