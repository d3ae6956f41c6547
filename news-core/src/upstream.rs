use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::UpstreamError;
use crate::models::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Popularity,
    PublishedAt,
    Relevancy,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Popularity => "popularity",
            SortOrder::PublishedAt => "publishedAt",
            SortOrder::Relevancy => "relevancy",
        }
    }
}

/// One parameterized search against the upstream article provider.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sort: SortOrder,
}

/// Boundary to the third-party article search API. A failed search is a
/// soft failure: callers decide whether to degrade or abort.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// Client for a NewsAPI-compatible search endpoint. Bounded latency comes
/// from the injected `reqwest::Client`'s timeout.
#[derive(Debug, Clone)]
pub struct HttpNewsProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpNewsProvider {
    pub fn new(client: Client, endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NewsProvider for HttpNewsProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, UpstreamError> {
        let from = query.from.to_string();
        let to = query.to.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", query.query.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sortBy", query.sort.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        debug!(
            query = %query.query,
            articles = parsed.articles.len(),
            "upstream search completed"
        );
        Ok(parsed.articles)
    }
}
