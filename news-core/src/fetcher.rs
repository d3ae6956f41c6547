use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::cache::{feed_key, TtlCache};
use crate::models::{Article, User};
use crate::upstream::{NewsProvider, SearchQuery, SortOrder};

/// Builds a user's daily feed: cache-first, otherwise one upstream search
/// per preference over the `[yesterday, today)` window, all issued
/// concurrently and merged in preference order.
pub struct NewsFetcher {
    provider: Arc<dyn NewsProvider>,
    cache: TtlCache<Vec<Article>>,
}

impl NewsFetcher {
    pub fn new(provider: Arc<dyn NewsProvider>, cache: TtlCache<Vec<Article>>) -> Self {
        Self { provider, cache }
    }

    /// Within the cache TTL, repeated calls for the same user, preference
    /// set and calendar day return the identical list without contacting
    /// upstream again. A per-preference upstream failure degrades that
    /// preference to an empty contribution rather than failing the feed.
    /// Duplicate articles across overlapping preferences are kept as-is.
    pub async fn feed_for(&self, user: &User) -> Vec<Article> {
        let today = today();
        let key = feed_key(&user.id, &user.preferences, today);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(user = %user.id, "serving daily feed from cache");
            return cached;
        }

        let from = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let fetches = user.preferences.iter().map(|preference| {
            let query = SearchQuery {
                query: preference.clone(),
                from,
                to: today,
                sort: SortOrder::Popularity,
            };
            let provider = Arc::clone(&self.provider);
            async move {
                match provider.search(&query).await {
                    Ok(articles) => articles,
                    Err(err) => {
                        warn!(
                            preference = %query.query,
                            error = %err,
                            "upstream search failed; treating as empty"
                        );
                        Vec::new()
                    }
                }
            }
        });

        let news: Vec<Article> = join_all(fetches).await.into_iter().flatten().collect();
        debug!(user = %user.id, articles = news.len(), "daily feed fetched from upstream");
        self.cache.set(key, news.clone()).await;
        news
    }
}

// The service's calendar timezone is UTC.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}
