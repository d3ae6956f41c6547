use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{favourite_list_key, read_list_key, TtlCache};
use crate::error::NewsError;
use crate::models::{Article, User, UserArticleState};
use crate::store::{StateUpdate, UserNewsStore};

/// Records read/favourite marks against the persistent store and keeps the
/// per-user list caches consistent: a list key is invalidated only after
/// the matching upsert has succeeded.
pub struct StateManager {
    store: Arc<dyn UserNewsStore>,
    cache: TtlCache<Vec<UserArticleState>>,
}

impl StateManager {
    pub fn new(store: Arc<dyn UserNewsStore>, cache: TtlCache<Vec<UserArticleState>>) -> Self {
        Self { store, cache }
    }

    /// Upserts the state for `(user.id, article_id)` with the latest article
    /// snapshot and `read = true`, preserving any existing favourite flag.
    pub async fn mark_read(
        &self,
        user: &User,
        article_id: &str,
        article: Article,
    ) -> Result<UserArticleState, NewsError> {
        self.mark(user, article_id, article, false).await
    }

    /// Same as [`mark_read`](Self::mark_read), additionally setting
    /// `favourite = true`. Favouriting implies read.
    pub async fn mark_favourite(
        &self,
        user: &User,
        article_id: &str,
        article: Article,
    ) -> Result<UserArticleState, NewsError> {
        self.mark(user, article_id, article, true).await
    }

    async fn mark(
        &self,
        user: &User,
        article_id: &str,
        article: Article,
        favourite: bool,
    ) -> Result<UserArticleState, NewsError> {
        if article.url.trim().is_empty() {
            return Err(NewsError::Validation(
                "article data with a valid url is required".into(),
            ));
        }

        let update = StateUpdate {
            article,
            read: true,
            favourite: favourite.then_some(true),
        };
        let state = self.store.upsert(&user.id, article_id, update).await?;

        // Invalidate only after the write has stuck.
        let key = if favourite {
            favourite_list_key(&user.id)
        } else {
            read_list_key(&user.id)
        };
        self.cache.delete(&key).await;
        info!(user = %user.id, article = %article_id, favourite, "recorded article state");
        Ok(state)
    }

    pub async fn list_read(&self, user: &User) -> Result<Vec<UserArticleState>, NewsError> {
        let key = read_list_key(&user.id);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(user = %user.id, "serving read list from cache");
            return Ok(cached);
        }
        let states = self.store.find_read(&user.id).await?;
        self.cache.set(key, states.clone()).await;
        Ok(states)
    }

    pub async fn list_favourite(&self, user: &User) -> Result<Vec<UserArticleState>, NewsError> {
        let key = favourite_list_key(&user.id);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(user = %user.id, "serving favourite list from cache");
            return Ok(cached);
        }
        let states = self.store.find_favourite(&user.id).await?;
        self.cache.set(key, states.clone()).await;
        Ok(states)
    }
}
