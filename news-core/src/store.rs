use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{Article, UserArticleState};

/// Fields applied by an upsert. A `None` favourite leaves the stored flag
/// untouched, mirroring a partial document update.
#[derive(Debug, Clone)]
pub struct StateUpdate {
    pub article: Article,
    pub read: bool,
    pub favourite: Option<bool>,
}

/// Store of record for per-user article state. Uniqueness of
/// `(user_id, article_id)` is the store's own responsibility; callers never
/// lock around it.
#[async_trait]
pub trait UserNewsStore: Send + Sync {
    async fn upsert(
        &self,
        user_id: &str,
        article_id: &str,
        update: StateUpdate,
    ) -> Result<UserArticleState, StoreError>;

    async fn find_read(&self, user_id: &str) -> Result<Vec<UserArticleState>, StoreError>;

    async fn find_favourite(&self, user_id: &str) -> Result<Vec<UserArticleState>, StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreData {
    // user_id -> article_id -> state
    states: HashMap<String, HashMap<String, UserArticleState>>,
}

/// JSON-file-backed implementation of [`UserNewsStore`]. The nested map
/// keyed by user then article enforces the composite uniqueness constraint
/// structurally. Writes go through a temp file and rename so a crash never
/// leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    inner: Arc<RwLock<StoreData>>,
    path: Option<PathBuf>,
    // Serializes snapshot+write+rename; persists share one tmp path.
    persist_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreData::default())),
            path: None,
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<StoreData>(&bytes) {
                Ok(data) => data,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "failed to parse store file; starting empty");
                    StoreData::default()
                }
            },
            Err(_) => StoreData::default(),
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            debug!("store is in-memory only; skipping persist");
            return Ok(());
        };
        // One persist at a time. Snapshotting under the guard means the
        // last rename always carries the newest state.
        let _guard = self.persist_lock.lock().await;
        let bytes = {
            let inner = self.inner.read().await;
            serde_json::to_vec_pretty(&*inner)?
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn find_where(
        &self,
        user_id: &str,
        matches: impl Fn(&UserArticleState) -> bool,
    ) -> Vec<UserArticleState> {
        let inner = self.inner.read().await;
        let mut states: Vec<UserArticleState> = inner
            .states
            .get(user_id)
            .map(|per_user| per_user.values().filter(|s| matches(s)).cloned().collect())
            .unwrap_or_default();
        // Most recently touched first, so listings are deterministic.
        states.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        states
    }
}

#[async_trait]
impl UserNewsStore for JsonFileStore {
    async fn upsert(
        &self,
        user_id: &str,
        article_id: &str,
        update: StateUpdate,
    ) -> Result<UserArticleState, StoreError> {
        let now = Utc::now();
        let state = {
            let mut inner = self.inner.write().await;
            let per_user = inner.states.entry(user_id.to_owned()).or_default();
            match per_user.get_mut(article_id) {
                Some(existing) => {
                    existing.article = update.article;
                    existing.read = update.read;
                    if let Some(favourite) = update.favourite {
                        existing.favourite = favourite;
                    }
                    existing.updated_at = now;
                    existing.clone()
                }
                None => {
                    let state = UserArticleState {
                        user_id: user_id.to_owned(),
                        article_id: article_id.to_owned(),
                        article: update.article,
                        read: update.read,
                        favourite: update.favourite.unwrap_or(false),
                        created_at: now,
                        updated_at: now,
                    };
                    per_user.insert(article_id.to_owned(), state.clone());
                    state
                }
            }
        };
        self.persist().await?;
        Ok(state)
    }

    async fn find_read(&self, user_id: &str) -> Result<Vec<UserArticleState>, StoreError> {
        Ok(self.find_where(user_id, |s| s.read).await)
    }

    async fn find_favourite(&self, user_id: &str) -> Result<Vec<UserArticleState>, StoreError> {
        Ok(self.find_where(user_id, |s| s.favourite).await)
    }
}
