use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use news_core::{AuthError, Authenticator, StoreError, User};

#[derive(Debug, Deserialize)]
struct Claims {
    email: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Users known to the service, keyed by email. Seeded from a JSON file;
/// preference updates are written back to the same file. Account creation
/// and credentials live outside this service. Cloning yields another
/// handle onto the same directory.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    inner: Arc<RwLock<HashMap<String, User>>>,
    path: Option<PathBuf>,
    // Serializes snapshot+write+rename; persists share one tmp path.
    persist_lock: Arc<Mutex<()>>,
}

impl UserDirectory {
    pub fn from_users(users: Vec<User>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(
                users
                    .into_iter()
                    .map(|user| (user.email.clone(), user))
                    .collect(),
            )),
            path: None,
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<User>>(&bytes) {
                Ok(users) => users,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "failed to parse users file; directory is empty");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(error = %err, path = %path.display(), "failed to read users file; directory is empty");
                Vec::new()
            }
        };
        let mut directory = Self::from_users(users);
        directory.path = Some(path);
        directory
    }

    pub async fn find(&self, email: &str) -> Option<User> {
        self.inner.read().await.get(email).cloned()
    }

    /// Replace a user's preference list, writing the directory back to its
    /// seed file. Returns `None` when the email is unknown.
    pub async fn update_preferences(
        &self,
        email: &str,
        preferences: Vec<String>,
    ) -> Result<Option<User>, StoreError> {
        let updated = {
            let mut inner = self.inner.write().await;
            match inner.get_mut(email) {
                Some(user) => {
                    user.preferences = preferences;
                    Some(user.clone())
                }
                None => None,
            }
        };
        if updated.is_some() {
            self.persist().await?;
        }
        Ok(updated)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            debug!("user directory is in-memory only; skipping persist");
            return Ok(());
        };
        let _guard = self.persist_lock.lock().await;
        let bytes = {
            let inner = self.inner.read().await;
            let mut users: Vec<&User> = inner.values().collect();
            users.sort_by(|a, b| a.email.cmp(&b.email));
            serde_json::to_vec_pretty(&users)?
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Verifies an HS256 bearer token carrying the user's email and resolves
/// it against the directory. Token issuance happens elsewhere.
pub struct JwtAuthenticator {
    key: DecodingKey,
    directory: UserDirectory,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8], directory: UserDirectory) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            directory,
        }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, bearer: Option<&str>) -> Result<User, AuthError> {
        let token = bearer.ok_or(AuthError::MissingCredential)?;
        let data = decode::<Claims>(token, &self.key, &Validation::new(Algorithm::HS256))
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                AuthError::InvalidCredential
            })?;
        self.directory
            .find(&data.claims.email)
            .await
            .ok_or(AuthError::UnknownUser)
    }
}
