use async_trait::async_trait;

use crate::error::AuthError;
use crate::models::User;

/// Boundary to the authentication collaborator. The resolved user is
/// threaded explicitly into core operations, never stashed in ambient
/// request state.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer credential (if any) to an authenticated user.
    async fn authenticate(&self, bearer: Option<&str>) -> Result<User, AuthError>;
}
