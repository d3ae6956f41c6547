use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use news_core::{
    Article, AuthError, Authenticator, NewsError, NewsFetcher, StateManager, StoreError, User,
};

use crate::auth::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    pub directory: UserDirectory,
    pub fetcher: Arc<NewsFetcher>,
    pub states: Arc<StateManager>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/news", get(get_news))
        .route("/news/read", get(get_read_news))
        .route("/news/favourite", get(get_favourite_news))
        .route("/news/{id}/read", post(mark_read))
        .route("/news/{id}/favourite", post(mark_favourite))
        .route(
            "/users/preferences",
            get(get_preferences).put(update_preferences),
        )
        .with_state(state)
}

/// Error reply in the service's `{message}` shape.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::MissingCredential | AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredential => StatusCode::FORBIDDEN,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

// Unparseable bodies get the same `{message}` shape as everything else.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    Ok(state.authenticator.authenticate(bearer).await?)
}

async fn get_news(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let news = state.fetcher.feed_for(&user).await;
    Ok(Json(json!({ "news": news })))
}

#[derive(Debug, Deserialize)]
struct MarkBody {
    #[serde(default)]
    article: Option<Article>,
}

async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<MarkBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let Json(body) = body?;
    let article = body
        .article
        .ok_or_else(|| ApiError::bad_request("article data with a valid url is required"))?;
    let saved = state.states.mark_read(&user, &id, article).await?;
    Ok(Json(json!({ "message": "Marked as read", "data": saved })))
}

async fn mark_favourite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<MarkBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let Json(body) = body?;
    let article = body
        .article
        .ok_or_else(|| ApiError::bad_request("article data with a valid url is required"))?;
    let saved = state.states.mark_favourite(&user, &id, article).await?;
    Ok(Json(
        json!({ "message": "Marked as favourite", "data": saved }),
    ))
}

async fn get_read_news(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let news = state.states.list_read(&user).await?;
    Ok(Json(json!({ "news": news })))
}

async fn get_favourite_news(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let news = state.states.list_favourite(&user).await?;
    Ok(Json(json!({ "news": news })))
}

async fn get_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    // Re-read so a concurrent update is reflected.
    let preferences = match state.directory.find(&user.email).await {
        Some(current) => current.preferences,
        None => user.preferences,
    };
    Ok(Json(json!({ "preferences": preferences })))
}

#[derive(Debug, Deserialize)]
struct PreferencesBody {
    preferences: Vec<String>,
}

async fn update_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PreferencesBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let Json(body) = body?;
    let updated = state
        .directory
        .update_preferences(&user.email, body.preferences)
        .await?
        .ok_or_else(|| ApiError::from(AuthError::UnknownUser))?;
    Ok(Json(json!({ "preferences": updated.preferences })))
}
