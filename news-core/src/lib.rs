pub mod auth;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod state;
pub mod store;
pub mod upstream;

pub use auth::Authenticator;
pub use cache::{favourite_list_key, feed_key, read_list_key, TtlCache, DEFAULT_TTL};
pub use error::{AuthError, NewsError, StoreError, UpstreamError};
pub use fetcher::NewsFetcher;
pub use models::{Article, ArticleSource, User, UserArticleState};
pub use state::StateManager;
pub use store::{JsonFileStore, StateUpdate, UserNewsStore};
pub use upstream::{HttpNewsProvider, NewsProvider, SearchQuery, SortOrder};
