use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use news_core::{HttpNewsProvider, JsonFileStore, NewsFetcher, StateManager, TtlCache};

use news_api::auth::{JwtAuthenticator, UserDirectory};
use news_api::config::ServiceConfig;
use news_api::routes::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServiceConfig::load();
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .user_agent("news-aggregator/0.1")
        .build()?;
    let endpoint: Url = config.news_endpoint.parse()?;
    let ttl = Duration::from_secs(config.cache_ttl_seconds);

    let provider = Arc::new(HttpNewsProvider::new(client, endpoint, config.api_key()));
    let fetcher = Arc::new(NewsFetcher::new(provider, TtlCache::new(ttl)));
    let store = Arc::new(JsonFileStore::load_from(&config.store_file).await);
    let states = Arc::new(StateManager::new(store, TtlCache::new(ttl)));
    let directory = UserDirectory::load_from(&config.users_file).await;
    let authenticator = Arc::new(JwtAuthenticator::new(
        config.jwt_secret().as_bytes(),
        directory.clone(),
    ));

    let app = router(AppState {
        authenticator,
        directory,
        fetcher,
        states,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "news aggregator listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
