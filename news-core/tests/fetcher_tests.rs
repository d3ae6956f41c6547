use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use news_core::{HttpNewsProvider, NewsFetcher, TtlCache, User};

fn sample_user(preferences: &[&str]) -> User {
    User {
        id: "u1".into(),
        email: "reader@example.com".into(),
        preferences: preferences.iter().map(|p| p.to_string()).collect(),
    }
}

fn provider_for(server: &MockServer) -> Arc<HttpNewsProvider> {
    let endpoint = format!("{}/everything", server.uri())
        .parse()
        .expect("mock server uri");
    Arc::new(HttpNewsProvider::new(
        reqwest::Client::new(),
        endpoint,
        "test-key",
    ))
}

fn article_json(url: &str) -> serde_json::Value {
    json!({
        "source": { "id": null, "name": "Example Wire" },
        "author": "A. Reporter",
        "title": "Headline",
        "description": "Something happened",
        "url": url,
        "urlToImage": null,
        "publishedAt": "2025-03-14T08:00:00Z",
        "content": "Full text"
    })
}

fn search_response(urls: &[&str]) -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": urls.len(),
        "articles": urls.iter().map(|u| article_json(u)).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn feed_merges_preferences_and_second_call_hits_cache() {
    let server = MockServer::start().await;

    // expect(1) proves the second feed_for issues zero upstream calls.
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "movies"))
        .and(query_param("sortBy", "popularity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&["http://e/movie"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "comics"))
        .and(query_param("sortBy", "popularity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&["http://e/comic"])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(provider_for(&server), TtlCache::with_default_ttl());
    let user = sample_user(&["movies", "comics"]);

    let first = fetcher.feed_for(&user).await;
    let urls: Vec<&str> = first.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(urls, vec!["http://e/movie", "http://e/comic"]);

    let second = fetcher.feed_for(&user).await;
    assert_eq!(second, first);
}

#[tokio::test]
async fn upstream_failure_degrades_to_partial_feed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "movies"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "comics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&["http://e/comic"])))
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(provider_for(&server), TtlCache::with_default_ttl());
    let feed = fetcher.feed_for(&sample_user(&["movies", "comics"])).await;

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].url, "http://e/comic");
}

#[tokio::test]
async fn malformed_payload_degrades_to_empty_contribution() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(provider_for(&server), TtlCache::with_default_ttl());
    let feed = fetcher.feed_for(&sample_user(&["movies"])).await;
    assert!(feed.is_empty());
}

#[tokio::test]
async fn empty_preferences_yield_empty_feed_without_upstream_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(provider_for(&server), TtlCache::with_default_ttl());
    let feed = fetcher.feed_for(&sample_user(&[])).await;
    assert!(feed.is_empty());
}

#[tokio::test]
async fn duplicate_articles_across_preferences_are_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&["http://e/shared"])))
        .mount(&server)
        .await;

    let fetcher = NewsFetcher::new(provider_for(&server), TtlCache::with_default_ttl());
    let feed = fetcher.feed_for(&sample_user(&["movies", "comics"])).await;

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0], feed[1]);
}
