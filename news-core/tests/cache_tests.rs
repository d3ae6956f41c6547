use std::time::Duration;

use chrono::NaiveDate;
use news_core::{favourite_list_key, feed_key, read_list_key, TtlCache};

#[tokio::test]
async fn set_then_get_returns_the_value() {
    let cache = TtlCache::with_default_ttl();
    cache.set("k", vec![1u32, 2, 3]).await;
    assert_eq!(cache.get("k").await, Some(vec![1, 2, 3]));
    assert_eq!(cache.get("other").await, None);
}

#[tokio::test]
async fn expired_entries_are_not_returned() {
    let cache = TtlCache::new(Duration::from_millis(30));
    cache.set("k", 1u32).await;
    assert_eq!(cache.get("k").await, Some(1));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(cache.get("k").await, None);
}

#[tokio::test]
async fn set_replaces_wholesale_and_resets_ttl() {
    let cache = TtlCache::new(Duration::from_millis(80));
    cache.set("k", 1u32).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    cache.set("k", 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    // 100ms after the first insert but only 50ms after the replacement.
    assert_eq!(cache.get("k").await, Some(2));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let cache = TtlCache::with_default_ttl();
    cache.delete("absent").await;
    cache.set("k", 1u32).await;
    cache.delete("k").await;
    cache.delete("k").await;
    assert_eq!(cache.get("k").await, None);
}

#[tokio::test]
async fn handles_are_shared_across_clones() {
    let cache = TtlCache::with_default_ttl();
    let other = cache.clone();
    cache.set("k", 1u32).await;
    assert_eq!(other.get("k").await, Some(1));
    other.delete("k").await;
    assert_eq!(cache.get("k").await, None);
}

#[test]
fn feed_key_sorts_preferences() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let stored_order = vec!["movies".to_string(), "comics".to_string()];
    let sorted_order = vec!["comics".to_string(), "movies".to_string()];
    assert_eq!(
        feed_key("u1", &stored_order, day),
        "news:u1:comics,movies:2025-03-14"
    );
    assert_eq!(
        feed_key("u1", &stored_order, day),
        feed_key("u1", &sorted_order, day)
    );
}

#[test]
fn list_keys_vary_by_user_only() {
    assert_eq!(read_list_key("u1"), "news:read:u1");
    assert_eq!(favourite_list_key("u1"), "news:favourite:u1");
    assert_ne!(read_list_key("u1"), read_list_key("u2"));
}
