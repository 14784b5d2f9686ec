//! Runs against a live Redis only when `SNUGGLE_TEST_REDIS_URL` is set,
//! e.g. `SNUGGLE_TEST_REDIS_URL=redis://127.0.0.1:6379/15`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use snuggle_core::{
    visitor::{window_key, VisitorCounter, VisitorTracker, WINDOW_TTL},
    VisitorStore,
};
use snuggle_redis::{redis::AsyncCommands, RedisVisitorStore};

async fn connect() -> Option<RedisVisitorStore> {
    let url = std::env::var("SNUGGLE_TEST_REDIS_URL").ok()?;
    Some(
        RedisVisitorStore::connect(&url)
            .await
            .expect("connect to test redis"),
    )
}

async fn clear(store: &RedisVisitorStore, key: &str) {
    let mut conn = store.conn_for_test();
    let _: i64 = conn.del(key).await.expect("DEL");
}

#[tokio::test]
async fn ping_succeeds() {
    let Some(store) = connect().await else {
        return;
    };
    store.ping().await.expect("PING");
}

#[tokio::test]
async fn missing_key_reports_zero_and_no_ttl() {
    let Some(store) = connect().await else {
        return;
    };
    let key = "snuggle:visitors:test-missing";
    clear(&store, key).await;
    assert_eq!(store.cardinality(key).await.unwrap(), 0);
    assert_eq!(store.time_to_live(key).await.unwrap(), None);
}

#[tokio::test]
async fn tracker_dedups_and_sets_full_ttl() {
    let Some(store) = connect().await else {
        return;
    };
    // A fixed past day keeps this test away from the live window.
    let at = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
    let key = window_key(at);
    clear(&store, &key).await;

    let shared: Arc<dyn VisitorStore> = Arc::new(store.clone());
    let tracker = VisitorTracker::new(Arc::clone(&shared));
    let counter = VisitorCounter::new(shared);

    tracker.track_at("1.2.3.4", at).await.unwrap();
    tracker.track_at("1.2.3.4", at).await.unwrap();
    tracker.track_at("5.6.7.8", at).await.unwrap();
    assert_eq!(counter.count_at(at).await.unwrap(), 2);

    // Redis TTL has one-second resolution.
    let ttl = store.time_to_live(&key).await.unwrap().expect("ttl set");
    assert!(ttl <= WINDOW_TTL && ttl >= WINDOW_TTL - Duration::from_secs(2));

    clear(&store, &key).await;
}

#[tokio::test]
async fn expire_replaces_a_longer_ttl() {
    let Some(store) = connect().await else {
        return;
    };
    let key = "snuggle:visitors:test-shrink";
    clear(&store, key).await;

    store.add_member(key, "a").await.unwrap();
    store
        .expire(key, Duration::from_secs(1000 * 60 * 60))
        .await
        .unwrap();
    store.expire(key, WINDOW_TTL).await.unwrap();

    let ttl = store.time_to_live(key).await.unwrap().expect("ttl set");
    assert!(ttl <= WINDOW_TTL);

    clear(&store, key).await;
}
