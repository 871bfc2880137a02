//! Integration tests for the Redis-backed stores.
//!
//! Require a local redis-server on the default port; run with:
//! `cargo test -p common -- --ignored`

use common::{
    status_key, CredentialStore, ProcessingStatus, RedisClient, RedisCredentialStore,
    RedisStatusStore, StatusRecord, StatusStore,
};

async fn client() -> RedisClient {
    RedisClient::connect("redis://127.0.0.1:6379")
        .await
        .expect("redis-server must be running locally")
}

#[tokio::test]
#[ignore]
async fn test_status_record_round_trip() {
    let store = RedisStatusStore::new(client().await);
    let key = status_key("00Dtest", "integration-e1");

    let record = StatusRecord {
        status: ProcessingStatus::Processed,
        last_update: chrono::Utc::now().timestamp_millis(),
        attempt_count: 3,
    };
    store.put_status(&key, &record).await.unwrap();

    let fetched = store.get_status(&key).await.unwrap();
    assert_eq!(fetched, Some(record));
}

#[tokio::test]
#[ignore]
async fn test_missing_status_is_none() {
    let store = RedisStatusStore::new(client().await);
    let fetched = store
        .get_status(&status_key("00Dtest", "never-written"))
        .await
        .unwrap();
    assert_eq!(fetched, None);
}

#[tokio::test]
#[ignore]
async fn test_credential_miss_is_none() {
    let store = RedisCredentialStore::new(client().await);
    let fetched = store.get_connection("00Dno-such-org").await.unwrap();
    assert_eq!(fetched, None);
}
