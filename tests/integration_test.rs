//! Integration Tests - End-to-end Engine Component Testing
//!
//! Tests the interaction between repositories, the key-value port, and
//! concrete adapters. Uses mockall for trait mocking and tokio::test
//! for async tests; the in-memory adapter backs the end-to-end flows.

use std::sync::Arc;

use mockall::mock;
use tokio::time::Duration;

use habit_ledger::adapters::persistence::InMemoryKvStore;
use habit_ledger::domain::drink::{DrinkEntry, DrinkRecord, DrinkType, DrinkUnit};
use habit_ledger::domain::record::{DayBucket, HabitEvent, HabitStore, NO_TIME_LABEL};
use habit_ledger::ports::kv_store::KeyValueStore;
use habit_ledger::usecases::{CombinedTracker, DrinkLog, HabitLog, RecordKind};

// ---- Mock Definitions ----

mock! {
    pub Kv {}

    #[async_trait::async_trait]
    impl habit_ledger::ports::kv_store::KeyValueStore for Kv {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
        async fn remove(&self, key: &str) -> anyhow::Result<()>;
    }
}

const TTL: Duration = Duration::from_millis(5000);

fn habit_log_over(store: Arc<InMemoryKvStore>) -> HabitLog<InMemoryKvStore> {
    HabitLog::new(store, "abstinenceRecords", TTL)
}

fn drink_log_over(store: Arc<InMemoryKvStore>) -> DrinkLog<InMemoryKvStore> {
    DrinkLog::new(store, "alcoholRecords", TTL)
}

fn beer_session(id: &str, date: &str, time: &str) -> DrinkRecord {
    let entry =
        DrinkEntry::new("d1", DrinkType::Beer, 500.0, 4.5, 1, DrinkUnit::Bottle).unwrap();
    DrinkRecord::new(
        id,
        date,
        format!("{date}T{time}:00+09:00"),
        time,
        vec![entry],
    )
}

// ---- Error-path behavior over mocked storage ----

#[tokio::test]
async fn test_write_failure_propagates_and_cache_stays_clean() {
    let mut mock_kv = MockKv::new();

    // One initial read; the failed write must not refresh the cache,
    // but the empty snapshot cached by that read stays valid, so no
    // second read happens either.
    mock_kv.expect_get().times(1).returning(|_| Ok(None));
    mock_kv
        .expect_set()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));

    let mut log = HabitLog::new(Arc::new(mock_kv), "abstinenceRecords", TTL);

    let err = log.add_event("2024-01-15").await.unwrap_err();
    assert!(err.to_string().contains("Failed to write habit log"));

    // Served from the pre-write snapshot: still empty, no extra get.
    let data = log.load().await;
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_read_failure_substitutes_empty_store() {
    let mut mock_kv = MockKv::new();
    mock_kv
        .expect_get()
        .returning(|_| Err(anyhow::anyhow!("storage unreadable")));

    let mut log = HabitLog::new(Arc::new(mock_kv), "abstinenceRecords", TTL);
    assert!(log.load().await.is_empty());
}

#[tokio::test]
async fn test_unparsable_payload_is_soft_and_not_cached() {
    let mut mock_kv = MockKv::new();
    // Two loads must hit storage twice: the failure path never caches.
    mock_kv
        .expect_get()
        .times(2)
        .returning(|_| Ok(Some("{not valid json".to_string())));

    let mut log = HabitLog::new(Arc::new(mock_kv), "abstinenceRecords", TTL);
    assert!(log.load().await.is_empty());
    assert!(log.load().await.is_empty());
}

// ---- End-to-end flows over the in-memory adapter ----

#[tokio::test]
async fn test_habit_add_and_delete_maintain_rollups() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut log = habit_log_over(Arc::clone(&store));

    let data = log.add_event("2024-01-15").await.unwrap();
    let data2 = log.add_event("2024-01-15").await.unwrap();

    let bucket = &data2["2024-01-15"];
    assert_eq!(bucket.count, 2);
    assert_eq!(bucket.count as usize, bucket.records.len());
    assert_eq!(bucket.last_record_time, bucket.records[1].time);

    let first_id = data["2024-01-15"].records[0].id.clone();
    let second_id = bucket.records[1].id.clone();
    assert_ne!(first_id, second_id);

    let after_delete = log.delete_event("2024-01-15", &second_id).await.unwrap();
    let bucket = &after_delete["2024-01-15"];
    assert_eq!(bucket.count, 1);
    assert_eq!(bucket.last_record_time, bucket.records[0].time);

    // Deleting the last event removes the date key entirely.
    let emptied = log.delete_event("2024-01-15", &first_id).await.unwrap();
    assert!(!emptied.contains_key("2024-01-15"));
}

#[tokio::test]
async fn test_delete_unknown_is_silent_noop() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut log = habit_log_over(Arc::clone(&store));

    let data = log.add_event("2024-01-15").await.unwrap();
    let unchanged = log.delete_event("2024-01-15", "no-such-id").await.unwrap();
    assert_eq!(unchanged, data);

    let unchanged = log.delete_event("2024-02-01", "anything").await.unwrap();
    assert_eq!(unchanged, data);
}

#[tokio::test]
async fn test_legacy_array_payload_upgraded_on_read() {
    let store = Arc::new(InMemoryKvStore::new());
    store
        .set("abstinenceRecords", r#"["2024-01-10", "2024-01-12"]"#)
        .await
        .unwrap();

    let mut log = habit_log_over(Arc::clone(&store));
    let data = log.load().await;

    assert_eq!(data.len(), 2);
    let bucket = &data["2024-01-10"];
    assert_eq!(bucket.count, 1);
    assert_eq!(bucket.last_record_time, NO_TIME_LABEL);
    assert_eq!(bucket.records[0].id, "2024-01-10-1");
}

#[tokio::test]
async fn test_save_load_round_trip_is_idempotent() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut log = habit_log_over(Arc::clone(&store));
    log.add_event("2024-01-15").await.unwrap();
    log.add_event("2024-01-15").await.unwrap();
    let original = store.get("abstinenceRecords").await.unwrap().unwrap();

    // Fresh repository instance: cache is cold, the load re-parses.
    let mut fresh = habit_log_over(Arc::clone(&store));
    let data = fresh.load().await;
    fresh.save(&data).await.unwrap();

    let rewritten = store.get("abstinenceRecords").await.unwrap().unwrap();
    assert_eq!(original, rewritten);
}

#[tokio::test]
async fn test_partial_bucket_payload_survives_next_write() {
    let store = Arc::new(InMemoryKvStore::new());
    store
        .set(
            "abstinenceRecords",
            r#"{"2024-01-10": {"count": 2, "lastRecordTime": "08:30"}}"#,
        )
        .await
        .unwrap();

    let mut log = habit_log_over(Arc::clone(&store));

    // The records-less bucket is healed, not dropped.
    let data = log.load().await;
    let bucket = &data["2024-01-10"];
    assert_eq!(bucket.count, 2);
    assert_eq!(bucket.records.len(), 1);
    assert_eq!(bucket.records[0].time, "08:30");

    // A follow-up mutation writes through without erasing the old date.
    let data = log.add_event("2024-01-15").await.unwrap();
    assert!(data.contains_key("2024-01-10"));

    let mut fresh = habit_log_over(Arc::clone(&store));
    let persisted = fresh.load().await;
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted["2024-01-10"].records[0].id, "2024-01-10-1");
}

#[tokio::test(start_paused = true)]
async fn test_cache_serves_within_ttl_and_refetches_after() {
    let store = Arc::new(InMemoryKvStore::new());
    store
        .set("abstinenceRecords", r#"["2024-01-10"]"#)
        .await
        .unwrap();

    let mut log = habit_log_over(Arc::clone(&store));
    let first = log.load().await;
    assert_eq!(first.len(), 1);

    // Change the payload behind the repository's back.
    store
        .set("abstinenceRecords", r#"["2024-01-10", "2024-01-11"]"#)
        .await
        .unwrap();

    // Within the TTL the stale snapshot is served.
    tokio::time::advance(Duration::from_millis(4000)).await;
    assert_eq!(log.load().await, first);

    // Past the TTL the store is consulted again.
    tokio::time::advance(Duration::from_millis(1001)).await;
    assert_eq!(log.load().await.len(), 2);
}

#[tokio::test]
async fn test_drink_update_subtracts_old_adds_new() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut log = drink_log_over(Arc::clone(&store));

    log.add_record(beer_session("r1", "2024-01-15", "19:00"))
        .await
        .unwrap();
    log.add_record(beer_session("r2", "2024-01-15", "22:00"))
        .await
        .unwrap();

    let soju = DrinkEntry::new("d2", DrinkType::Soju, 360.0, 17.0, 2, DrinkUnit::Bottle).unwrap();
    let updated = DrinkRecord::new(
        "r1",
        "2024-01-15",
        "2024-01-15T19:30:00+09:00",
        "19:30",
        vec![soju],
    );
    let expected_volume = updated.total_volume + 500.0;
    let expected_grams = updated.total_alcohol_content
        + beer_session("r2", "2024-01-15", "22:00").total_alcohol_content;

    let data = log.update_record("2024-01-15", "r1", updated).await.unwrap();
    let bucket = &data["2024-01-15"];

    assert_eq!(bucket.records.len(), 2);
    assert_eq!(bucket.records[0].id, "r1");
    assert!((bucket.total_volume - expected_volume).abs() < 1e-9);
    assert!((bucket.total_alcohol_content - expected_grams).abs() < 1e-9);
}

#[tokio::test]
async fn test_drink_delete_last_record_removes_date() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut log = drink_log_over(Arc::clone(&store));

    log.add_record(beer_session("r1", "2024-01-15", "19:00"))
        .await
        .unwrap();
    let data = log.delete_record("2024-01-15", "r1").await.unwrap();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_combined_feed_orders_by_timestamp_descending() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut tracker =
        CombinedTracker::with_store(Arc::clone(&store), "abstinenceRecords", "alcoholRecords", TTL);

    // One primary event on Jan 1, one secondary on Jan 2 with a later
    // timestamp. Inject the primary store directly to pin timestamps.
    let mut habit_data = HabitStore::new();
    habit_data.insert(
        "2024-01-01".to_string(),
        DayBucket::single(HabitEvent {
            id: "h1".to_string(),
            timestamp: "2024-01-01T10:00:00+09:00".to_string(),
            time: "10:00".to_string(),
        }),
    );
    tracker.habits_mut().save(&habit_data).await.unwrap();
    tracker
        .drinks_mut()
        .add_record(beer_session("a1", "2024-01-02", "20:00"))
        .await
        .unwrap();

    let feed = tracker.load().await;

    assert_eq!(feed.total_records, 2);
    assert_eq!(feed.total_days, 2);
    assert_eq!(feed.primary_records, 1);
    assert_eq!(feed.secondary_records, 1);
    assert_eq!(feed.primary_days, 1);
    assert_eq!(feed.secondary_days, 1);

    assert_eq!(feed.records[0].kind, RecordKind::Secondary);
    assert_eq!(feed.records[0].id, "a1");
    assert_eq!(feed.records[1].kind, RecordKind::Primary);
    assert_eq!(feed.records[0].seq, 1);
    assert_eq!(feed.records[0].display_date, "2024년 1월 2일 (화)");
}

#[tokio::test]
async fn test_combined_delete_routes_by_kind() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut tracker =
        CombinedTracker::with_store(Arc::clone(&store), "abstinenceRecords", "alcoholRecords", TTL);

    tracker
        .drinks_mut()
        .add_record(beer_session("a1", "2024-01-02", "20:00"))
        .await
        .unwrap();
    let habit_data = tracker.habits_mut().add_event("2024-01-01").await.unwrap();
    let habit_id = habit_data["2024-01-01"].records[0].id.clone();

    tracker
        .delete(RecordKind::Secondary, "2024-01-02", "a1")
        .await
        .unwrap();

    let feed = tracker.load().await;
    assert_eq!(feed.secondary_records, 0);
    assert_eq!(feed.primary_records, 1);
    assert_eq!(feed.records[0].id, habit_id);
}

#[tokio::test]
async fn test_clear_all_removes_both_keys_and_is_idempotent() {
    let store = Arc::new(InMemoryKvStore::new());
    let mut tracker =
        CombinedTracker::with_store(Arc::clone(&store), "abstinenceRecords", "alcoholRecords", TTL);

    tracker.habits_mut().add_event("2024-01-01").await.unwrap();
    tracker
        .drinks_mut()
        .add_record(beer_session("a1", "2024-01-02", "20:00"))
        .await
        .unwrap();

    tracker.clear_all().await.unwrap();
    assert!(store.is_empty().await);

    // Clearing absent keys must not error.
    tracker.clear_all().await.unwrap();

    let feed = tracker.load().await;
    assert_eq!(feed.total_records, 0);
}

// ---- Documented limitation: no per-key write serialization ----

#[tokio::test]
async fn test_overlapping_writers_last_save_wins() {
    // Two repository instances over the same key model two interleaved
    // UI call chains. Writer A loads (and caches) before writer B's
    // mutation lands, so A's later save silently drops B's event.
    // This is the accepted single-threaded-UI design, not a bug.
    let store = Arc::new(InMemoryKvStore::new());
    let mut writer_a = habit_log_over(Arc::clone(&store));
    let mut writer_b = habit_log_over(Arc::clone(&store));

    let _ = writer_a.load().await;
    writer_b.add_event("2024-01-01").await.unwrap();
    let final_store = writer_a.add_event("2024-01-02").await.unwrap();

    assert!(final_store.contains_key("2024-01-02"));
    assert!(!final_store.contains_key("2024-01-01"));

    let mut fresh = habit_log_over(Arc::clone(&store));
    let persisted = fresh.load().await;
    assert_eq!(persisted.len(), 1);
    assert!(persisted.contains_key("2024-01-02"));
}
