//! Session state persistence against the file-backed store.

use chrono::{Duration, TimeZone, Utc};
use izzico_core::config::AssistantConfig;
use izzico_core::session_state::{SessionState, SessionStateRepository};
use izzico_core::storage::KeyValueStore;
use izzico_core::{AssistantError, Result};
use izzico_infrastructure::{JsonFileKeyValueStore, KvSessionStateRepository};
use std::sync::Arc;
use tempfile::TempDir;

fn file_repository(temp_dir: &TempDir) -> (Arc<JsonFileKeyValueStore>, KvSessionStateRepository) {
    let store = Arc::new(JsonFileKeyValueStore::new(temp_dir.path().join("state")));
    let repo = KvSessionStateRepository::new(store.clone(), &AssistantConfig::default()).unwrap();
    (store, repo)
}

fn sample_state(saved_at: chrono::DateTime<Utc>) -> SessionState {
    let mut state = SessionState::new(saved_at);
    state.is_open = true;
    state.rated_message_ids.insert("msg-1".to_string());
    state.rated_message_ids.insert("msg-2".to_string());
    state
}

#[test]
fn test_round_trip_within_ttl() {
    let temp_dir = TempDir::new().unwrap();
    let (_, repo) = file_repository(&temp_dir);
    let saved_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let state = sample_state(saved_at);

    repo.save(&state);

    let restored = repo.restore(saved_at + Duration::minutes(10)).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_stale_after_thirty_one_minutes() {
    let temp_dir = TempDir::new().unwrap();
    let (_, repo) = file_repository(&temp_dir);
    let saved_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    repo.save(&sample_state(saved_at));

    assert!(repo.restore(saved_at + Duration::minutes(30)).is_some());
    assert_eq!(repo.restore(saved_at + Duration::minutes(31)), None);
}

#[test]
fn test_clear_then_restore_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let (_, repo) = file_repository(&temp_dir);
    let now = Utc::now();

    repo.save(&sample_state(now));
    repo.clear();

    assert_eq!(repo.restore(now), None);
    repo.clear();
}

#[test]
fn test_legacy_unversioned_record_is_migrated() {
    let temp_dir = TempDir::new().unwrap();
    let (store, repo) = file_repository(&temp_dir);
    let saved_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    store
        .set(
            repo.key(),
            r#"{"isOpen":true,"ratedMessages":["msg-1","msg-2"],"timestamp":1700000000000}"#,
        )
        .unwrap();

    let restored = repo.restore(saved_at + Duration::minutes(1)).unwrap();
    assert_eq!(restored, sample_state(saved_at));
}

#[test]
fn test_garbage_record_is_absent_and_kept() {
    let temp_dir = TempDir::new().unwrap();
    let (store, repo) = file_repository(&temp_dir);
    store.set(repo.key(), "{not json").unwrap();

    assert_eq!(repo.restore(Utc::now()), None);
    assert_eq!(store.get(repo.key()).unwrap().as_deref(), Some("{not json"));
}

#[test]
fn test_saved_record_uses_wire_format() {
    let temp_dir = TempDir::new().unwrap();
    let (store, repo) = file_repository(&temp_dir);
    let saved_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    repo.save(&sample_state(saved_at));

    let raw = store.get(repo.key()).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], "1.1.0");
    assert_eq!(value["isOpen"], true);
    assert_eq!(value["ratedMessages"], serde_json::json!(["msg-1", "msg-2"]));
    assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
}

#[derive(Debug)]
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(AssistantError::storage("quota exceeded"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(AssistantError::storage("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(AssistantError::storage("quota exceeded"))
    }
}

#[test]
fn test_storage_failures_are_swallowed() {
    let repo = KvSessionStateRepository::new(Arc::new(BrokenStore), &AssistantConfig::default())
        .unwrap();
    let now = Utc::now();

    repo.save(&sample_state(now));
    repo.clear();
    assert_eq!(repo.restore(now), None);
}
