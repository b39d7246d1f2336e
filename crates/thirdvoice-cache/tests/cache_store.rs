// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response cache behavior against real and failing storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use thirdvoice_cache::{CachedResult, ResponseCache, cache_key};
use thirdvoice_config::model::{CacheConfig, StorageConfig};
use thirdvoice_core::types::{Contact, Feedback, Interpretation, Message};
use thirdvoice_core::{
    AdapterType, CacheEntry, CacheScope, EmotionalState, HealthStatus, PluginAdapter,
    RelationshipContext, Sentiment, StorageAdapter, ThirdVoiceError,
};
use thirdvoice_storage::SqliteStorage;

fn at(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

fn result(text: &str) -> CachedResult {
    CachedResult {
        response_text: text.to_string(),
        healing_score: 8,
        sentiment: Sentiment::Positive,
        emotional_state: EmotionalState::Understanding,
        model_used: "a/one".to_string(),
    }
}

fn scope(contact_id: &str) -> CacheScope {
    CacheScope {
        user_id: "alice".to_string(),
        contact_id: contact_id.to_string(),
    }
}

async fn storage_with_contacts() -> (Arc<SqliteStorage>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(StorageConfig {
        database_path: dir.path().join("cache.db").to_string_lossy().into_owned(),
        wal_mode: true,
    })
    .await
    .unwrap();
    for (id, name) in [("c1", "Mom"), ("c2", "Dad")] {
        storage
            .create_contact(&Contact {
                id: id.to_string(),
                user_id: "alice".to_string(),
                name: name.to_string(),
                context: RelationshipContext::Family,
                created_at: "2026-03-01T00:00:00.000Z".to_string(),
                updated_at: "2026-03-01T00:00:00.000Z".to_string(),
            })
            .await
            .unwrap();
    }
    (Arc::new(storage), dir)
}

#[tokio::test]
async fn stored_response_is_found_with_normalized_message() {
    let (storage, _dir) = storage_with_contacts().await;
    let cache = ResponseCache::new(storage, Duration::days(7));
    let now = at("2026-03-01T12:00:00Z");

    let stored = cache
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi Mom"), now)
        .await;
    assert_eq!(stored.message_hash, cache_key("hello", RelationshipContext::Family));
    assert_eq!(stored.expires_at, "2026-03-08T12:00:00.000Z");

    let hit = cache
        .lookup_at("  hello ", RelationshipContext::Family, &scope("c1"), now)
        .await
        .expect("should hit");
    assert_eq!(hit.response_text, "Hi Mom");
    assert_eq!(hit.healing_score, 8);
    assert_eq!(hit.emotional_state, EmotionalState::Understanding);
}

#[tokio::test]
async fn other_contact_or_context_misses() {
    let (storage, _dir) = storage_with_contacts().await;
    let cache = ResponseCache::new(storage, Duration::days(7));
    let now = at("2026-03-01T12:00:00Z");
    cache
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi Mom"), now)
        .await;

    assert!(cache
        .lookup_at("Hello", RelationshipContext::Family, &scope("c2"), now)
        .await
        .is_none());
    assert!(cache
        .lookup_at("Hello", RelationshipContext::Romantic, &scope("c1"), now)
        .await
        .is_none());
}

#[tokio::test]
async fn entries_expire_after_retention() {
    let (storage, _dir) = storage_with_contacts().await;
    let cache = ResponseCache::new(storage, Duration::days(7));
    let stored_at = at("2026-03-01T12:00:00Z");
    cache
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi"), stored_at)
        .await;

    let last_valid = stored_at + Duration::days(7);
    assert!(cache
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), last_valid)
        .await
        .is_some());

    let after = last_valid + Duration::seconds(1);
    assert!(cache
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), after)
        .await
        .is_none());
}

#[tokio::test]
async fn newest_entry_wins() {
    let (storage, _dir) = storage_with_contacts().await;
    let cache = ResponseCache::new(storage, Duration::days(7));
    cache
        .store_at(
            "Hello",
            RelationshipContext::Family,
            &scope("c1"),
            result("first"),
            at("2026-03-01T12:00:00Z"),
        )
        .await;
    cache
        .store_at(
            "Hello",
            RelationshipContext::Family,
            &scope("c1"),
            result("second"),
            at("2026-03-02T12:00:00Z"),
        )
        .await;

    let hit = cache
        .lookup_at(
            "Hello",
            RelationshipContext::Family,
            &scope("c1"),
            at("2026-03-03T00:00:00Z"),
        )
        .await
        .unwrap();
    assert_eq!(hit.response_text, "second");
}

#[tokio::test]
async fn disabled_cache_never_hits_or_writes() {
    let (storage, _dir) = storage_with_contacts().await;
    let disabled = ResponseCache::from_config(
        storage.clone(),
        &CacheConfig {
            enabled: false,
            retention_days: 7,
        },
    );
    let now = at("2026-03-01T12:00:00Z");
    disabled
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi"), now)
        .await;
    assert!(disabled
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), now)
        .await
        .is_none());

    let enabled = ResponseCache::new(storage, Duration::days(7));
    assert!(enabled
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), now)
        .await
        .is_none());
}

/// Storage whose every call fails.
struct BrokenStorage;

fn broken() -> ThirdVoiceError {
    ThirdVoiceError::storage(std::io::Error::other("database is locked"))
}

#[async_trait]
impl PluginAdapter for BrokenStorage {
    fn name(&self) -> &str {
        "broken"
    }
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }
    async fn health_check(&self) -> Result<HealthStatus, ThirdVoiceError> {
        Err(broken())
    }
    async fn shutdown(&self) -> Result<(), ThirdVoiceError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for BrokenStorage {
    async fn initialize(&self) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
    async fn close(&self) -> Result<(), ThirdVoiceError> {
        Ok(())
    }
    async fn create_contact(&self, _: &Contact) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
    async fn get_contact(&self, _: &str, _: &str) -> Result<Option<Contact>, ThirdVoiceError> {
        Err(broken())
    }
    async fn get_contact_by_name(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Option<Contact>, ThirdVoiceError> {
        Err(broken())
    }
    async fn list_contacts(&self, _: &str) -> Result<Vec<Contact>, ThirdVoiceError> {
        Err(broken())
    }
    async fn update_contact(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: RelationshipContext,
    ) -> Result<bool, ThirdVoiceError> {
        Err(broken())
    }
    async fn delete_contact(&self, _: &str, _: &str) -> Result<bool, ThirdVoiceError> {
        Err(broken())
    }
    async fn insert_message(&self, _: &Message) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
    async fn list_messages(
        &self,
        _: &str,
        _: &str,
        _: Option<i64>,
    ) -> Result<Vec<Message>, ThirdVoiceError> {
        Err(broken())
    }
    async fn find_cached_response(
        &self,
        _: &CacheScope,
        _: &str,
        _: &str,
    ) -> Result<Option<CacheEntry>, ThirdVoiceError> {
        Err(broken())
    }
    async fn insert_cached_response(&self, _: &CacheEntry) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
    async fn insert_interpretation(&self, _: &Interpretation) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
    async fn list_interpretations(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Vec<Interpretation>, ThirdVoiceError> {
        Err(broken())
    }
    async fn insert_feedback(&self, _: &Feedback) -> Result<(), ThirdVoiceError> {
        Err(broken())
    }
}

#[tokio::test]
async fn storage_failures_degrade_to_miss_and_unsaved_entry() {
    let cache = ResponseCache::new(Arc::new(BrokenStorage), Duration::days(7));
    let now = at("2026-03-01T12:00:00Z");

    assert!(cache
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), now)
        .await
        .is_none());

    let entry = cache
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi"), now)
        .await;
    assert_eq!(entry.response_text, "Hi");
    assert_eq!(entry.user_id, "alice");
}

#[tokio::test]
async fn retention_past_the_calendar_skips_the_store() {
    let (storage, _dir) = storage_with_contacts().await;
    let cache = ResponseCache::from_config(
        storage,
        &CacheConfig {
            enabled: true,
            retention_days: 100_000_000,
        },
    );
    let now = at("2026-03-01T12:00:00Z");

    let entry = cache
        .store_at("Hello", RelationshipContext::Family, &scope("c1"), result("Hi"), now)
        .await;
    assert_eq!(entry.response_text, "Hi");
    assert_eq!(entry.expires_at, entry.created_at);

    assert!(cache
        .lookup_at("Hello", RelationshipContext::Family, &scope("c1"), now)
        .await
        .is_none());
}
