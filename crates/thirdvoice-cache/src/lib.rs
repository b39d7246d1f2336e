// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response cache keyed by normalized message content.
//!
//! Entries are partitioned by [`CacheScope`] and expire after a retention
//! window. The cache only appends; stale rows are ignored on lookup rather
//! than deleted. Storage failures never reach the caller: a failed lookup is a
//! miss and a failed store returns the entry unsaved.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use thirdvoice_config::model::CacheConfig;
use thirdvoice_core::types::{format_timestamp, new_id};
use thirdvoice_core::{
    CacheEntry, CacheScope, EmotionalState, RelationshipContext, Sentiment, StorageAdapter,
};

/// Lookup key for a message within a relationship context.
///
/// Case and surrounding whitespace do not change the key; the context does.
pub fn cache_key(message: &str, context: RelationshipContext) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.to_lowercase().trim().as_bytes());
    hasher.update(b"\n");
    hasher.update(context.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Fields of a generated response worth remembering.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResult {
    pub response_text: String,
    pub healing_score: u8,
    pub sentiment: Sentiment,
    pub emotional_state: EmotionalState,
    pub model_used: String,
}

pub struct ResponseCache {
    storage: Arc<dyn StorageAdapter>,
    retention: chrono::Duration,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(storage: Arc<dyn StorageAdapter>, retention: chrono::Duration) -> Self {
        Self {
            storage,
            retention,
            enabled: true,
        }
    }

    pub fn from_config(storage: Arc<dyn StorageAdapter>, config: &CacheConfig) -> Self {
        Self {
            storage,
            retention: chrono::Duration::days(i64::from(config.retention_days)),
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn lookup(
        &self,
        message: &str,
        context: RelationshipContext,
        scope: &CacheScope,
    ) -> Option<CacheEntry> {
        self.lookup_at(message, context, scope, Utc::now()).await
    }

    /// Most recent unexpired entry for this message in `scope` as of `now`.
    pub async fn lookup_at(
        &self,
        message: &str,
        context: RelationshipContext,
        scope: &CacheScope,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        if !self.enabled {
            return None;
        }
        let key = cache_key(message, context);
        match self
            .storage
            .find_cached_response(scope, &key, &format_timestamp(now))
            .await
        {
            Ok(Some(entry)) => {
                debug!(contact_id = %scope.contact_id, model = %entry.model_used, "cache hit");
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, contact_id = %scope.contact_id, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    pub async fn store(
        &self,
        message: &str,
        context: RelationshipContext,
        scope: &CacheScope,
        result: CachedResult,
    ) -> CacheEntry {
        self.store_at(message, context, scope, result, Utc::now()).await
    }

    /// Appends a new entry that expires one retention window after `now`.
    ///
    /// A retention window that runs past the representable date range is not
    /// stored; the returned entry then expires at `now`.
    pub async fn store_at(
        &self,
        message: &str,
        context: RelationshipContext,
        scope: &CacheScope,
        result: CachedResult,
        now: DateTime<Utc>,
    ) -> CacheEntry {
        let expires_at = now.checked_add_signed(self.retention);
        let entry = CacheEntry {
            id: new_id(),
            user_id: scope.user_id.clone(),
            contact_id: scope.contact_id.clone(),
            message_hash: cache_key(message, context),
            context,
            response_text: result.response_text,
            healing_score: result.healing_score,
            sentiment: result.sentiment,
            emotional_state: result.emotional_state,
            model_used: result.model_used,
            created_at: format_timestamp(now),
            expires_at: format_timestamp(expires_at.unwrap_or(now)),
        };
        if !self.enabled {
            return entry;
        }
        if expires_at.is_none() {
            warn!(
                contact_id = %scope.contact_id,
                retention_days = self.retention.num_days(),
                "cache retention overflows the calendar, response not stored"
            );
            return entry;
        }
        if let Err(e) = self.storage.insert_cached_response(&entry).await {
            warn!(error = %e, contact_id = %scope.contact_id, "failed to store cached response");
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_message_and_context_share_a_key() {
        let a = cache_key("Hello", RelationshipContext::Family);
        let b = cache_key("Hello", RelationshipContext::Family);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn key_ignores_case_and_surrounding_whitespace() {
        let base = cache_key("Hello", RelationshipContext::Family);
        assert_eq!(cache_key("hello", RelationshipContext::Family), base);
        assert_eq!(cache_key("  HELLO \n", RelationshipContext::Family), base);
    }

    #[test]
    fn context_changes_the_key() {
        assert_ne!(
            cache_key("Hello", RelationshipContext::Family),
            cache_key("Hello", RelationshipContext::Romantic)
        );
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert_ne!(
            cache_key("hello there", RelationshipContext::Friend),
            cache_key("hellothere", RelationshipContext::Friend)
        );
    }
}
