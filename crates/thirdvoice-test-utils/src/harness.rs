// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete coaching stack with a mock gateway,
//! a temp SQLite database, and a fixed identity.

use std::sync::Arc;
use std::time::Duration;

use thirdvoice_cache::ResponseCache;
use thirdvoice_coach::{Coach, CoachSession, StaticIdentity};
use thirdvoice_config::model::{CacheConfig, ModelsConfig, StorageConfig, ThirdVoiceConfig};
use thirdvoice_core::{Contact, RelationshipContext, StorageAdapter, ThirdVoiceError};
use thirdvoice_resilience::{FallbackCompleter, ModelRegistry};
use thirdvoice_storage::SqliteStorage;

use crate::mock_provider::MockProvider;

/// User id the harness signs in as unless told otherwise.
pub const TEST_USER: &str = "test-user";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    models: Vec<String>,
    cache_enabled: bool,
    user_id: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            models: vec!["mock/model-1".to_string(), "mock/model-2".to_string()],
            cache_enabled: true,
            user_id: Some(TEST_USER.to_string()),
        }
    }

    /// Set the candidate model list, in fallback order.
    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_cache_disabled(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Build with nobody signed in.
    pub fn signed_out(mut self) -> Self {
        self.user_id = None;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, ThirdVoiceError> {
        let temp_dir = tempfile::TempDir::new().map_err(ThirdVoiceError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = ThirdVoiceConfig::default();
        config.models = ModelsConfig::from_ordered(self.models);
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.cache = CacheConfig {
            enabled: self.cache_enabled,
            ..CacheConfig::default()
        };
        config.app.user_id = self.user_id;

        let storage = SqliteStorage::open(config.storage.clone()).await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let mock_provider = Arc::new(MockProvider::new());
        let completer = FallbackCompleter::new(
            mock_provider.clone(),
            ModelRegistry::from_config(&config.models),
        )
        .with_retry_delay(Duration::ZERO);
        let cache = ResponseCache::from_config(storage.clone(), &config.cache);
        let identity = Arc::new(StaticIdentity::from_config(&config.app));

        let coach = Coach::new(completer, cache, storage.clone(), identity, config.clone());

        Ok(TestHarness {
            coach,
            mock_provider,
            storage,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully assembled test environment.
pub struct TestHarness {
    pub coach: Coach,
    /// The mock gateway; queue outcomes on it before driving the coach.
    pub mock_provider: Arc<MockProvider>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    pub config: ThirdVoiceConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn session(&self) -> Result<CoachSession, ThirdVoiceError> {
        self.coach.start_session().await
    }

    /// Adds a contact for the signed-in user.
    pub async fn add_contact(
        &self,
        name: &str,
        context: RelationshipContext,
    ) -> Result<Contact, ThirdVoiceError> {
        self.coach.add_contact(name, context).await
    }
}
