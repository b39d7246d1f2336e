// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use thirdvoice_config::model::StorageConfig;
use thirdvoice_core::types::{
    CacheEntry, CacheScope, Contact, Feedback, Interpretation, Message, RelationshipContext,
};
use thirdvoice_core::{AdapterType, HealthStatus, PluginAdapter, StorageAdapter, ThirdVoiceError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed persistence gateway.
///
/// The database is opened on [`StorageAdapter::initialize`]; every other
/// call fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Creates and initializes storage in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, ThirdVoiceError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    fn db(&self) -> Result<&Database, ThirdVoiceError> {
        self.db.get().ok_or_else(|| ThirdVoiceError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ThirdVoiceError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ThirdVoiceError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ThirdVoiceError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ThirdVoiceError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ThirdVoiceError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Contacts ---

    async fn create_contact(&self, contact: &Contact) -> Result<(), ThirdVoiceError> {
        queries::contacts::create_contact(self.db()?, contact).await
    }

    async fn get_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Option<Contact>, ThirdVoiceError> {
        queries::contacts::get_contact(self.db()?, user_id, contact_id).await
    }

    async fn get_contact_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Contact>, ThirdVoiceError> {
        queries::contacts::get_contact_by_name(self.db()?, user_id, name).await
    }

    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>, ThirdVoiceError> {
        queries::contacts::list_contacts(self.db()?, user_id).await
    }

    async fn update_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        name: &str,
        context: RelationshipContext,
    ) -> Result<bool, ThirdVoiceError> {
        queries::contacts::update_contact(self.db()?, user_id, contact_id, name, context).await
    }

    async fn delete_contact(&self, user_id: &str, contact_id: &str) -> Result<bool, ThirdVoiceError> {
        queries::contacts::delete_contact(self.db()?, user_id, contact_id).await
    }

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), ThirdVoiceError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn list_messages(
        &self,
        user_id: &str,
        contact_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ThirdVoiceError> {
        queries::messages::list_messages(self.db()?, user_id, contact_id, limit).await
    }

    // --- Response cache ---

    async fn find_cached_response(
        &self,
        scope: &CacheScope,
        message_hash: &str,
        now: &str,
    ) -> Result<Option<CacheEntry>, ThirdVoiceError> {
        queries::cache::find_cached_response(self.db()?, scope, message_hash, now).await
    }

    async fn insert_cached_response(&self, entry: &CacheEntry) -> Result<(), ThirdVoiceError> {
        queries::cache::insert_cached_response(self.db()?, entry).await
    }

    // --- Interpretations and feedback ---

    async fn insert_interpretation(
        &self,
        interpretation: &Interpretation,
    ) -> Result<(), ThirdVoiceError> {
        queries::interpretations::insert_interpretation(self.db()?, interpretation).await
    }

    async fn list_interpretations(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Vec<Interpretation>, ThirdVoiceError> {
        queries::interpretations::list_interpretations(self.db()?, user_id, contact_id).await
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), ThirdVoiceError> {
        queries::feedback::insert_feedback(self.db()?, feedback).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("test.db")));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(&db_path));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn calls_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("no_init.db")));

        assert!(storage.health_check().await.is_err());
        assert!(storage.list_contacts("u1").await.is_err());
    }

    #[tokio::test]
    async fn health_check_and_shutdown_after_open() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::open(make_config(&dir.path().join("health.db")))
            .await
            .unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.shutdown().await.unwrap();
    }
}
