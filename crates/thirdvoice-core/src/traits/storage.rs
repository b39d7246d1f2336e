// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persistence gateway.

use async_trait::async_trait;

use crate::error::ThirdVoiceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    CacheEntry, CacheScope, Contact, Feedback, Interpretation, Message, RelationshipContext,
};

/// Table-style persistence for contacts, messages, cached responses,
/// interpretations, and feedback.
///
/// Every read and write is filtered by `user_id`; one user can never observe
/// another user's rows through this interface. Deleting a contact removes its
/// messages and cache rows through the backend's referential constraints.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ThirdVoiceError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ThirdVoiceError>;

    // --- Contacts ---

    /// Inserts a contact. Fails with [`ThirdVoiceError::Conflict`] when the
    /// user already has a contact with the same name.
    async fn create_contact(&self, contact: &Contact) -> Result<(), ThirdVoiceError>;

    async fn get_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Option<Contact>, ThirdVoiceError>;

    async fn get_contact_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Contact>, ThirdVoiceError>;

    /// Lists the user's contacts ordered by name.
    async fn list_contacts(&self, user_id: &str) -> Result<Vec<Contact>, ThirdVoiceError>;

    /// Renames and/or re-contextualizes a contact. Returns `false` if no row matched.
    async fn update_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        name: &str,
        context: RelationshipContext,
    ) -> Result<bool, ThirdVoiceError>;

    /// Deletes a contact and, by cascade, its messages. Returns `false` if no row matched.
    async fn delete_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<bool, ThirdVoiceError>;

    // --- Messages ---

    async fn insert_message(&self, message: &Message) -> Result<(), ThirdVoiceError>;

    /// Messages for one contact in chronological order. `limit` keeps the most recent rows.
    async fn list_messages(
        &self,
        user_id: &str,
        contact_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ThirdVoiceError>;

    // --- Response cache ---

    /// Most recent entry matching `message_hash` within `scope` whose
    /// `expires_at` is not before `now`.
    async fn find_cached_response(
        &self,
        scope: &CacheScope,
        message_hash: &str,
        now: &str,
    ) -> Result<Option<CacheEntry>, ThirdVoiceError>;

    /// Appends a cache row. Never replaces existing rows.
    async fn insert_cached_response(&self, entry: &CacheEntry) -> Result<(), ThirdVoiceError>;

    // --- Interpretations and feedback ---

    async fn insert_interpretation(
        &self,
        interpretation: &Interpretation,
    ) -> Result<(), ThirdVoiceError>;

    async fn list_interpretations(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Vec<Interpretation>, ThirdVoiceError>;

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), ThirdVoiceError>;
}
