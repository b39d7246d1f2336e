// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response-cache rows. Rows are only ever inserted; lookups mask expired ones.

use rusqlite::{OptionalExtension, params};
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::{CacheEntry, CacheScope};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<CacheEntry> {
    Ok(CacheEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        contact_id: row.get(2)?,
        message_hash: row.get(3)?,
        context: parse_column(row, 4)?,
        response_text: row.get(5)?,
        healing_score: row.get(6)?,
        sentiment: parse_column(row, 7)?,
        emotional_state: parse_column(row, 8)?,
        model_used: row.get(9)?,
        created_at: row.get(10)?,
        expires_at: row.get(11)?,
    })
}

/// Most recent unexpired entry for `message_hash` within `scope`.
///
/// `now` is a storage-format timestamp; rows with `expires_at >= now` are live.
pub async fn find_cached_response(
    db: &Database,
    scope: &CacheScope,
    message_hash: &str,
    now: &str,
) -> Result<Option<CacheEntry>, ThirdVoiceError> {
    let user_id = scope.user_id.clone();
    let contact_id = scope.contact_id.clone();
    let message_hash = message_hash.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<CacheEntry>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, user_id, contact_id, message_hash, context, response_text,
                        healing_score, sentiment, emotional_state, model_used, created_at,
                        expires_at
                 FROM ai_response_cache
                 WHERE user_id = ?1 AND contact_id = ?2 AND message_hash = ?3
                   AND expires_at >= ?4
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1",
                params![user_id, contact_id, message_hash, now],
                row_to_entry,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Append a cache row.
pub async fn insert_cached_response(db: &Database, entry: &CacheEntry) -> Result<(), ThirdVoiceError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO ai_response_cache (id, user_id, contact_id, message_hash, context,
                     response_text, healing_score, sentiment, emotional_state, model_used,
                     created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    entry.id,
                    entry.user_id,
                    entry.contact_id,
                    entry.message_hash,
                    entry.context.to_string(),
                    entry.response_text,
                    entry.healing_score,
                    entry.sentiment.to_string(),
                    entry.emotional_state.to_string(),
                    entry.model_used,
                    entry.created_at,
                    entry.expires_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
