// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message history operations.

use rusqlite::params;
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::Message;

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_column, parse_optional_column};

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        contact_id: row.get(2)?,
        contact_name: row.get(3)?,
        original_text: row.get(4)?,
        result_text: row.get(5)?,
        message_type: parse_column(row, 6)?,
        healing_score: row.get(7)?,
        sentiment: parse_column(row, 8)?,
        emotional_state: parse_optional_column(row, 9)?,
        model_used: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Insert a new message.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), ThirdVoiceError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO messages (id, user_id, contact_id, contact_name, original_text,
                     result_text, message_type, healing_score, sentiment, emotional_state,
                     model_used, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    msg.id,
                    msg.user_id,
                    msg.contact_id,
                    msg.contact_name,
                    msg.original_text,
                    msg.result_text,
                    msg.message_type.to_string(),
                    msg.healing_score,
                    msg.sentiment.to_string(),
                    msg.emotional_state.map(|s| s.to_string()),
                    msg.model_used,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Messages for one contact in chronological order.
///
/// With a `limit`, only the most recent `limit` messages are returned (still
/// oldest first).
pub async fn list_messages(
    db: &Database,
    user_id: &str,
    contact_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Message>, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let contact_id = contact_id.to_string();
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.unwrap_or(-1);
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, contact_id, contact_name, original_text, result_text,
                        message_type, healing_score, sentiment, emotional_state, model_used,
                        created_at
                 FROM (
                     SELECT *, rowid AS seq FROM messages
                     WHERE user_id = ?1 AND contact_id = ?2
                     ORDER BY created_at DESC, seq DESC
                     LIMIT ?3
                 )
                 ORDER BY created_at ASC, seq ASC",
            )?;
            let rows = stmt.query_map(params![user_id, contact_id, limit], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
