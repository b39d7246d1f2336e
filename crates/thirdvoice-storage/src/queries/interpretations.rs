// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interpretation history.

use rusqlite::params;
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::Interpretation;

use crate::database::{Database, map_tr_err};

pub async fn insert_interpretation(
    db: &Database,
    interpretation: &Interpretation,
) -> Result<(), ThirdVoiceError> {
    let i = interpretation.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO interpretations (id, user_id, contact_id, contact_name,
                     original_message, interpretation, interpretation_score, model_used, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    i.id,
                    i.user_id,
                    i.contact_id,
                    i.contact_name,
                    i.original_message,
                    i.interpretation,
                    i.interpretation_score,
                    i.model_used,
                    i.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Interpretations for one contact, newest first.
pub async fn list_interpretations(
    db: &Database,
    user_id: &str,
    contact_id: &str,
) -> Result<Vec<Interpretation>, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let contact_id = contact_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Interpretation>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, contact_id, contact_name, original_message, interpretation,
                        interpretation_score, model_used, created_at
                 FROM interpretations
                 WHERE user_id = ?1 AND contact_id = ?2
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id, contact_id], |row| {
                Ok(Interpretation {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    contact_id: row.get(2)?,
                    contact_name: row.get(3)?,
                    original_message: row.get(4)?,
                    interpretation: row.get(5)?,
                    interpretation_score: row.get(6)?,
                    model_used: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
