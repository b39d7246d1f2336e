// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback submissions.

use rusqlite::params;
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::Feedback;

use crate::database::{Database, map_tr_err};

pub async fn insert_feedback(db: &Database, feedback: &Feedback) -> Result<(), ThirdVoiceError> {
    let f = feedback.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO feedback (id, user_id, rating, feedback_text, feature_context, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    f.id,
                    f.user_id,
                    f.rating,
                    f.feedback_text,
                    f.feature_context,
                    f.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
