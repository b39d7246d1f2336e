// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact CRUD operations.

use rusqlite::{OptionalExtension, params};
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::{Contact, RelationshipContext, now_timestamp};

use crate::database::{Database, map_tr_err};
use crate::queries::{is_constraint_violation, parse_column};

const COLUMNS: &str = "id, user_id, name, context, created_at, updated_at";

fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        context: parse_column(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Insert a contact. A duplicate name for the same user is a [`ThirdVoiceError::Conflict`].
pub async fn create_contact(db: &Database, contact: &Contact) -> Result<(), ThirdVoiceError> {
    let contact = contact.clone();
    let name = contact.name.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO contacts (id, user_id, name, context, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    contact.id,
                    contact.user_id,
                    contact.name,
                    contact.context.to_string(),
                    contact.created_at,
                    contact.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_constraint_violation(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(ThirdVoiceError::Conflict(format!(
            "a contact named '{name}' already exists"
        )))
    }
}

pub async fn get_contact(
    db: &Database,
    user_id: &str,
    contact_id: &str,
) -> Result<Option<Contact>, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let contact_id = contact_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Contact>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM contacts WHERE user_id = ?1 AND id = ?2"),
                params![user_id, contact_id],
                row_to_contact,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_contact_by_name(
    db: &Database,
    user_id: &str,
    name: &str,
) -> Result<Option<Contact>, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Contact>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM contacts WHERE user_id = ?1 AND name = ?2"),
                params![user_id, name],
                row_to_contact,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// All of a user's contacts, ordered by name.
pub async fn list_contacts(db: &Database, user_id: &str) -> Result<Vec<Contact>, ThirdVoiceError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Contact>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM contacts WHERE user_id = ?1 ORDER BY name COLLATE NOCASE ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], row_to_contact)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Update name and context. Returns `false` when no such contact exists.
pub async fn update_contact(
    db: &Database,
    user_id: &str,
    contact_id: &str,
    name: &str,
    context: RelationshipContext,
) -> Result<bool, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let contact_id = contact_id.to_string();
    let name = name.to_string();
    let conflict_name = name.clone();
    let updated_at = now_timestamp();

    // Ok(None) signals a uniqueness conflict.
    let changed = db
        .connection()
        .call(move |conn| -> Result<Option<usize>, rusqlite::Error> {
            let result = conn.execute(
                "UPDATE contacts SET name = ?1, context = ?2, updated_at = ?3
                 WHERE user_id = ?4 AND id = ?5",
                params![name, context.to_string(), updated_at, user_id, contact_id],
            );
            match result {
                Ok(n) => Ok(Some(n)),
                Err(e) if is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match changed {
        Some(n) => Ok(n > 0),
        None => Err(ThirdVoiceError::Conflict(format!(
            "a contact named '{conflict_name}' already exists"
        ))),
    }
}

/// Delete a contact. Messages, cache rows and interpretations go with it.
pub async fn delete_contact(
    db: &Database,
    user_id: &str,
    contact_id: &str,
) -> Result<bool, ThirdVoiceError> {
    let user_id = user_id.to_string();
    let contact_id = contact_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(
                "DELETE FROM contacts WHERE user_id = ?1 AND id = ?2",
                params![user_id, contact_id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}
