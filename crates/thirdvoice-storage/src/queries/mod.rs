// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.
//!
//! Every function takes the owning `user_id` and filters on it.

pub mod cache;
pub mod contacts;
pub mod feedback;
pub mod interpretations;
pub mod messages;

use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::Type;

/// Reads a text column and parses it into a strum/`FromStr` enum.
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Like [`parse_column`] for nullable columns.
pub(crate) fn parse_optional_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// True for a UNIQUE/PRIMARY KEY/FOREIGN KEY violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use thirdvoice_core::types::{Contact, RelationshipContext};

    use crate::database::Database;

    pub async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    pub fn contact(id: &str, user_id: &str, name: &str) -> Contact {
        Contact {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            context: RelationshipContext::Family,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }
}
