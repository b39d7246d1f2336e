// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. Do NOT open additional connections for writes.

use std::path::Path;
use std::time::Duration;

use thirdvoice_core::ThirdVoiceError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Converts a tokio-rusqlite failure into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ThirdVoiceError {
    ThirdVoiceError::Storage {
        source: Box::new(e),
    }
}

/// Per-connection settings. `foreign_keys` must be set on every connection
/// or contact deletion will not cascade.
fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "journal mode set");
    }
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs and
    /// runs migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, ThirdVoiceError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ThirdVoiceError::storage)?;
            }
        }

        // Migrations run on a short-lived blocking connection before the
        // long-lived async one is opened.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ThirdVoiceError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(ThirdVoiceError::storage)?;
            apply_pragmas(&conn, wal_mode).map_err(ThirdVoiceError::storage)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| ThirdVoiceError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(ThirdVoiceError::storage)?;
        conn.call(move |conn| -> Result<(), rusqlite::Error> { apply_pragmas(conn, wal_mode) })
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flushes the WAL into the main file.
    pub async fn checkpoint(&self) -> Result<(), ThirdVoiceError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoints and drops the connection.
    pub async fn close(self) -> Result<(), ThirdVoiceError> {
        self.checkpoint().await?;
        debug!("database closed");
        Ok(())
    }
}
