// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and applied on every open. Refinery records what already ran in
//! `refinery_schema_history`.

use thirdvoice_core::ThirdVoiceError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies all pending migrations.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), ThirdVoiceError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(ThirdVoiceError::storage)?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
