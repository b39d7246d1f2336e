// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Third Voice.

use thiserror::Error;

/// The primary error type used across all Third Voice adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ThirdVoiceError {
    /// Configuration errors (invalid TOML, missing credentials, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The completion gateway rejected the request in a way no other model can fix
    /// (bad credentials, exhausted account credit).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Every configured model failed with a retryable error.
    #[error("all {attempts} models failed, last error: {last_reason}")]
    ModelsExhausted { attempts: usize, last_reason: String },

    /// The model answered, but not in the structured shape that was asked for.
    ///
    /// `raw` carries the untouched reply so callers can still show it.
    #[error("malformed model output: {reason}")]
    MalformedOutput { raw: String, reason: String },

    /// No authenticated user is available for a user-scoped operation.
    #[error("not authenticated")]
    Unauthenticated,

    /// A user-scoped entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness constraint would be violated (e.g. duplicate contact name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller-supplied input was rejected before any work was done.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ThirdVoiceError {
    /// Wraps any error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
