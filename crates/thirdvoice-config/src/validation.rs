// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as sampling ranges, non-empty paths, and `modelN` key names.

use crate::diagnostic::ConfigError;
use crate::model::ThirdVoiceConfig;

/// Longest cache retention accepted, in days (about a century).
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ThirdVoiceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let url = config.openrouter.api_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(ConfigError::Validation {
            message: format!("openrouter.api_url `{url}` must be an http(s) URL"),
        });
    }

    if !(0.0..=2.0).contains(&config.openrouter.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openrouter.temperature must be between 0.0 and 2.0, got {}",
                config.openrouter.temperature
            ),
        });
    }

    if config.openrouter.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "openrouter.max_tokens must be at least 1".to_string(),
        });
    }

    if config.openrouter.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openrouter.timeout_secs must be at least 1".to_string(),
        });
    }

    // Model keys must be `model<N>` with N >= 1; anything else would be
    // silently ignored by the registry.
    for key in config.models.entries.keys() {
        let valid = key
            .strip_prefix("model")
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|n| n >= 1 && !key.starts_with("model0"));
        if !valid {
            errors.push(ConfigError::Validation {
                message: format!("models.{key} is not a recognized key, expected model1, model2, ..."),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.cache.retention_days == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.retention_days must be at least 1".to_string(),
        });
    } else if config.cache.retention_days > MAX_RETENTION_DAYS {
        errors.push(ConfigError::Validation {
            message: format!(
                "cache.retention_days must be at most {MAX_RETENTION_DAYS}, got {}",
                config.cache.retention_days
            ),
        });
    }

    if let Some(user_id) = &config.app.user_id {
        if user_id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "app.user_id must not be blank when set".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
