// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./thirdvoice.toml` > `~/.config/thirdvoice/thirdvoice.toml`
//! > `/etc/thirdvoice/thirdvoice.toml` with environment variable overrides via
//! the `THIRDVOICE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ThirdVoiceConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/thirdvoice/thirdvoice.toml` (system-wide)
/// 3. `~/.config/thirdvoice/thirdvoice.toml` (user XDG config)
/// 4. `./thirdvoice.toml` (local directory)
/// 5. `THIRDVOICE_*` environment variables
pub fn load_config() -> Result<ThirdVoiceConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ThirdVoiceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThirdVoiceConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ThirdVoiceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ThirdVoiceConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ThirdVoiceConfig::default()))
        .merge(Toml::file("/etc/thirdvoice/thirdvoice.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("thirdvoice/thirdvoice.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("thirdvoice.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `THIRDVOICE_OPENROUTER_API_KEY` must map to `openrouter.api_key`,
/// not `openrouter.api.key`.
fn env_provider() -> Env {
    Env::prefixed("THIRDVOICE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: THIRDVOICE_MODELS_MODEL1 -> "models_model1"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("openrouter_", "openrouter.", 1)
            .replacen("models_", "models.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cache_", "cache.", 1);
        mapped.into()
    })
}
