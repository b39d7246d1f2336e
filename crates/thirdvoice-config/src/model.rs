// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Third Voice.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Third Voice configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThirdVoiceConfig {
    /// Application identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Chat-completion gateway settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Ordered candidate models (`model1`, `model2`, ...).
    #[serde(default)]
    pub models: ModelsConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Application-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Identity used by the CLI when acting on stored data.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            user_id: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat-completion gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// Gateway API key. `None` requires the `OPENROUTER_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Full URL of the chat-completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Sampling temperature for coaching requests.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between fallback attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Optional `HTTP-Referer` attribution header.
    #[serde(default)]
    pub referer: Option<String>,

    /// Optional `X-Title` attribution header.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
            referer: None,
            title: None,
        }
    }
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// Candidate model identifiers keyed `model1`, `model2`, ...
///
/// Key order in the file is irrelevant; the numeric suffix decides priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ModelsConfig {
    pub entries: BTreeMap<String, String>,
}

impl ModelsConfig {
    /// Builds a model table from `(key, model)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builds `model1..=modelN` from an ordered list.
    pub fn from_ordered<I, V>(models: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::from_pairs(
            models
                .into_iter()
                .enumerate()
                .map(|(i, m)| (format!("model{}", i + 1), m.into())),
        )
    }

    /// Looks up a single numbered entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("thirdvoice").join("thirdvoice.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("thirdvoice.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether cached responses are consulted and written at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// How long a cached response stays valid, in days.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_retention_days() -> u32 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gateway_conventions() {
        let config = ThirdVoiceConfig::default();
        assert_eq!(
            config.openrouter.api_url,
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(config.openrouter.max_tokens, 500);
        assert_eq!(config.openrouter.timeout_secs, 25);
        assert_eq!(config.openrouter.retry_delay_ms, 500);
        assert_eq!(config.cache.retention_days, 7);
        assert!(config.cache.enabled);
        assert!(config.models.entries.is_empty());
    }

    #[test]
    fn from_ordered_numbers_from_one() {
        let models = ModelsConfig::from_ordered(["a/one", "b/two"]);
        assert_eq!(models.get("model1"), Some("a/one"));
        assert_eq!(models.get("model2"), Some("b/two"));
        assert_eq!(models.get("model3"), None);
    }

    #[test]
    fn models_table_deserializes_from_toml() {
        let toml_str = r#"
[models]
model2 = "second/model"
model1 = "first/model"
"#;
        let config: ThirdVoiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.get("model1"), Some("first/model"));
        assert_eq!(config.models.get("model2"), Some("second/model"));
    }
}
