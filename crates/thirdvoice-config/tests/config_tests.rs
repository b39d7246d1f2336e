// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for loading, validating, and diagnosing configuration.

use thirdvoice_config::{
    ConfigError, ThirdVoiceConfig, load_and_validate_path, load_and_validate_str,
    load_config_from_str,
};

#[test]
fn full_config_parses() {
    let toml = r#"
[app]
log_level = "debug"
user_id = "user-42"

[openrouter]
api_key = "sk-or-test"
api_url = "http://127.0.0.1:9999/v1/chat/completions"
temperature = 0.5
max_tokens = 300
timeout_secs = 10
retry_delay_ms = 0
referer = "https://thirdvoice.example"
title = "Third Voice"

[models]
model1 = "meta-llama/llama-3.1-8b-instruct:free"
model2 = "google/gemma-2-9b-it:free"

[storage]
database_path = "/tmp/thirdvoice-test.db"
wal_mode = false

[cache]
enabled = false
retention_days = 3
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.app.user_id.as_deref(), Some("user-42"));
    assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-or-test"));
    assert_eq!(config.openrouter.max_tokens, 300);
    assert_eq!(config.openrouter.retry_delay_ms, 0);
    assert_eq!(config.openrouter.title.as_deref(), Some("Third Voice"));
    assert_eq!(
        config.models.get("model2"),
        Some("google/gemma-2-9b-it:free")
    );
    assert!(!config.storage.wal_mode);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.retention_days, 3);
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    let defaults = ThirdVoiceConfig::default();
    assert_eq!(config.app.log_level, "info");
    assert!(config.app.user_id.is_none());
    assert!(config.openrouter.api_key.is_none());
    assert_eq!(config.openrouter.api_url, defaults.openrouter.api_url);
    assert!((config.openrouter.temperature - 0.7).abs() < f32::EPSILON);
    assert!(config.models.entries.is_empty());
    assert_eq!(config.storage.database_path, defaults.storage.database_path);
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[openrouter]
api_kye = "sk-or-test"
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "api_kye");
            assert_eq!(suggestion.as_deref(), Some("api_key"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    let err = load_config_from_str(toml).expect_err("unknown section must fail");
    assert!(format!("{err}").contains("telemetry"));
}

#[test]
fn wrong_type_reports_invalid_type() {
    let toml = r#"
[openrouter]
max_tokens = "lots"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_tokens"))),
        "got: {errors:?}"
    );
}

#[test]
fn semantic_errors_surface_after_parsing() {
    let toml = r#"
[openrouter]
temperature = 4.0

[models]
primary = "a/b"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn file_config_loads_from_path() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "thirdvoice.toml",
            r#"
[models]
model1 = "file/model"

[cache]
retention_days = 14
"#,
        )?;

        let config = load_and_validate_path(std::path::Path::new("thirdvoice.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.models.get("model1"), Some("file/model"));
        assert_eq!(config.cache.retention_days, 14);
        Ok(())
    });
}

#[test]
fn unknown_key_in_file_carries_source_span() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "thirdvoice.toml",
            "[cache]\nenabled = true\nretention_dyas = 3\n",
        )?;

        let errors = load_and_validate_path(std::path::Path::new("thirdvoice.toml"))
            .expect_err("typo must be reported");
        match &errors[0] {
            ConfigError::UnknownKey {
                suggestion, span, ..
            } => {
                assert_eq!(suggestion.as_deref(), Some("retention_days"));
                assert!(span.is_some(), "span should point into the file");
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
        Ok(())
    });
}
