// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thirdvoice check` command implementation.
//!
//! Runs diagnostic checks against the local setup to identify configuration
//! issues, storage problems, and missing credentials. Never calls the gateway.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::{HealthStatus, PluginAdapter, StorageAdapter, ThirdVoiceError};
use thirdvoice_openrouter::{API_KEY_ENV, resolve_api_key};
use thirdvoice_resilience::ModelRegistry;
use thirdvoice_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `thirdvoice check` command.
///
/// Returns an error when any check failed so the process exits non-zero.
pub async fn run_check(config: &ThirdVoiceConfig, plain: bool) -> Result<(), ThirdVoiceError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![
        check_api_key(config),
        check_models(config),
        check_identity(config),
        check_database(config).await,
    ];

    println!();
    println!("  thirdvoice check");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warnings = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();
    if failures + warnings == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failures + warnings;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    }
    println!();

    if failures > 0 {
        Err(ThirdVoiceError::Config(format!("{failures} check(s) failed")))
    } else {
        Ok(())
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<12} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<12} {} ({duration_ms}ms)", result.name, result.message)
    }
}

fn check_api_key(config: &ThirdVoiceConfig) -> CheckResult {
    let start = Instant::now();
    let env_key = std::env::var(API_KEY_ENV).ok();
    match resolve_api_key(config.openrouter.api_key.as_deref(), env_key.as_deref()) {
        Ok(_) => {
            let source = if config
                .openrouter
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty())
            {
                "from config"
            } else {
                "from environment"
            };
            CheckResult::new("API key", CheckStatus::Pass, source, start)
        }
        Err(_) => CheckResult::new(
            "API key",
            CheckStatus::Fail,
            format!("not set (openrouter.api_key or {API_KEY_ENV})"),
            start,
        ),
    }
}

fn check_models(config: &ThirdVoiceConfig) -> CheckResult {
    let start = Instant::now();
    let registry = ModelRegistry::from_config(&config.models);
    if config.models.entries.is_empty() {
        CheckResult::new(
            "Models",
            CheckStatus::Warn,
            format!("none configured, using {}", registry.primary()),
            start,
        )
    } else {
        CheckResult::new(
            "Models",
            CheckStatus::Pass,
            format!("{} candidate(s), primary {}", registry.len(), registry.primary()),
            start,
        )
    }
}

fn check_identity(config: &ThirdVoiceConfig) -> CheckResult {
    let start = Instant::now();
    match config.app.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            CheckResult::new("User", CheckStatus::Pass, id.to_string(), start)
        }
        _ => CheckResult::new(
            "User",
            CheckStatus::Warn,
            "no app.user_id; pass --user for data commands",
            start,
        ),
    }
}

/// Opens the database (running migrations) and pings it.
async fn check_database(config: &ThirdVoiceConfig) -> CheckResult {
    let start = Instant::now();
    let storage = match SqliteStorage::open(config.storage.clone()).await {
        Ok(storage) => storage,
        Err(e) => return CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    };
    let result = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            config.storage.database_path.clone(),
            start,
        ),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Database", CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Database", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    };
    let _ = storage.close().await;
    result
}
