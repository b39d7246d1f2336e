// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter-compatible chat-completion provider for Third Voice.
//!
//! This crate implements [`ProviderAdapter`] over an OpenAI-style
//! `/chat/completions` endpoint. One call is one attempt against one model.

pub mod client;
pub mod types;

use async_trait::async_trait;
use secrecy::SecretString;
use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::error::ThirdVoiceError;
use thirdvoice_core::traits::{PluginAdapter, ProviderAdapter};
use thirdvoice_core::types::{AdapterType, CompletionOutcome, CompletionRequest, HealthStatus};
use tracing::info;

pub use crate::client::{DEFAULT_API_URL, OpenRouterClient, classify};

/// Environment variable consulted when `openrouter.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Chat-completion provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENROUTER_API_KEY` env var -> error.
pub struct OpenRouterProvider {
    client: OpenRouterClient,
}

impl OpenRouterProvider {
    /// Creates a provider from the `[openrouter]` section.
    pub fn new(config: &ThirdVoiceConfig) -> Result<Self, ThirdVoiceError> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        let api_key = resolve_api_key(config.openrouter.api_key.as_deref(), env_key.as_deref())?;

        let client = OpenRouterClient::new(
            &api_key,
            config.openrouter.api_url.clone(),
            config.openrouter.referer.as_deref(),
            config.openrouter.title.as_deref(),
        )?;

        info!(api_url = %config.openrouter.api_url, "OpenRouter provider initialized");

        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ThirdVoiceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ThirdVoiceError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterProvider {
    async fn attempt(&self, request: &CompletionRequest) -> CompletionOutcome {
        self.client.attempt(request).await
    }
}

/// Picks the API key: a non-blank configured value wins, then a non-blank
/// environment value. Anything else is a configuration error.
pub fn resolve_api_key(
    configured: Option<&str>,
    from_env: Option<&str>,
) -> Result<SecretString, ThirdVoiceError> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .or_else(|| from_env.map(str::trim).filter(|key| !key.is_empty()))
        .map(|key| SecretString::from(key.to_string()))
        .ok_or_else(|| {
            ThirdVoiceError::Config(format!(
                "OpenRouter API key not found. Set openrouter.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}
