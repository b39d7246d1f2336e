// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fallback/retry loop.

use std::sync::Arc;
use std::time::Duration;

use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::traits::ProviderAdapter;
use thirdvoice_core::types::{CompletionOutcome, CompletionRequest, ResponseFormat};
use thirdvoice_router::{FallbackCursor, FallbackState, ModelRegistry};
use tracing::{debug, info, warn};

/// Pause between a failed attempt and the next model.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Everything about a completion except the model, which the loop picks.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub response_format: Option<ResponseFormat>,
}

impl CompletionParams {
    /// Params with the gateway defaults (0.7, 500 tokens, 25 s, plain text).
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(25),
            response_format: None,
        }
    }

    /// Params using the sampling settings from `[openrouter]`.
    pub fn from_config(
        config: &ThirdVoiceConfig,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            temperature: config.openrouter.temperature,
            max_tokens: config.openrouter.max_tokens,
            timeout: Duration::from_secs(config.openrouter.timeout_secs),
            ..Self::new(system_prompt, user_message)
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn json_object(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }

    fn request_for(&self, model: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            user_message: self.user_message.clone(),
            model: model.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
            response_format: self.response_format,
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// The model that produced `text`.
    pub model: String,
    /// Attempts made, including the successful one.
    pub attempts: usize,
    pub raw_payload: serde_json::Value,
}

/// Tries each candidate model in order until one succeeds.
///
/// Attempts are strictly sequential. Per-session position lives in the
/// caller's [`FallbackState`], which is borrowed mutably for the whole call.
#[derive(Clone)]
pub struct FallbackCompleter {
    provider: Arc<dyn ProviderAdapter>,
    registry: ModelRegistry,
    retry_delay: Duration,
}

impl FallbackCompleter {
    pub fn new(provider: Arc<dyn ProviderAdapter>, registry: ModelRegistry) -> Self {
        Self {
            provider,
            registry,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Builds the completer from `[models]` and `openrouter.retry_delay_ms`.
    pub fn from_config(provider: Arc<dyn ProviderAdapter>, config: &ThirdVoiceConfig) -> Self {
        Self::new(provider, ModelRegistry::from_config(&config.models))
            .with_retry_delay(Duration::from_millis(config.openrouter.retry_delay_ms))
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Runs the fallback loop.
    ///
    /// On success the state is reset to the primary model. On failure the
    /// state's index is put back to where it was on entry and the last
    /// failure reason is returned: [`ThirdVoiceError::ModelsExhausted`] for
    /// retryable failures, [`ThirdVoiceError::Provider`] when the gateway
    /// rejected the request outright.
    pub async fn complete(
        &self,
        state: &mut FallbackState,
        params: CompletionParams,
    ) -> Result<Completion, ThirdVoiceError> {
        let models = self.registry.list_models();
        let mut cursor = FallbackCursor::new(models, state);
        let entry_index = cursor.index();
        let max_attempts = models.len();

        let mut attempts = 0usize;
        let mut last_reason = String::from("no attempt made");

        while attempts < max_attempts {
            let model = cursor.current();
            attempts += 1;
            debug!(model, attempt = attempts, max_attempts, "completion attempt");

            match self.provider.attempt(&params.request_for(model)).await {
                CompletionOutcome::Success { text, raw_payload } => {
                    if attempts > 1 {
                        info!(model, attempts, "completion succeeded on fallback model");
                    }
                    cursor.reset();
                    return Ok(Completion {
                        text,
                        model: model.to_string(),
                        attempts,
                        raw_payload,
                    });
                }
                CompletionOutcome::RetryableFailure { reason } => {
                    warn!(model, attempt = attempts, reason = %reason, "completion attempt failed");
                    last_reason = reason;
                    if !cursor.advance() {
                        break;
                    }
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                CompletionOutcome::FatalFailure { reason } => {
                    warn!(model, reason = %reason, "completion rejected, not trying other models");
                    cursor.restore(entry_index);
                    return Err(ThirdVoiceError::Provider {
                        message: reason,
                        source: None,
                    });
                }
            }
        }

        cursor.restore(entry_index);
        warn!(attempts, last_reason = %last_reason, "all models failed");
        Err(ThirdVoiceError::ModelsExhausted {
            attempts,
            last_reason,
        })
    }
}
