// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion gateway for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with a queue of scripted
//! outcomes and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use thirdvoice_core::traits::adapter::PluginAdapter;
use thirdvoice_core::traits::provider::ProviderAdapter;
use thirdvoice_core::types::{AdapterType, CompletionOutcome, CompletionRequest, HealthStatus};
use thirdvoice_core::ThirdVoiceError;

/// A mock gateway that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a
/// retryable "no valid response" failure is returned.
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<CompletionOutcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<CompletionOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful completion with `text`.
    pub async fn push_success(&self, text: impl Into<String>) {
        let text = text.into();
        self.outcomes.lock().await.push_back(CompletionOutcome::Success {
            raw_payload: serde_json::json!({ "choices": [{ "message": { "content": text } }] }),
            text,
        });
    }

    pub async fn push_retryable(&self, reason: impl Into<String>) {
        self.outcomes
            .lock()
            .await
            .push_back(CompletionOutcome::RetryableFailure {
                reason: reason.into(),
            });
    }

    pub async fn push_fatal(&self, reason: impl Into<String>) {
        self.outcomes
            .lock()
            .await
            .push_back(CompletionOutcome::FatalFailure {
                reason: reason.into(),
            });
    }

    /// Models requested so far, in order.
    pub async fn requested_models(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON body shaped like a structured coaching reply.
pub fn coach_reply_json(message: &str, sentiment: &str, emotional_state: &str) -> String {
    serde_json::json!({
        "transformed_message": message,
        "sentiment": sentiment,
        "emotional_state": emotional_state,
        "explanation": "mock explanation",
    })
    .to_string()
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ProviderAdapter for MockProvider {
    async fn attempt(&self, request: &CompletionRequest) -> CompletionOutcome {
        self.requests.lock().await.push(request.clone());
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| CompletionOutcome::RetryableFailure {
                reason: "no valid response".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "sys".to_string(),
            user_message: "hi".to_string(),
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 100,
            timeout: Duration::from_secs(5),
            response_format: None,
        }
    }

    #[tokio::test]
    async fn empty_queue_is_retryable_failure() {
        let provider = MockProvider::new();
        let outcome = provider.attempt(&request("a/one")).await;
        assert_eq!(
            outcome,
            CompletionOutcome::RetryableFailure {
                reason: "no valid response".to_string()
            }
        );
    }

    #[tokio::test]
    async fn queued_outcomes_returned_in_order_and_models_recorded() {
        let provider = MockProvider::new();
        provider.push_retryable("server error").await;
        provider.push_success("second").await;

        let first = provider.attempt(&request("a/one")).await;
        let second = provider.attempt(&request("b/two")).await;

        assert!(matches!(first, CompletionOutcome::RetryableFailure { .. }));
        match second {
            CompletionOutcome::Success { text, .. } => assert_eq!(text, "second"),
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(provider.requested_models().await, vec!["a/one", "b/two"]);
        assert_eq!(provider.attempt_count().await, 2);
    }

    #[test]
    fn coach_reply_json_has_expected_keys() {
        let body: serde_json::Value =
            serde_json::from_str(&coach_reply_json("hi", "positive", "calm")).unwrap();
        assert_eq!(body["transformed_message"], "hi");
        assert_eq!(body["emotional_state"], "calm");
    }
}
