// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenRouter-compatible chat-completions endpoint.
//!
//! Provides [`OpenRouterClient`], which sends exactly one request per call
//! and classifies the result into a [`CompletionOutcome`]. It never retries;
//! falling back to another model is the completion client's job.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thirdvoice_core::ThirdVoiceError;
use thirdvoice_core::types::{CompletionOutcome, CompletionRequest, ResponseFormat};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, ResponseFormatBody};

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Reason recorded when a 200 response carries nothing usable.
pub const NO_VALID_RESPONSE: &str = "no valid response";

/// HTTP client for the completion endpoint.
///
/// Holds the bearer credential and optional attribution headers as defaults
/// on a pooled `reqwest::Client`. The timeout is applied per request.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_url: String,
}

impl OpenRouterClient {
    /// Creates a client for `api_url`.
    ///
    /// `referer` and `title` become the `HTTP-Referer` and `X-Title` headers
    /// when set.
    pub fn new(
        api_key: &SecretString,
        api_url: impl Into<String>,
        referer: Option<&str>,
        title: Option<&str>,
    ) -> Result<Self, ThirdVoiceError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| ThirdVoiceError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in [("http-referer", referer), ("x-title", title)] {
            if let Some(value) = value {
                let value = HeaderValue::from_str(value).map_err(|e| {
                    ThirdVoiceError::Config(format!("invalid {name} header value: {e}"))
                })?;
                headers.insert(HeaderName::from_static(name), value);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ThirdVoiceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends one request for `request.model` and classifies the outcome.
    pub async fn attempt(&self, request: &CompletionRequest) -> CompletionOutcome {
        let body = to_chat_request(request);

        let response = match self
            .client
            .post(&self.api_url)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    format!("request timed out after {:?}", request.timeout)
                } else if e.is_connect() {
                    format!("connection failed: {e}")
                } else {
                    format!("request failed: {e}")
                };
                warn!(model = %request.model, reason = %reason, "completion transport error");
                return CompletionOutcome::RetryableFailure { reason };
            }
        };

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let reason = if e.is_timeout() {
                    format!("request timed out after {:?}", request.timeout)
                } else {
                    format!("failed to read response body: {e}")
                };
                return CompletionOutcome::RetryableFailure { reason };
            }
        };

        classify(status, &text)
    }
}

/// Builds the wire request for one attempt.
pub fn to_chat_request(request: &CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model.clone(),
        messages: vec![
            ChatMessage::system(request.system_prompt.as_str()),
            ChatMessage::user(request.user_message.as_str()),
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format: request.response_format.map(|format| match format {
            ResponseFormat::JsonObject => ResponseFormatBody::json_object(),
        }),
    }
}

/// Classifies a status and body into an outcome.
///
/// 401, 402 and 403 are fatal: bad credentials or an empty account fail the
/// same way for every model. Every other failure is worth trying on the next
/// model.
pub fn classify(status: StatusCode, body: &str) -> CompletionOutcome {
    if status == StatusCode::OK {
        let payload: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => {
                return CompletionOutcome::RetryableFailure {
                    reason: NO_VALID_RESPONSE.to_string(),
                };
            }
        };
        let parsed: Option<ChatResponse> = serde_json::from_value(payload.clone()).ok();
        return match parsed.as_ref().and_then(ChatResponse::first_content) {
            Some(text) => CompletionOutcome::Success {
                text: text.to_string(),
                raw_payload: payload,
            },
            None => CompletionOutcome::RetryableFailure {
                reason: NO_VALID_RESPONSE.to_string(),
            },
        };
    }

    let detail = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status.as_u16() {
        401 | 402 | 403 => CompletionOutcome::FatalFailure {
            reason: format!("gateway rejected request ({status}): {detail}"),
        },
        429 => CompletionOutcome::RetryableFailure {
            reason: "rate limited".to_string(),
        },
        code if code >= 500 => CompletionOutcome::RetryableFailure {
            reason: "server error".to_string(),
        },
        _ => CompletionOutcome::RetryableFailure {
            reason: format!("api error ({status}): {detail}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenRouterClient {
        OpenRouterClient::new(
            &SecretString::from("sk-or-test".to_string()),
            format!("{}/api/v1/chat/completions", server.uri()),
            Some("https://thirdvoice.example"),
            Some("Third Voice"),
        )
        .unwrap()
    }

    fn test_request(model: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are a coach.".into(),
            user_message: "I'm upset".into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(5),
            response_format: Some(ResponseFormat::JsonObject),
        }
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "gen-1",
            "model": "a/one",
            "choices": [{"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
        })
    }

    #[tokio::test]
    async fn attempt_success_returns_text_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hello")))
            .mount(&server)
            .await;

        let outcome = test_client(&server).attempt(&test_request("a/one")).await;
        match outcome {
            CompletionOutcome::Success { text, raw_payload } => {
                assert_eq!(text, "Hello");
                assert_eq!(raw_payload["id"], "gen-1");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn attempt_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("http-referer", "https://thirdvoice.example"))
            .and(header("x-title", "Third Voice"))
            .and(body_partial_json(serde_json::json!({
                "model": "a/one",
                "max_tokens": 500,
                "response_format": {"type": "json_object"},
                "messages": [
                    {"role": "system", "content": "You are a coach."},
                    {"role": "user", "content": "I'm upset"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = test_client(&server).attempt(&test_request("a/one")).await;
        assert!(matches!(outcome, CompletionOutcome::Success { .. }), "got {outcome:?}");
    }

    #[tokio::test]
    async fn attempt_empty_choices_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let outcome = test_client(&server).attempt(&test_request("a/one")).await;
        assert_eq!(
            outcome,
            CompletionOutcome::RetryableFailure {
                reason: NO_VALID_RESPONSE.into()
            }
        );
    }

    #[tokio::test]
    async fn attempt_rate_limit_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Rate limit exceeded"}
            })))
            .mount(&server)
            .await;

        let outcome = test_client(&server).attempt(&test_request("a/one")).await;
        assert_eq!(
            outcome,
            CompletionOutcome::RetryableFailure {
                reason: "rate limited".into()
            }
        );
    }

    #[tokio::test]
    async fn attempt_unauthorized_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": 401, "message": "No auth credentials found"}
            })))
            .mount(&server)
            .await;

        let outcome = test_client(&server).attempt(&test_request("a/one")).await;
        match outcome {
            CompletionOutcome::FatalFailure { reason } => {
                assert!(reason.contains("No auth credentials found"), "got: {reason}");
            }
            other => panic!("expected fatal, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn attempt_timeout_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut request = test_request("a/one");
        request.timeout = Duration::from_millis(50);
        let outcome = test_client(&server).attempt(&request).await;
        assert!(
            matches!(outcome, CompletionOutcome::RetryableFailure { ref reason } if reason.contains("timed out")),
            "got {outcome:?}"
        );
    }

    #[tokio::test]
    async fn attempt_connection_refused_is_retryable() {
        let client = OpenRouterClient::new(
            &SecretString::from("k".to_string()),
            "http://127.0.0.1:9/v1/chat/completions",
            None,
            None,
        )
        .unwrap();
        let outcome = client.attempt(&test_request("a/one")).await;
        assert!(matches!(outcome, CompletionOutcome::RetryableFailure { .. }));
    }

    #[test]
    fn classify_status_table() {
        let retry = |s: u16| {
            matches!(
                classify(StatusCode::from_u16(s).unwrap(), "{}"),
                CompletionOutcome::RetryableFailure { .. }
            )
        };
        let fatal = |s: u16| {
            matches!(
                classify(StatusCode::from_u16(s).unwrap(), "{}"),
                CompletionOutcome::FatalFailure { .. }
            )
        };
        assert!(fatal(401));
        assert!(fatal(402));
        assert!(fatal(403));
        assert!(retry(400));
        assert!(retry(404));
        assert!(retry(429));
        assert!(retry(500));
        assert!(retry(502));
        assert!(retry(503));
    }

    #[test]
    fn classify_server_error_reason() {
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, "upstream down"),
            CompletionOutcome::RetryableFailure {
                reason: "server error".into()
            }
        );
    }

    #[test]
    fn classify_undecodable_success_body() {
        assert_eq!(
            classify(StatusCode::OK, "<html>oops</html>"),
            CompletionOutcome::RetryableFailure {
                reason: NO_VALID_RESPONSE.into()
            }
        );
    }

    #[test]
    fn only_200_counts_as_success() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        assert!(matches!(
            classify(StatusCode::OK, body),
            CompletionOutcome::Success { .. }
        ));
        for status in [StatusCode::CREATED, StatusCode::ACCEPTED] {
            assert!(
                matches!(
                    classify(status, body),
                    CompletionOutcome::RetryableFailure { .. }
                ),
                "{status} should not be a success"
            );
        }
    }

    #[test]
    fn classify_other_4xx_keeps_gateway_message() {
        let outcome = classify(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"model not found"}}"#,
        );
        assert!(
            matches!(outcome, CompletionOutcome::RetryableFailure { ref reason } if reason.contains("model not found")),
            "got {outcome:?}"
        );
    }
}
