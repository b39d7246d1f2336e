// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completions request/response wire types.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatBody>,
}

/// One role-tagged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// `{"type": "json_object"}`
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormatBody {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormatBody {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

// --- Response types ---

/// Successful completion body. Every field is optional on the wire; a 200
/// without usable `choices` is treated as a failed attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if it is present and not blank.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    /// Numeric on OpenRouter, a string on some compatible gateways.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_response_format() {
        let req = ChatRequest {
            model: "a/b".into(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            temperature: 0.7,
            max_tokens: 500,
            response_format: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn request_serializes_json_object_format() {
        let req = ChatRequest {
            model: "a/b".into(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: 500,
            response_format: Some(ResponseFormatBody::json_object()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn first_content_ignores_blank() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn first_content_handles_missing_pieces() {
        let resp: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(resp.first_content(), None);
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(resp.first_content(), None);
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn error_body_accepts_numeric_code() {
        let err: ApiErrorResponse =
            serde_json::from_str(r#"{"error":{"code":402,"message":"Insufficient credits"}}"#)
                .unwrap();
        assert_eq!(err.error.message, "Insufficient credits");
        assert_eq!(err.error.code, Some(serde_json::json!(402)));
    }
}
