// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Third Voice workspace.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Storage timestamp format. Lexicographic order of formatted values equals time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a UTC instant the way every persisted timestamp is written.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time in storage format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Fresh random identifier for persisted rows.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Identity,
}

/// Relationship category attached to a contact.
///
/// Tailors prompts and partitions cached responses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipContext {
    Romantic,
    Coparenting,
    Workplace,
    Family,
    Friend,
}

impl RelationshipContext {
    /// Short human description shown next to the context name.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Romantic => "Partner & intimate relationships",
            Self::Coparenting => "Raising children together",
            Self::Workplace => "Professional relationships",
            Self::Family => "Extended family connections",
            Self::Friend => "Friendships & social bonds",
        }
    }
}

/// Kind of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// The user's raw message, stored before any AI result.
    Incoming,
    /// Reframing of something the user wants to say.
    Coach,
    /// Interpretation of something the other person said.
    Translate,
}

/// Coarse sentiment of a generated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

/// Emotional tone label attached to a generated response.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Caring,
    Loving,
    Understanding,
    Supportive,
    Empathetic,
    Concerned,
    Worried,
    Hurt,
    Angry,
    Frustrated,
    Sad,
    Happy,
    Neutral,
    Confused,
    Defensive,
    Anxious,
    Vulnerable,
    Open,
    Professional,
    Calm,
}

// --- Completion types ---

/// Structured output mode requested from the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Ask the model for a single JSON object.
    JsonObject,
}

/// One attempt against the completion endpoint with a concrete model.
///
/// Built fresh for every attempt and never mutated after it is sent.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub response_format: Option<ResponseFormat>,
}

/// Classified result of a single completion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// The model produced usable text.
    Success {
        text: String,
        raw_payload: serde_json::Value,
    },
    /// Worth trying again with the next model.
    RetryableFailure { reason: String },
    /// No model can succeed with this request or these credentials.
    FatalFailure { reason: String },
}

// --- Persistence types ---

/// A person the user is talking to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    /// Unique per user.
    pub name: String,
    pub context: RelationshipContext,
    pub created_at: String,
    pub updated_at: String,
}

/// Append-only record of one exchange with a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub contact_id: String,
    pub contact_name: String,
    pub original_text: String,
    pub result_text: Option<String>,
    pub message_type: MessageType,
    pub healing_score: u8,
    pub sentiment: Sentiment,
    pub emotional_state: Option<EmotionalState>,
    pub model_used: Option<String>,
    pub created_at: String,
}

/// The (user, contact) pair that partitions cached responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheScope {
    pub user_id: String,
    pub contact_id: String,
}

/// A cached AI response, valid until `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: String,
    pub user_id: String,
    pub contact_id: String,
    pub message_hash: String,
    pub context: RelationshipContext,
    pub response_text: String,
    pub healing_score: u8,
    pub sentiment: Sentiment,
    pub emotional_state: EmotionalState,
    pub model_used: String,
    pub created_at: String,
    pub expires_at: String,
}

/// A stored interpretation of a message the contact sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub id: String,
    pub user_id: String,
    pub contact_id: String,
    pub contact_name: String,
    pub original_message: String,
    pub interpretation: String,
    pub interpretation_score: u8,
    pub model_used: String,
    pub created_at: String,
}

/// User feedback about a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    /// 1 through 5.
    pub rating: u8,
    pub feedback_text: Option<String>,
    pub feature_context: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn relationship_context_parses_case_insensitively() {
        assert_eq!(
            RelationshipContext::from_str("Family").unwrap(),
            RelationshipContext::Family
        );
        assert_eq!(RelationshipContext::Coparenting.to_string(), "coparenting");
        assert!(RelationshipContext::from_str("stranger").is_err());
    }

    #[test]
    fn message_type_serializes_lowercase() {
        let json = serde_json::to_string(&MessageType::Translate).unwrap();
        assert_eq!(json, "\"translate\"");
        assert_eq!(MessageType::from_str("incoming").unwrap(), MessageType::Incoming);
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let earlier = chrono::DateTime::parse_from_rfc3339("2026-01-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = earlier + chrono::Duration::milliseconds(1500);
        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert_eq!(a, "2026-01-01T09:00:00.000Z");
        assert!(a < b);
    }
}
