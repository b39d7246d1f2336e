// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict parsing of the structured coaching reply.

use serde::Deserialize;
use thirdvoice_core::ThirdVoiceError;

/// The JSON object the model is asked to return.
///
/// Only `transformed_message` is required. Any extra keys the model adds
/// (its own healing score, subtext, needs) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoachReply {
    pub transformed_message: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Parses `raw` into a [`CoachReply`].
///
/// A single surrounding Markdown code fence is tolerated. Anything else that
/// is not a JSON object with a non-blank `transformed_message` is
/// [`ThirdVoiceError::MalformedOutput`] carrying the untouched text.
pub fn parse_reply(raw: &str) -> Result<CoachReply, ThirdVoiceError> {
    let body = strip_code_fence(raw);
    let reply: CoachReply =
        serde_json::from_str(body).map_err(|e| ThirdVoiceError::MalformedOutput {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;

    if reply.transformed_message.trim().is_empty() {
        return Err(ThirdVoiceError::MalformedOutput {
            raw: raw.to_string(),
            reason: "transformed_message is empty".to_string(),
        });
    }
    Ok(CoachReply {
        transformed_message: reply.transformed_message.trim().to_string(),
        ..reply
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, or nothing) on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_reply() {
        let raw = r#"{"transformed_message":"I miss you","sentiment":"loving","emotional_state":"vulnerable","explanation":"softer","healing_score":9}"#;
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.transformed_message, "I miss you");
        assert_eq!(reply.sentiment.as_deref(), Some("loving"));
        assert_eq!(reply.emotional_state.as_deref(), Some("vulnerable"));
        assert_eq!(reply.explanation.as_deref(), Some("softer"));
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let reply = parse_reply(r#"{"transformed_message":"  hi  "}"#).unwrap();
        assert_eq!(reply.transformed_message, "hi");
        assert!(reply.sentiment.is_none());
        assert!(reply.explanation.is_none());
    }

    #[test]
    fn code_fences_are_tolerated() {
        let raw = "```json\n{\"transformed_message\": \"fenced\"}\n```";
        assert_eq!(parse_reply(raw).unwrap().transformed_message, "fenced");

        let bare = "```\n{\"transformed_message\": \"bare fence\"}\n```\n";
        assert_eq!(parse_reply(bare).unwrap().transformed_message, "bare fence");
    }

    #[test]
    fn prose_is_malformed_and_keeps_raw_text() {
        let raw = "Sure! Here's a kinder way to say it: I miss you.";
        match parse_reply(raw) {
            Err(ThirdVoiceError::MalformedOutput { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn missing_or_blank_message_is_malformed() {
        assert!(matches!(
            parse_reply(r#"{"sentiment":"positive"}"#),
            Err(ThirdVoiceError::MalformedOutput { .. })
        ));
        assert!(matches!(
            parse_reply(r#"{"transformed_message":"   "}"#),
            Err(ThirdVoiceError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        assert!(matches!(
            parse_reply(r#"{"transformed_message":"hi","sentiment":3}"#),
            Err(ThirdVoiceError::MalformedOutput { .. })
        ));
    }
}
