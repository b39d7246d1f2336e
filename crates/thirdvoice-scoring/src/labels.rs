// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of free-form labels returned by the model, and message-type
//! detection for user input.

use std::str::FromStr;

use thirdvoice_core::types::{EmotionalState, MessageType, Sentiment};

const POSITIVE_LABELS: &[&str] = &[
    "positive", "caring", "loving", "supportive", "kind", "empathetic",
];

const NEGATIVE_LABELS: &[&str] = &[
    "negative", "angry", "hurt", "frustrated", "sad", "defensive",
];

/// Phrases showing the user is quoting what the other person sent.
const QUOTE_INDICATORS: &[&str] = &["said:", "wrote:", "texted:", "told me:"];

/// Maps a model-supplied sentiment label onto [`Sentiment`].
///
/// Unrecognized and empty labels are neutral.
pub fn normalize_sentiment(label: &str) -> Sentiment {
    let clean = label.trim().to_lowercase();
    if POSITIVE_LABELS.contains(&clean.as_str()) {
        Sentiment::Positive
    } else if NEGATIVE_LABELS.contains(&clean.as_str()) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Maps a model-supplied emotion label onto [`EmotionalState`], defaulting
/// to [`EmotionalState::Caring`].
pub fn normalize_emotional_state(label: &str) -> EmotionalState {
    EmotionalState::from_str(&label.trim().to_lowercase()).unwrap_or(EmotionalState::Caring)
}

/// Decides whether the user is asking to reframe their own words
/// ([`MessageType::Coach`]) or to understand someone else's
/// ([`MessageType::Translate`]).
pub fn detect_message_type(text: &str) -> MessageType {
    let lower = text.to_lowercase();
    if QUOTE_INDICATORS.iter().any(|p| lower.contains(p)) {
        MessageType::Translate
    } else {
        MessageType::Coach
    }
}
