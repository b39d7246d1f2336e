// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Healing score for coach and translate results.
//!
//! Starts from a neutral base and adds small bonuses for signals that a
//! reframed message is likely to land well.

use std::ops::RangeInclusive;

use thirdvoice_core::types::Sentiment;

/// Score with no signals present.
pub const BASE_SCORE: u8 = 5;

/// Highest possible score.
pub const MAX_SCORE: u8 = 10;

/// Character counts that read as a considered, but not overwhelming, reply.
pub const PREFERRED_LENGTH: RangeInclusive<usize> = 200..=1200;

/// Empathy and validation vocabulary (substring, case-insensitive).
const EMPATHY_WORDS: &[&str] = &[
    "understand", "love", "connect", "care", "heal", "listen", "feel", "safe", "trust",
    "support",
];

/// At most this many empathy words count.
const EMPATHY_CAP: u8 = 2;

/// Wording that offers a next step instead of a verdict.
const ACTIONABLE_WORDS: &[&str] = &["try", "could", "might", "consider", "suggest"];

/// Scores a generated response in `0..=10`.
///
/// Pure: the same `(text, sentiment)` always yields the same score.
pub fn healing_score(text: &str, sentiment: Sentiment) -> u8 {
    let lower = text.to_lowercase();
    let mut score = BASE_SCORE;

    // Signal 1: positive-leaning tone
    if sentiment == Sentiment::Positive {
        score += 1;
    }

    // Signal 2: distinct empathy vocabulary
    let empathy = EMPATHY_WORDS.iter().filter(|w| lower.contains(*w)).count();
    score += u8::try_from(empathy).unwrap_or(u8::MAX).min(EMPATHY_CAP);

    // Signal 3: length in the preferred band
    if PREFERRED_LENGTH.contains(&text.chars().count()) {
        score += 1;
    }

    // Signal 4: actionable guidance
    if ACTIONABLE_WORDS.iter().any(|w| lower.contains(w)) {
        score += 1;
    }

    score.min(MAX_SCORE)
}
