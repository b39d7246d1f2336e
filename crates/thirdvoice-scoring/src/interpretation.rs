// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Score for interpretations of another person's message.

const NEED_WORDS: &[&str] = &["fear", "hurt", "love", "safe", "understand"];

/// Section heading the interpretation prompt asks the model to fill in.
const HEALING_PHRASE: &str = "healing opportunities";

/// Scores an interpretation in `0..=10`.
///
/// Base 5; +1 past 300 characters; +2 when it names an emotional need; +2
/// when it points at healing opportunities.
pub fn interpretation_score(text: &str) -> u8 {
    let lower = text.to_lowercase();
    let mut score: u8 = 5;

    if text.chars().count() > 300 {
        score += 1;
    }
    if NEED_WORDS.iter().any(|w| lower.contains(w)) {
        score += 2;
    }
    if lower.contains(HEALING_PHRASE) {
        score += 2;
    }

    score.min(10)
}
