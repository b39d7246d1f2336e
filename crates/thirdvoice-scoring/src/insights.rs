// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relationship memory drawn from a contact's history: score trend,
//! recurring themes, and progress insights.
//!
//! Only coached and translated messages count as conversations. Incoming
//! rows carry the user's raw text and no score.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use thirdvoice_core::types::{Message, MessageType};

/// Conversations looked at for the score trend and the recent average.
const TREND_WINDOW: usize = 5;

/// Conversations looked at for consistency.
const CONSISTENCY_WINDOW: usize = 7;

/// Share of the consistency window that must be healthy.
const CONSISTENCY_RATIO: f32 = 0.7;

const HIGH_SCORE: u8 = 8;
const HEALTHY_SCORE: u8 = 6;

/// Keywords of a theme that must appear before it counts as recurring.
const THEME_MIN_HITS: usize = 2;

/// Averages closer than this are not a change in direction.
const TREND_MARGIN: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Communication,
    Respect,
    Time,
    Emotions,
    Trust,
}

impl Theme {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Communication => &["listen", "understand", "hear", "talk"],
            Self::Respect => &["respect", "appreciate", "value", "disrespect"],
            Self::Time => &["time", "busy", "schedule", "priority"],
            Self::Emotions => &["feel", "hurt", "angry", "sad", "frustrated"],
            Self::Trust => &["trust", "honest", "lie", "truth"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrend {
    Improving,
    Stable,
}

/// Shape of the recent scores with one contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationPattern {
    /// Fewer than three conversations.
    Limited,
    /// Recent conversations exist but none is scored.
    Building,
    Trend { trend: ScoreTrend, average: f32 },
}

impl fmt::Display for ConversationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited => f.write_str("limited history available"),
            Self::Building => f.write_str("building relationship understanding"),
            Self::Trend { trend, average } => {
                write!(f, "healing trend: {trend} (avg: {average:.1}/10)")
            }
        }
    }
}

/// One observation about progress with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealingInsight {
    JustStarted,
    Improving,
    RoughPatch,
    HighScores { count: usize },
    Consistent,
    Encouragement,
    KeepGoing,
}

impl fmt::Display for HealingInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JustStarted => f.write_str(
                "You're just getting started! Every conversation is a step toward healing.",
            ),
            Self::Improving => f.write_str(
                "Your communication is improving! Recent conversations show higher healing scores.",
            ),
            Self::RoughPatch => f.write_str(
                "Having some challenges lately? That's normal, healing isn't always linear.",
            ),
            Self::HighScores { count } => write!(
                f,
                "Amazing! You've had {count} conversations with healing scores of 8 or more!"
            ),
            Self::Consistent => {
                f.write_str("You're building consistent healthy communication patterns!")
            }
            Self::Encouragement => f.write_str(
                "Remember: every relationship faces challenges. You're here working on it, and that matters.",
            ),
            Self::KeepGoing => f.write_str("Keep going. Healing happens one conversation at a time."),
        }
    }
}

fn conversations(history: &[Message]) -> impl Iterator<Item = &Message> {
    history
        .iter()
        .filter(|m| m.message_type != MessageType::Incoming)
}

/// Number of coached or translated messages in `history`.
pub fn conversation_count(history: &[Message]) -> usize {
    conversations(history).count()
}

fn mean(scores: &[u8]) -> f32 {
    scores.iter().map(|s| f32::from(*s)).sum::<f32>() / scores.len() as f32
}

/// Trend of the last five conversations. `history` is chronological.
pub fn conversation_pattern(history: &[Message]) -> ConversationPattern {
    let scores: Vec<u8> = conversations(history).map(|m| m.healing_score).collect();
    if scores.len() < 3 {
        return ConversationPattern::Limited;
    }

    let recent: Vec<u8> = scores[scores.len() - TREND_WINDOW.min(scores.len())..]
        .iter()
        .copied()
        .filter(|s| *s > 0)
        .collect();
    let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
        return ConversationPattern::Building;
    };

    let trend = if recent.len() > 1 && last > first {
        ScoreTrend::Improving
    } else {
        ScoreTrend::Stable
    };
    ConversationPattern::Trend {
        trend,
        average: (mean(&recent) * 10.0).round() / 10.0,
    }
}

/// Themes whose keywords keep coming up in what the user wrote.
///
/// Empty until there are at least two conversations.
pub fn recurring_themes(history: &[Message]) -> Vec<Theme> {
    if conversation_count(history) < 2 {
        return Vec::new();
    }
    let text = conversations(history)
        .map(|m| m.original_text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    Theme::iter()
        .filter(|theme| {
            theme
                .keywords()
                .iter()
                .filter(|kw| text.contains(*kw))
                .count()
                >= THEME_MIN_HITS
        })
        .collect()
}

/// Progress observations over the whole history. Never empty.
pub fn healing_insights(history: &[Message]) -> Vec<HealingInsight> {
    if conversation_count(history) < 3 {
        return vec![HealingInsight::JustStarted];
    }

    let scores: Vec<u8> = conversations(history)
        .map(|m| m.healing_score)
        .filter(|s| *s > 0)
        .collect();
    let mut insights = Vec::new();

    if scores.len() >= TREND_WINDOW {
        let split = scores.len() - TREND_WINDOW;
        let recent = mean(&scores[split..]);
        let older = &scores[split.saturating_sub(TREND_WINDOW)..split];
        if !older.is_empty() {
            let older = mean(older);
            if recent > older + TREND_MARGIN {
                insights.push(HealingInsight::Improving);
            } else if recent < older - TREND_MARGIN {
                insights.push(HealingInsight::RoughPatch);
            }
        }
    }

    let high = scores.iter().filter(|s| **s >= HIGH_SCORE).count();
    if high >= 3 {
        insights.push(HealingInsight::HighScores { count: high });
    }

    if scores.len() >= CONSISTENCY_WINDOW {
        let window = &scores[scores.len() - CONSISTENCY_WINDOW..];
        let healthy = window.iter().filter(|s| **s >= HEALTHY_SCORE).count();
        if healthy as f32 / CONSISTENCY_WINDOW as f32 >= CONSISTENCY_RATIO {
            insights.push(HealingInsight::Consistent);
        }
    }

    let recent_best = scores[scores.len().saturating_sub(TREND_WINDOW)..]
        .iter()
        .max();
    if recent_best.is_some_and(|best| *best < HEALTHY_SCORE) {
        insights.push(HealingInsight::Encouragement);
    }

    if insights.is_empty() {
        insights.push(HealingInsight::KeepGoing);
    }
    insights
}
