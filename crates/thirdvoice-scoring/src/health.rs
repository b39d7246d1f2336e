// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relationship health from recent healing scores.

use serde::Serialize;
use strum::Display;

/// How many of the most recent messages are considered.
pub const WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    /// Average of 8 or more.
    Thriving,
    /// 6 up to 8.
    Growing,
    /// 4 up to 6.
    Healing,
    /// Below 4.
    Struggling,
    /// No messages at all.
    #[strum(serialize = "no data yet")]
    NoData,
    /// Messages exist but none in the window carries a score.
    #[strum(serialize = "no scored conversations yet")]
    Unscored,
}

impl HealthTier {
    /// One-line guidance shown with the tier.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Thriving => "Excellent communication patterns",
            Self::Growing => "Good progress with room to improve",
            Self::Healing => "Working through challenges together",
            Self::Struggling => "Focus on understanding and patience",
            Self::NoData => "Start a conversation to see how things are going",
            Self::Unscored => "Scores appear after the first coached message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelationshipHealth {
    /// Mean of the scored messages, rounded to one decimal. 0 without data.
    pub average: f32,
    pub status: HealthTier,
    /// Number of scores that went into `average`.
    pub sample_size: usize,
}

/// Computes health from per-message scores in chronological order.
///
/// Only the last [`WINDOW`] entries are looked at, and zero scores (messages
/// that were never scored) are left out of the mean.
pub fn relationship_health(scores: &[u8]) -> RelationshipHealth {
    if scores.is_empty() {
        return RelationshipHealth {
            average: 0.0,
            status: HealthTier::NoData,
            sample_size: 0,
        };
    }

    let recent = &scores[scores.len().saturating_sub(WINDOW)..];
    let scored: Vec<f32> = recent
        .iter()
        .filter(|s| **s > 0)
        .map(|s| f32::from(*s))
        .collect();

    if scored.is_empty() {
        return RelationshipHealth {
            average: 0.0,
            status: HealthTier::Unscored,
            sample_size: 0,
        };
    }

    let mean = scored.iter().sum::<f32>() / scored.len() as f32;
    let status = if mean >= 8.0 {
        HealthTier::Thriving
    } else if mean >= 6.0 {
        HealthTier::Growing
    } else if mean >= 4.0 {
        HealthTier::Healing
    } else {
        HealthTier::Struggling
    };

    RelationshipHealth {
        average: (mean * 10.0).round() / 10.0,
        status,
        sample_size: scored.len(),
    }
}
