// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic scoring for generated coaching text.
//!
//! Everything here is a pure function of its inputs: no I/O, no clock, no
//! model calls. The scores are deliberately independent of whatever number
//! the model claims about its own output.

pub mod healing;
pub mod health;
pub mod insights;
pub mod interpretation;
pub mod labels;

pub use healing::healing_score;
pub use health::{HealthTier, RelationshipHealth, relationship_health};
pub use insights::{
    ConversationPattern, HealingInsight, ScoreTrend, Theme, conversation_count,
    conversation_pattern, healing_insights, recurring_themes,
};
pub use interpretation::interpretation_score;
pub use labels::{detect_message_type, normalize_emotional_state, normalize_sentiment};
