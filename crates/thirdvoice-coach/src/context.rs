// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for coaching and interpretation requests.
//!
//! Prompts are tailored by relationship context, by whether the user is
//! reframing their own words or trying to understand someone else's, and by
//! what earlier conversations with the contact looked like.

use thirdvoice_core::types::{Message, MessageType, RelationshipContext};
use thirdvoice_scoring::{conversation_count, conversation_pattern, recurring_themes};

/// Messages from the contact's history considered for interpretation.
const HISTORY_LOOKBACK: usize = 5;

/// Of those, how many scored entries are quoted back to the model.
const HISTORY_QUOTED: usize = 3;

/// Characters of a past message shown in the history summary.
const HISTORY_EXCERPT_CHARS: usize = 50;

const REPLY_FORMAT: &str = r#"Respond with a single JSON object and nothing else:
{
  "transformed_message": "the message the user should send",
  "sentiment": "positive | neutral | negative",
  "emotional_state": "one word such as caring, understanding, calm, hurt",
  "explanation": "one or two sentences on why this lands better"
}"#;

/// System prompt for a coaching request.
///
/// `mode` must be [`MessageType::Coach`] or [`MessageType::Translate`];
/// anything else is treated as coaching. `history` is the chronological
/// history with `contact_name`.
pub fn system_prompt(
    mode: MessageType,
    context: RelationshipContext,
    contact_name: &str,
    history: &[Message],
) -> String {
    let relationship = context.description().to_lowercase();
    let memory = relationship_memory(contact_name, history);
    match mode {
        MessageType::Translate => format!(
            "You are a relationship communication expert. The user RECEIVED a message \
from someone in their life ({relationship}) and needs help understanding it.\n\n\
Read what was actually said. Identify the sender's tone, the feelings underneath \
and what they need. Then write a reply the user could send that acknowledges \
those feelings, stays on the sender's topic and keeps the connection open.\n\n\
{memory}\n\n\
{REPLY_FORMAT}"
        ),
        MessageType::Coach | MessageType::Incoming => format!(
            "You are a relationship communication expert. The user wants to send a \
message to someone in their life ({relationship}) and needs help saying it better.\n\n\
Rewrite their message so it is kinder and more likely to be heard. Keep the same \
core meaning and topic. Turn accusations into \"I\" statements, show vulnerability \
instead of blame, and stay specific to what they actually wrote.\n\n\
{memory}\n\n\
{REPLY_FORMAT}"
        ),
    }
}

/// What the model should know about earlier conversations with the contact.
pub fn relationship_memory(contact_name: &str, history: &[Message]) -> String {
    let total = conversation_count(history);
    if total < 2 {
        return format!(
            "This is an early conversation with {contact_name}, so focus on building understanding."
        );
    }

    let themes = recurring_themes(history);
    let themes = if themes.is_empty() {
        "varied conversation topics".to_string()
    } else {
        themes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "RELATIONSHIP INSIGHTS ({contact_name}):\n\
- Conversation patterns: {}\n\
- Recurring themes: {themes}\n\
- Total conversations: {total}\n\n\
Consider this history when giving guidance. Reference patterns where they help, \
but don't overwhelm with past details.",
        conversation_pattern(history)
    )
}

/// User turn for a coaching request.
pub fn user_prompt(mode: MessageType, text: &str) -> String {
    match mode {
        MessageType::Translate => {
            format!("Help me understand this message and how to respond: \"{text}\"")
        }
        MessageType::Coach | MessageType::Incoming => {
            format!("Help me say this in a more loving way: \"{text}\"")
        }
    }
}

/// System prompt asking for the emotional subtext of a message the contact sent.
///
/// Up to three recent scored exchanges with the contact are quoted so the
/// model can see patterns. `history` is expected in chronological order.
pub fn interpretation_prompt(
    context: RelationshipContext,
    contact_name: &str,
    text: &str,
    history: &[Message],
) -> String {
    let patterns = history_patterns(history);
    let history_block = if patterns.is_empty() {
        String::new()
    } else {
        format!("\nRECENT EXCHANGES:\n{}\n", patterns.join("\n"))
    };

    format!(
        "You are an expert relationship therapist analyzing emotional subtext with \
deep compassion.\n\n\
For this {context} relationship message from {contact_name}: \"{text}\"\n\
{history_block}\n\
Answer in exactly these four sections:\n\n\
EMOTIONAL SUBTEXT\nWhat they are really feeling beneath the words (1-2 sentences)\n\n\
UNMET NEEDS\nWhat they need but cannot express (1-2 sentences)\n\n\
HEALING OPPORTUNITIES\nSpecific ways to address those needs (2-3 actionable suggestions)\n\n\
WATCH FOR\nRelationship patterns or warning signs (1 sentence)\n\n\
Be direct but loving."
    )
}

/// User turn for an interpretation request.
pub fn interpretation_user_prompt(text: &str) -> String {
    format!("Analyze this message: {text}")
}

fn history_patterns(history: &[Message]) -> Vec<String> {
    let recent = &history[history.len().saturating_sub(HISTORY_LOOKBACK)..];
    let mut patterns: Vec<String> = recent
        .iter()
        .filter(|m| m.healing_score > 0)
        .map(|m| {
            let excerpt: String = m.original_text.chars().take(HISTORY_EXCERPT_CHARS).collect();
            format!("Previous: '{excerpt}...' (Score: {}/10)", m.healing_score)
        })
        .collect();
    let skip = patterns.len().saturating_sub(HISTORY_QUOTED);
    patterns.drain(..skip);
    patterns
}
