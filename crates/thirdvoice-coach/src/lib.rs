// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coaching pipeline for Third Voice.
//!
//! The [`Coach`] is the central coordinator that:
//! - Resolves the signed-in user and the contact being talked about
//! - Serves repeated requests from the response cache
//! - Runs the model-fallback completion and parses its structured reply
//! - Scores the result and records it in the contact's history
//!
//! Cache and history writes are best effort; their failures are logged and
//! never fail a request that already has an answer.

pub mod context;
pub mod identity;
pub mod reply;
pub mod session;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use thirdvoice_cache::{CachedResult, ResponseCache};
use thirdvoice_config::model::ThirdVoiceConfig;
use thirdvoice_core::types::{new_id, now_timestamp};
use thirdvoice_core::{
    CacheScope, Contact, EmotionalState, Feedback, IdentityAdapter, Interpretation, Message,
    MessageType, ProviderAdapter, RelationshipContext, Sentiment, StorageAdapter,
    ThirdVoiceError, UserId,
};
use thirdvoice_resilience::{CompletionParams, FallbackCompleter};
use thirdvoice_scoring::{
    ConversationPattern, HealingInsight, HealthTier, RelationshipHealth, Theme,
    conversation_count, conversation_pattern, detect_message_type, healing_insights,
    healing_score, interpretation_score, normalize_emotional_state, normalize_sentiment,
    recurring_themes,
};

pub use identity::StaticIdentity;
pub use reply::{CoachReply, parse_reply};
pub use session::CoachSession;

/// Sampling temperature for interpretations.
pub const INTERPRET_TEMPERATURE: f32 = 0.8;

/// Token cap for interpretations.
pub const INTERPRET_MAX_TOKENS: u32 = 400;

/// Most recent messages an interpretation prompt may draw on.
const INTERPRET_HISTORY: i64 = 5;

/// Feature label stored with coaching feedback when the caller gives none.
pub const DEFAULT_FEATURE_CONTEXT: &str = "general";

/// Outcome of [`Coach::process_message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachResult {
    pub contact_name: String,
    pub message_type: MessageType,
    pub response_text: String,
    pub explanation: Option<String>,
    pub healing_score: u8,
    pub sentiment: Sentiment,
    pub emotional_state: EmotionalState,
    pub model_used: String,
    /// `true` when served from the response cache without a model call.
    pub from_cache: bool,
}

/// Outcome of [`Coach::interpret_message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretResult {
    pub contact_name: String,
    pub interpretation: String,
    pub interpretation_score: u8,
    pub model_used: String,
}

/// Outcome of [`Coach::insights`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipInsights {
    pub contact_name: String,
    pub conversations: usize,
    pub pattern: ConversationPattern,
    pub themes: Vec<Theme>,
    pub insights: Vec<HealingInsight>,
}

pub struct Coach {
    completer: FallbackCompleter,
    cache: ResponseCache,
    storage: Arc<dyn StorageAdapter>,
    identity: Arc<dyn IdentityAdapter>,
    config: ThirdVoiceConfig,
}

impl Coach {
    pub fn new(
        completer: FallbackCompleter,
        cache: ResponseCache,
        storage: Arc<dyn StorageAdapter>,
        identity: Arc<dyn IdentityAdapter>,
        config: ThirdVoiceConfig,
    ) -> Self {
        info!(
            models = completer.registry().len(),
            cache_enabled = cache.is_enabled(),
            "coach initialized"
        );
        Self {
            completer,
            cache,
            storage,
            identity,
            config,
        }
    }

    /// Wires the completer and cache from configuration.
    pub fn from_config(
        provider: Arc<dyn ProviderAdapter>,
        storage: Arc<dyn StorageAdapter>,
        identity: Arc<dyn IdentityAdapter>,
        config: ThirdVoiceConfig,
    ) -> Self {
        let completer = FallbackCompleter::from_config(provider, &config);
        let cache = ResponseCache::from_config(storage.clone(), &config.cache);
        Self::new(completer, cache, storage, identity, config)
    }

    /// Candidate models in fallback order.
    pub fn models(&self) -> &[String] {
        self.completer.registry().list_models()
    }

    /// Starts a session for the signed-in user.
    pub async fn start_session(&self) -> Result<CoachSession, ThirdVoiceError> {
        let user = self.current_user().await?;
        debug!(user_id = %user, "coach session started");
        Ok(CoachSession::new(user))
    }

    async fn current_user(&self) -> Result<UserId, ThirdVoiceError> {
        self.identity
            .current_user()
            .await?
            .ok_or(ThirdVoiceError::Unauthenticated)
    }

    async fn resolve_contact(&self, user: &UserId, name: &str) -> Result<Contact, ThirdVoiceError> {
        let name = name.trim();
        self.storage
            .get_contact_by_name(&user.0, name)
            .await?
            .ok_or_else(|| ThirdVoiceError::NotFound {
                entity: "contact",
                key: name.to_string(),
            })
    }

    /// History used to shape a prompt. A storage failure only costs the
    /// prompt its history.
    async fn history_for_prompt(
        &self,
        user: &UserId,
        contact: &Contact,
        limit: Option<i64>,
    ) -> Vec<Message> {
        match self.storage.list_messages(&user.0, &contact.id, limit).await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, contact = %contact.name, "could not load history for prompt");
                Vec::new()
            }
        }
    }

    // --- Coaching ---

    /// Reframes or interprets `text` for the named contact.
    ///
    /// `mode` defaults to what the text looks like: quoting the other person
    /// means [`MessageType::Translate`], anything else
    /// [`MessageType::Coach`]. Cache keys do not carry the mode, so a mode
    /// that overrides the detected one neither reads nor writes the cache.
    pub async fn process_message(
        &self,
        session: &mut CoachSession,
        contact_name: &str,
        text: &str,
        mode: Option<MessageType>,
    ) -> Result<CoachResult, ThirdVoiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ThirdVoiceError::InvalidInput(
                "message cannot be empty".to_string(),
            ));
        }
        let detected = detect_message_type(text);
        let mode = mode.unwrap_or(detected);
        if mode == MessageType::Incoming {
            return Err(ThirdVoiceError::InvalidInput(
                "mode must be coach or translate".to_string(),
            ));
        }

        let user = session.user_id().clone();
        let contact = self.resolve_contact(&user, contact_name).await?;
        let scope = CacheScope {
            user_id: user.0.clone(),
            contact_id: contact.id.clone(),
        };

        let cacheable = mode == detected;
        if !cacheable {
            debug!(mode = %mode, detected = %detected, "mode override, bypassing cache");
        }
        let cached = if cacheable {
            self.cache.lookup(text, contact.context, &scope).await
        } else {
            None
        };

        let result = match cached {
            Some(entry) => CoachResult {
                contact_name: contact.name.clone(),
                message_type: mode,
                response_text: entry.response_text,
                explanation: None,
                healing_score: entry.healing_score,
                sentiment: entry.sentiment,
                emotional_state: entry.emotional_state,
                model_used: entry.model_used,
                from_cache: true,
            },
            None => {
                let result = self.complete_reply(session, &user, &contact, text, mode).await?;
                if cacheable {
                    let cached = CachedResult {
                        response_text: result.response_text.clone(),
                        healing_score: result.healing_score,
                        sentiment: result.sentiment,
                        emotional_state: result.emotional_state,
                        model_used: result.model_used.clone(),
                    };
                    self.cache
                        .store(text, contact.context, &scope, cached)
                        .await;
                }
                result
            }
        };

        self.record_exchange(&user, &contact, text, &result).await;
        session.record_request();
        info!(
            contact = %contact.name,
            mode = %mode,
            healing_score = result.healing_score,
            from_cache = result.from_cache,
            "message processed"
        );
        Ok(result)
    }

    async fn complete_reply(
        &self,
        session: &mut CoachSession,
        user: &UserId,
        contact: &Contact,
        text: &str,
        mode: MessageType,
    ) -> Result<CoachResult, ThirdVoiceError> {
        let history = self.history_for_prompt(user, contact, None).await;
        let params = CompletionParams::from_config(
            &self.config,
            context::system_prompt(mode, contact.context, &contact.name, &history),
            context::user_prompt(mode, text),
        )
        .json_object();
        let completion = self.completer.complete(session.fallback_mut(), params).await?;
        let reply = parse_reply(&completion.text)?;

        let sentiment = reply
            .sentiment
            .as_deref()
            .map(normalize_sentiment)
            .unwrap_or(Sentiment::Neutral);
        let emotional_state = reply
            .emotional_state
            .as_deref()
            .map(normalize_emotional_state)
            .unwrap_or(EmotionalState::Caring);
        let score = healing_score(&reply.transformed_message, sentiment);

        Ok(CoachResult {
            contact_name: contact.name.clone(),
            message_type: mode,
            response_text: reply.transformed_message,
            explanation: reply.explanation.filter(|e| !e.trim().is_empty()),
            healing_score: score,
            sentiment,
            emotional_state,
            model_used: completion.model,
            from_cache: false,
        })
    }

    /// Appends the user's raw text, then the result, to the contact's history.
    async fn record_exchange(&self, user: &UserId, contact: &Contact, text: &str, result: &CoachResult) {
        let now = now_timestamp();
        let incoming = Message {
            id: new_id(),
            user_id: user.0.clone(),
            contact_id: contact.id.clone(),
            contact_name: contact.name.clone(),
            original_text: text.to_string(),
            result_text: None,
            message_type: MessageType::Incoming,
            healing_score: 0,
            sentiment: Sentiment::Unknown,
            emotional_state: None,
            model_used: None,
            created_at: now.clone(),
        };
        let outgoing = Message {
            id: new_id(),
            result_text: Some(result.response_text.clone()),
            message_type: result.message_type,
            healing_score: result.healing_score,
            sentiment: result.sentiment,
            emotional_state: Some(result.emotional_state),
            model_used: Some(result.model_used.clone()),
            ..incoming.clone()
        };

        for message in [incoming, outgoing] {
            if let Err(e) = self.storage.insert_message(&message).await {
                warn!(
                    error = %e,
                    contact = %contact.name,
                    message_type = %message.message_type,
                    "failed to save message"
                );
            }
        }
    }

    /// Explains the emotional subtext of something the contact sent.
    pub async fn interpret_message(
        &self,
        session: &mut CoachSession,
        contact_name: &str,
        text: &str,
    ) -> Result<InterpretResult, ThirdVoiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ThirdVoiceError::InvalidInput(
                "message cannot be empty".to_string(),
            ));
        }
        let user = session.user_id().clone();
        let contact = self.resolve_contact(&user, contact_name).await?;

        let history = self
            .history_for_prompt(&user, &contact, Some(INTERPRET_HISTORY))
            .await;

        let params = CompletionParams::from_config(
            &self.config,
            context::interpretation_prompt(contact.context, &contact.name, text, &history),
            context::interpretation_user_prompt(text),
        )
        .temperature(INTERPRET_TEMPERATURE)
        .max_tokens(INTERPRET_MAX_TOKENS);
        let completion = self.completer.complete(session.fallback_mut(), params).await?;

        let interpretation = completion.text.trim().to_string();
        let score = interpretation_score(&interpretation);
        let record = Interpretation {
            id: new_id(),
            user_id: user.0.clone(),
            contact_id: contact.id.clone(),
            contact_name: contact.name.clone(),
            original_message: text.to_string(),
            interpretation: interpretation.clone(),
            interpretation_score: score,
            model_used: completion.model.clone(),
            created_at: now_timestamp(),
        };
        if let Err(e) = self.storage.insert_interpretation(&record).await {
            warn!(error = %e, contact = %contact.name, "failed to save interpretation");
        }
        session.record_request();

        Ok(InterpretResult {
            contact_name: contact.name,
            interpretation,
            interpretation_score: score,
            model_used: completion.model,
        })
    }

    /// Health of the relationship from recent coached and translated messages.
    pub async fn relationship_health(
        &self,
        contact_name: &str,
    ) -> Result<RelationshipHealth, ThirdVoiceError> {
        let user = self.current_user().await?;
        let contact = self.resolve_contact(&user, contact_name).await?;
        let messages = self.storage.list_messages(&user.0, &contact.id, None).await?;

        let scores: Vec<u8> = messages
            .iter()
            .filter(|m| m.message_type != MessageType::Incoming)
            .map(|m| m.healing_score)
            .collect();
        if scores.is_empty() && !messages.is_empty() {
            return Ok(RelationshipHealth {
                average: 0.0,
                status: HealthTier::Unscored,
                sample_size: 0,
            });
        }
        Ok(thirdvoice_scoring::relationship_health(&scores))
    }

    /// Trend, recurring themes, and progress insights for a contact.
    pub async fn insights(
        &self,
        contact_name: &str,
    ) -> Result<RelationshipInsights, ThirdVoiceError> {
        let user = self.current_user().await?;
        let contact = self.resolve_contact(&user, contact_name).await?;
        let history = self.storage.list_messages(&user.0, &contact.id, None).await?;

        Ok(RelationshipInsights {
            contact_name: contact.name,
            conversations: conversation_count(&history),
            pattern: conversation_pattern(&history),
            themes: recurring_themes(&history),
            insights: healing_insights(&history),
        })
    }

    /// The contact's history, oldest first. `limit` keeps the most recent messages.
    pub async fn history(
        &self,
        contact_name: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ThirdVoiceError> {
        let user = self.current_user().await?;
        let contact = self.resolve_contact(&user, contact_name).await?;
        self.storage.list_messages(&user.0, &contact.id, limit).await
    }

    pub async fn interpretations(
        &self,
        contact_name: &str,
    ) -> Result<Vec<Interpretation>, ThirdVoiceError> {
        let user = self.current_user().await?;
        let contact = self.resolve_contact(&user, contact_name).await?;
        self.storage.list_interpretations(&user.0, &contact.id).await
    }

    // --- Contacts ---

    pub async fn add_contact(
        &self,
        name: &str,
        context: RelationshipContext,
    ) -> Result<Contact, ThirdVoiceError> {
        let user = self.current_user().await?;
        let name = validate_contact_name(name)?;
        let now = now_timestamp();
        let contact = Contact {
            id: new_id(),
            user_id: user.0,
            name: name.to_string(),
            context,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.create_contact(&contact).await?;
        info!(contact = %contact.name, context = %context, "contact added");
        Ok(contact)
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ThirdVoiceError> {
        let user = self.current_user().await?;
        self.storage.list_contacts(&user.0).await
    }

    /// Renames a contact and optionally changes its relationship context.
    pub async fn rename_contact(
        &self,
        name: &str,
        new_name: &str,
        context: Option<RelationshipContext>,
    ) -> Result<Contact, ThirdVoiceError> {
        let user = self.current_user().await?;
        let new_name = validate_contact_name(new_name)?;
        let contact = self.resolve_contact(&user, name).await?;
        let context = context.unwrap_or(contact.context);

        let updated = self
            .storage
            .update_contact(&user.0, &contact.id, new_name, context)
            .await?;
        if !updated {
            return Err(ThirdVoiceError::NotFound {
                entity: "contact",
                key: name.trim().to_string(),
            });
        }
        info!(from = %contact.name, to = new_name, "contact updated");
        Ok(Contact {
            name: new_name.to_string(),
            context,
            updated_at: now_timestamp(),
            ..contact
        })
    }

    /// Deletes a contact together with its history and cached responses.
    pub async fn delete_contact(&self, name: &str) -> Result<(), ThirdVoiceError> {
        let user = self.current_user().await?;
        let contact = self.resolve_contact(&user, name).await?;
        if !self.storage.delete_contact(&user.0, &contact.id).await? {
            return Err(ThirdVoiceError::NotFound {
                entity: "contact",
                key: contact.name,
            });
        }
        info!(contact = %contact.name, "contact deleted");
        Ok(())
    }

    // --- Feedback ---

    pub async fn submit_feedback(
        &self,
        rating: u8,
        text: Option<&str>,
        feature_context: Option<&str>,
    ) -> Result<Feedback, ThirdVoiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ThirdVoiceError::InvalidInput(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        let user = self.current_user().await?;
        let feedback = Feedback {
            id: new_id(),
            user_id: user.0,
            rating,
            feedback_text: text.map(str::trim).filter(|t| !t.is_empty()).map(String::from),
            feature_context: feature_context
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_FEATURE_CONTEXT)
                .to_string(),
            created_at: now_timestamp(),
        };
        self.storage.insert_feedback(&feedback).await?;
        Ok(feedback)
    }
}

fn validate_contact_name(name: &str) -> Result<&str, ThirdVoiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ThirdVoiceError::InvalidInput(
            "contact name cannot be empty".to_string(),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_names_are_trimmed_and_required() {
        assert_eq!(validate_contact_name("  Mom ").unwrap(), "Mom");
        assert!(matches!(
            validate_contact_name("   "),
            Err(ThirdVoiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn coach_result_serializes_lowercase_labels() {
        let result = CoachResult {
            contact_name: "Sam".into(),
            message_type: MessageType::Translate,
            response_text: "I hear you".into(),
            explanation: None,
            healing_score: 7,
            sentiment: Sentiment::Positive,
            emotional_state: EmotionalState::Understanding,
            model_used: "a/one".into(),
            from_cache: true,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["message_type"], "translate");
        assert_eq!(json["emotional_state"], "understanding");
        assert_eq!(json["from_cache"], true);
    }
}
