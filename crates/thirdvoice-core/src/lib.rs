// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Third Voice.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by every other crate in the workspace. Gateways, storage backends
//! and identity sources implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ThirdVoiceError;
pub use types::{
    AdapterType, CacheEntry, CacheScope, CompletionOutcome, CompletionRequest, Contact,
    EmotionalState, Feedback, HealthStatus, Interpretation, Message, MessageType,
    RelationshipContext, ResponseFormat, Sentiment, UserId,
};

pub use traits::{IdentityAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};
