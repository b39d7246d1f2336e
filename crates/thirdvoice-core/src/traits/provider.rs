// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for chat-completion gateways.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionOutcome, CompletionRequest};

/// Adapter for a chat-completion gateway.
///
/// A provider performs exactly one attempt per call and classifies the result.
/// Retrying against other models is the caller's job.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends one request with the model named in `request` and classifies the outcome.
    async fn attempt(&self, request: &CompletionRequest) -> CompletionOutcome;
}
