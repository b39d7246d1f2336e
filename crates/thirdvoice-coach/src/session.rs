// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user coaching session.

use thirdvoice_core::UserId;
use thirdvoice_resilience::FallbackState;

/// State carried across requests for one signed-in user.
///
/// The session owns the model fallback position, so two sessions never
/// share it and one session can only run one completion at a time.
#[derive(Debug)]
pub struct CoachSession {
    user_id: UserId,
    fallback: FallbackState,
    requests: u64,
}

impl CoachSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            fallback: FallbackState::default(),
            requests: 0,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Model the fallback cursor last recorded for this session, if any.
    pub fn last_successful_model(&self) -> Option<&str> {
        self.fallback.last_successful_model.as_deref()
    }

    pub fn fallback_index(&self) -> usize {
        self.fallback.current_index
    }

    /// Completed requests, cached or not.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub(crate) fn fallback_mut(&mut self) -> &mut FallbackState {
        &mut self.fallback
    }

    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
    }
}
