// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity adapter trait resolving the current user.

use async_trait::async_trait;

use crate::error::ThirdVoiceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserId;

/// Supplies the identity of the user on whose behalf work is done.
///
/// How the identity was established (hosted auth session, CLI flag, test
/// fixture) is invisible to the rest of the system.
#[async_trait]
pub trait IdentityAdapter: PluginAdapter {
    /// Returns the current user, or `None` when nobody is signed in.
    async fn current_user(&self) -> Result<Option<UserId>, ThirdVoiceError>;
}
