// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-fallback completion client.
//!
//! [`FallbackCompleter`] turns a single-attempt [`ProviderAdapter`] into a
//! bounded, sequential retry loop over the configured candidate models.
//! Only a coherent success or one aggregated error leaves this crate.

pub mod completer;

pub use completer::{Completion, CompletionParams, DEFAULT_RETRY_DELAY, FallbackCompleter};
pub use thirdvoice_router::{FallbackState, ModelRegistry};

#[doc(no_inline)]
pub use thirdvoice_core::traits::ProviderAdapter;
