// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model selection for the Third Voice completion client.
//!
//! This crate provides:
//! - [`ModelRegistry`]: the ordered list of candidate models read from `[models]`
//! - [`FallbackCursor`]: a view over a session's [`FallbackState`] that picks
//!   the model for the next attempt and demotes it on failure
//!
//! The registry is immutable for a configuration load. The state is owned by
//! the caller's session and borrowed mutably for the length of one completion.

pub mod cursor;
pub mod registry;

pub use cursor::{FallbackCursor, FallbackState};
pub use registry::{FALLBACK_MODEL, ModelRegistry};
