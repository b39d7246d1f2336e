// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Third Voice integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without network access.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted completion gateway that records the models it was asked for
//! - [`TestHarness`] - Temp SQLite storage plus a fully wired [`thirdvoice_coach::Coach`]

pub mod harness;
pub mod mock_provider;

pub use harness::TestHarness;
pub use mock_provider::{MockProvider, coach_reply_json};
