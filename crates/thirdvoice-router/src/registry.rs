// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered candidate models read from configuration.

use thirdvoice_config::model::ModelsConfig;
use tracing::{debug, warn};

/// Model used when the configuration names no usable candidates.
pub const FALLBACK_MODEL: &str = "google/gemma-2-9b-it:free";

/// The ordered, non-empty list of candidate model identifiers.
///
/// Index 0 is the primary model. Entries are read as `model1`, `model2`, ...
/// and the scan stops at the first missing number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    models: Vec<String>,
}

impl ModelRegistry {
    /// Builds the registry from the `[models]` section.
    ///
    /// Blank values are skipped but do not end the scan. Entries numbered
    /// past a gap are ignored and reported once at `warn`.
    pub fn from_config(config: &ModelsConfig) -> Self {
        let mut models = Vec::new();
        let mut n = 1usize;

        while let Some(value) = config.get(&format!("model{n}")) {
            let value = value.trim();
            if value.is_empty() {
                debug!(key = %format!("model{n}"), "skipping blank model entry");
            } else {
                models.push(value.to_string());
            }
            n += 1;
        }

        let ignored: Vec<&str> = config
            .entries
            .keys()
            .filter(|key| {
                key.strip_prefix("model")
                    .and_then(|suffix| suffix.parse::<usize>().ok())
                    .is_some_and(|i| i > n)
            })
            .map(String::as_str)
            .collect();
        if !ignored.is_empty() {
            warn!(
                missing = %format!("model{n}"),
                ignored = ?ignored,
                "model list has a gap; entries after it are ignored"
            );
        }

        if models.is_empty() {
            debug!(model = FALLBACK_MODEL, "no models configured, using fallback");
            models.push(FALLBACK_MODEL.to_string());
        }

        Self { models }
    }

    /// Builds a registry directly from identifiers, in priority order.
    ///
    /// An empty input yields `[FALLBACK_MODEL]`.
    pub fn from_models<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut models: Vec<String> = models.into_iter().map(Into::into).collect();
        if models.is_empty() {
            models.push(FALLBACK_MODEL.to_string());
        }
        Self { models }
    }

    pub fn list_models(&self) -> &[String] {
        &self.models
    }

    /// The primary (first-choice) model.
    pub fn primary(&self) -> &str {
        // Never empty: both constructors insert the fallback.
        self.models.first().map(String::as_str).unwrap_or(FALLBACK_MODEL)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
