// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of storage, gateway, identity, and coach from configuration.

use std::sync::Arc;

use async_trait::async_trait;
use thirdvoice_coach::{Coach, StaticIdentity};
use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::{
    AdapterType, CompletionOutcome, CompletionRequest, HealthStatus, PluginAdapter,
    ProviderAdapter, StorageAdapter, ThirdVoiceError,
};
use thirdvoice_openrouter::OpenRouterProvider;
use thirdvoice_storage::SqliteStorage;
use tracing::{debug, warn};

pub struct App {
    pub coach: Coach,
    storage: Arc<dyn StorageAdapter>,
}

impl App {
    /// Opens storage and builds the coach.
    ///
    /// When `needs_gateway` is false the API key is not required; any
    /// completion attempted anyway fails without touching the network.
    pub async fn open(config: &ThirdVoiceConfig, needs_gateway: bool) -> Result<Self, ThirdVoiceError> {
        let provider: Arc<dyn ProviderAdapter> = if needs_gateway {
            Arc::new(OpenRouterProvider::new(config)?)
        } else {
            Arc::new(OfflineProvider)
        };

        let storage = SqliteStorage::open(config.storage.clone()).await?;
        debug!(path = %config.storage.database_path, "storage opened");
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
        let identity = Arc::new(StaticIdentity::from_config(&config.app));

        let coach = Coach::from_config(provider, storage.clone(), identity, config.clone());
        Ok(Self { coach, storage })
    }

    /// Flushes storage. Failures are logged; the command already finished.
    pub async fn close(self) {
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "failed to close storage cleanly");
        }
    }
}

/// Stands in for the gateway in commands that never complete anything.
struct OfflineProvider;

#[async_trait]
impl PluginAdapter for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ThirdVoiceError> {
        Ok(HealthStatus::Degraded("gateway not configured".to_string()))
    }

    async fn shutdown(&self) -> Result<(), ThirdVoiceError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OfflineProvider {
    async fn attempt(&self, _request: &CompletionRequest) -> CompletionOutcome {
        CompletionOutcome::FatalFailure {
            reason: "completion gateway not configured for this command".to_string(),
        }
    }
}
