// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed identity for single-user front ends such as the CLI.

use async_trait::async_trait;

use thirdvoice_config::model::AppConfig;
use thirdvoice_core::{AdapterType, HealthStatus, IdentityAdapter, PluginAdapter, ThirdVoiceError, UserId};

/// Always reports the same user, or nobody.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user: Some(UserId(user_id.into())),
        }
    }

    /// An identity with nobody signed in.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Uses `app.user_id`; blank values count as not signed in.
    pub fn from_config(config: &AppConfig) -> Self {
        match config.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Self::new(id),
            _ => Self::anonymous(),
        }
    }
}

#[async_trait]
impl PluginAdapter for StaticIdentity {
    fn name(&self) -> &str {
        "static-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, ThirdVoiceError> {
        Ok(match self.user {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("no user configured".to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), ThirdVoiceError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityAdapter for StaticIdentity {
    async fn current_user(&self) -> Result<Option<UserId>, ThirdVoiceError> {
        Ok(self.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_user_is_reported() {
        let config = AppConfig {
            user_id: Some(" alice ".to_string()),
            ..AppConfig::default()
        };
        let identity = StaticIdentity::from_config(&config);
        assert_eq!(
            identity.current_user().await.unwrap(),
            Some(UserId("alice".to_string()))
        );
        assert_eq!(identity.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn blank_or_missing_user_is_anonymous() {
        let blank = AppConfig {
            user_id: Some("   ".to_string()),
            ..AppConfig::default()
        };
        assert!(StaticIdentity::from_config(&blank).current_user().await.unwrap().is_none());
        assert!(StaticIdentity::from_config(&AppConfig::default())
            .current_user()
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            StaticIdentity::anonymous().health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }
}
