//! Application state shared by every handler.

use config::{GatewayConfig, IdentityConfig};
use freezebee::FreezebeeClient;
use metrics_exporter_prometheus::PrometheusHandle;
use rnd_core::FreezebeeApi;
use security::RoleFetcher;
use std::sync::Arc;

use crate::error::{GatewayError, Result};

pub struct AppState {
    /// R&D microservice.
    pub api: Arc<dyn FreezebeeApi>,
    /// Directory group to role resolution, built once at startup.
    pub fetcher: Arc<dyn RoleFetcher>,
    pub identity: IdentityConfig,
    /// Present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>
}

impl AppState {
    pub fn new(
        api: Arc<dyn FreezebeeApi>,
        fetcher: Arc<dyn RoleFetcher>,
        identity: IdentityConfig
    ) -> Self {
        Self {
            api,
            fetcher,
            identity,
            metrics: None
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Builds the role resolver and the microservice client from
    /// configuration. An invalid group-name pattern fails here, before the
    /// server starts.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let fetcher = config.security.build_role_fetcher()?;
        if fetcher.mapping().is_empty() {
            tracing::warn!("Role mapping is empty, no principal will be granted a role");
        }
        tracing::info!(
            attribute = fetcher.attribute_name(),
            groups = fetcher.mapping().len(),
            "Role resolution configured"
        );

        let client =
            FreezebeeClient::from_config(&config.freezebee).map_err(|e| GatewayError::Server {
                reason: format!("Failed to build microservice client: {e}")
            })?;
        tracing::info!(base_url = client.base_url(), "Microservice client configured");

        Ok(Self::new(
            Arc::new(client),
            Arc::new(fetcher),
            config.identity.clone()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_invalid_pattern() {
        let mut config = GatewayConfig::default();
        config.security.group_name_pattern = "^CN=(.*)$".to_string();

        assert!(matches!(
            AppState::from_config(&config),
            Err(GatewayError::Security(_))
        ));
    }

    #[test]
    fn test_from_config_defaults() {
        let state = AppState::from_config(&GatewayConfig::default()).unwrap();
        assert!(state.metrics.is_none());
        assert_eq!(state.identity.user_header, "x-remote-user");
    }
}
