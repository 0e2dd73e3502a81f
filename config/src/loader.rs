//! # Environment Variable Loader
//!
//! Applies `RND_*` environment variables on top of a loaded configuration,
//! following 12-factor app principles.
//!
//! ## Environment Variables
//! ### Server
//! - `RND_SERVER_HOST`: interface to bind (default: "0.0.0.0")
//! - `RND_SERVER_PORT`: listening port (default: 8080)
//!
//! ### Microservice client
//! - `RND_FREEZEBEE_URL`: base URL (default: "http://localhost:8000")
//! - `RND_FREEZEBEE_TIMEOUT_SECONDS`: request timeout (default: 30)
//! - `RND_FREEZEBEE_API_TOKEN`: bearer token (optional)
//!
//! ### Security
//! - `RND_LDAP_ATTRIBUTE`: membership attribute (default: "ismemberof")
//! - `RND_LDAP_GROUP_PATTERN`: group-name regex with a `group` capture
//! - `RND_ROLE_MAPPING`: `group=ROLE;group2=ROLE2`, replaces the file mapping
//!
//! ### Identity
//! - `RND_IDENTITY_USER_HEADER` (default: "x-remote-user")
//! - `RND_IDENTITY_ATTRIBUTE_PREFIX` (default: "x-remote-attr-")
//! - `RND_IDENTITY_VALUE_SEPARATOR` (default: ";")
//!
//! ### Observability
//! - `RND_LOG_LEVEL`: trace/debug/info/warn/error
//! - `RND_LOG_FORMAT`: text/json
//! - `RND_METRICS_ENABLED`: true/false

use crate::config::{GatewayConfig, LogFormat};
use crate::error::{ConfigError, ConfigResult};
use security::RoleMapping;
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Applies environment overrides read from the process environment.
pub fn apply_env_overrides(config: GatewayConfig) -> ConfigResult<GatewayConfig> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

pub(crate) fn apply_overrides_from<F>(
    mut config: GatewayConfig,
    lookup: F
) -> ConfigResult<GatewayConfig>
where
    F: Fn(&str) -> Option<String>
{
    let var = |key: &str| {
        let value = lookup(key);
        if value.is_some() {
            debug!(key, "Configuration overridden from environment");
        }
        value
    };

    if let Some(host) = var("RND_SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = var("RND_SERVER_PORT") {
        config.server.port = parse_value("RND_SERVER_PORT", &port)?;
    }

    if let Some(url) = var("RND_FREEZEBEE_URL") {
        config.freezebee.base_url = url;
    }
    if let Some(timeout) = var("RND_FREEZEBEE_TIMEOUT_SECONDS") {
        config.freezebee.timeout_seconds = parse_value("RND_FREEZEBEE_TIMEOUT_SECONDS", &timeout)?;
    }
    if let Some(token) = var("RND_FREEZEBEE_API_TOKEN") {
        config.freezebee.api_token = Some(token).filter(|t| !t.is_empty());
    }

    if let Some(attribute) = var("RND_LDAP_ATTRIBUTE") {
        config.security.attribute_name = attribute;
    }
    if let Some(pattern) = var("RND_LDAP_GROUP_PATTERN") {
        config.security.group_name_pattern = pattern;
    }
    if let Some(mapping) = var("RND_ROLE_MAPPING") {
        config.security.role_mapping = RoleMapping::parse(&mapping)?;
    }

    if let Some(header) = var("RND_IDENTITY_USER_HEADER") {
        config.identity.user_header = header.to_ascii_lowercase();
    }
    if let Some(prefix) = var("RND_IDENTITY_ATTRIBUTE_PREFIX") {
        config.identity.attribute_header_prefix = prefix.to_ascii_lowercase();
    }
    if let Some(separator) = var("RND_IDENTITY_VALUE_SEPARATOR") {
        config.identity.value_separator = separator;
    }

    if let Some(level) = var("RND_LOG_LEVEL") {
        config.observability.log_level = level.to_lowercase();
    }
    if let Some(format) = var("RND_LOG_FORMAT") {
        config.observability.log_format = match format.to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    key: "RND_LOG_FORMAT".to_string(),
                    reason: format!("expected text or json, got {format}")
                });
            }
        };
    }
    if let Some(enabled) = var("RND_METRICS_ENABLED") {
        config.observability.metrics_enabled = parse_value("RND_METRICS_ENABLED", &enabled)?;
    }

    Ok(config)
}

fn parse_value<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key: key.to_string(),
        reason: e.to_string()
    })
}
