//! # Configuration Structures
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization, every field defaulted
//! - Use `validator` for input validation

use errors::SecurityError;
use security::{
    DEFAULT_ATTRIBUTE_NAME, DEFAULT_GROUP_NAME_PATTERN, LdapRoleFetcher, RoleMapping,
    compile_group_name_pattern
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure for the R&D gateway.
///
/// ## Fields
/// - `server`: HTTP listener
/// - `freezebee`: remote R&D microservice client
/// - `security`: directory group to role resolution
/// - `identity`: headers forwarded by the authenticating proxy
/// - `observability`: logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub freezebee: FreezebeeConfig,

    #[serde(default)]
    #[validate(nested)]
    pub security: SecurityConfig,

    #[serde(default)]
    #[validate(nested)]
    pub identity: IdentityConfig,

    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    /// Listening port
    #[serde(default = "default_server_port")]
    #[validate(range(min = 1, max = 65535))]
    pub port: u16
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port()
        }
    }
}

/// Remote R&D microservice ("Freezebee") client settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FreezebeeConfig {
    /// Base URL of the microservice API, e.g. `http://freezebee:8000/api`
    #[serde(default = "default_freezebee_base_url")]
    #[validate(url)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_freezebee_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,

    /// Bearer token sent to the microservice, when it requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>
}

fn default_freezebee_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_freezebee_timeout() -> u64 {
    30
}

impl Default for FreezebeeConfig {
    fn default() -> Self {
        Self {
            base_url: default_freezebee_base_url(),
            timeout_seconds: default_freezebee_timeout(),
            api_token: None
        }
    }
}

/// Directory group to role resolution.
///
/// ```toml
/// [security]
/// attribute_name = "ismemberof"
///
/// [security.role_mapping]
/// "RND-Researchers" = "ROLE_CHERCHEUR"
/// "RND-Testers" = "ROLE_TESTEUR"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct SecurityConfig {
    /// Directory attribute listing the principal's groups
    #[serde(default = "default_attribute_name")]
    #[validate(length(min = 1, max = 255))]
    pub attribute_name: String,

    /// Regex with a `group` capture extracting the canonical group name
    #[serde(default = "default_group_name_pattern")]
    #[validate(custom(function = "validate_group_name_pattern"))]
    pub group_name_pattern: String,

    /// Canonical group name to role identifier
    #[serde(default)]
    pub role_mapping: RoleMapping
}

impl SecurityConfig {
    /// Builds the role resolver described by this configuration.
    pub fn build_role_fetcher(&self) -> Result<LdapRoleFetcher, SecurityError> {
        LdapRoleFetcher::with_options(
            self.role_mapping.clone(),
            self.attribute_name.clone(),
            &self.group_name_pattern
        )
    }
}

fn default_attribute_name() -> String {
    DEFAULT_ATTRIBUTE_NAME.to_string()
}

fn default_group_name_pattern() -> String {
    DEFAULT_GROUP_NAME_PATTERN.to_string()
}

fn validate_group_name_pattern(value: &str) -> Result<(), validator::ValidationError> {
    compile_group_name_pattern(value).map(|_| ()).map_err(|e| {
        let mut err = validator::ValidationError::new("group_name_pattern");
        err.message = Some(e.to_string().into());
        err
    })
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            attribute_name: default_attribute_name(),
            group_name_pattern: default_group_name_pattern(),
            role_mapping: RoleMapping::default()
        }
    }
}

/// Headers set by the authenticating reverse proxy in front of the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct IdentityConfig {
    /// Header carrying the authenticated user
    #[serde(default = "default_user_header")]
    #[validate(length(min = 1, max = 128))]
    pub user_header: String,

    /// Prefix of headers carrying directory attributes
    /// (`x-remote-attr-ismemberof`)
    #[serde(default = "default_attribute_header_prefix")]
    #[validate(length(min = 1, max = 128))]
    pub attribute_header_prefix: String,

    /// Separator between the values of a multi-valued attribute header
    #[serde(default = "default_value_separator")]
    #[validate(length(min = 1, max = 8))]
    pub value_separator: String
}

fn default_user_header() -> String {
    "x-remote-user".to_string()
}

fn default_attribute_header_prefix() -> String {
    "x-remote-attr-".to_string()
}

fn default_value_separator() -> String {
    ";".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
            attribute_header_prefix: default_attribute_header_prefix(),
            value_separator: default_value_separator()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    /// trace/debug/info/warn/error; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

fn validate_log_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid log level"))
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_enabled: default_metrics_enabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.security.attribute_name, "ismemberof");
        assert_eq!(config.identity.user_header, "x-remote-user");
        assert_eq!(config.observability.log_format, LogFormat::Text);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = GatewayConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = GatewayConfig::default();
        config.freezebee.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = GatewayConfig::default();
        config.observability.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pattern_without_group_capture_fails_validation() {
        let mut config = GatewayConfig::default();
        config.security.group_name_pattern = "^CN=([^,]+)".to_string();

        let errors = config.validate().unwrap_err();
        assert!(errors.errors().contains_key("security"));
    }

    #[test]
    fn test_build_role_fetcher() {
        let config = SecurityConfig {
            role_mapping: RoleMapping::new([("RND-Testers", "ROLE_TESTEUR")]),
            ..Default::default()
        };

        let fetcher = config.build_role_fetcher().unwrap();
        assert_eq!(fetcher.attribute_name(), "ismemberof");
        assert_eq!(fetcher.mapping().get("RND-Testers"), Some("ROLE_TESTEUR"));
    }

    #[test]
    fn test_build_role_fetcher_rejects_bad_pattern() {
        let config = SecurityConfig {
            group_name_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.build_role_fetcher(),
            Err(SecurityError::InvalidPattern { .. })
        ));
    }
}
