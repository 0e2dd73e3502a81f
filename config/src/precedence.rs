//! # Configuration Precedence
//!
//! Resolves the effective configuration from every source.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::config::GatewayConfig;
use crate::error::ConfigResult;
use crate::file_loader::load_from_file;
use crate::loader::{apply_env_overrides, apply_overrides_from};
use std::path::Path;
use tracing::info;
use validator::Validate;

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>
}

impl CliOverrides {
    fn apply(&self, mut config: GatewayConfig) -> GatewayConfig {
        if let Some(host) = &self.host {
            info!(host, "Server host overridden from command line");
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            info!(port, "Server port overridden from command line");
            config.server.port = port;
        }
        config
    }
}

/// Loads the file (or defaults), applies environment and CLI overrides, then
/// validates the result.
pub fn resolve(path: Option<&Path>, cli: &CliOverrides) -> ConfigResult<GatewayConfig> {
    let config = base_config(path)?;
    finish(cli.apply(apply_env_overrides(config)?))
}

fn base_config(path: Option<&Path>) -> ConfigResult<GatewayConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            load_from_file(path)
        }
        None => Ok(GatewayConfig::default())
    }
}

fn finish(config: GatewayConfig) -> ConfigResult<GatewayConfig> {
    config.validate()?;
    Ok(config)
}

/// [`resolve`] with an explicit environment, for callers that do not read
/// the process environment.
pub fn resolve_with<F>(
    path: Option<&Path>,
    cli: &CliOverrides,
    lookup: F
) -> ConfigResult<GatewayConfig>
where
    F: Fn(&str) -> Option<String>
{
    let config = base_config(path)?;
    finish(cli.apply(apply_overrides_from(config, lookup)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::fs;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_with(None, &CliOverrides::default(), no_env).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("toml");
        fs::write(
            &path,
            "[server]\nhost = \"10.0.0.1\"\nport = 7000\n\n[freezebee]\ntimeout_seconds = 12\n"
        )
        .unwrap();

        let env = |key: &str| match key {
            "RND_SERVER_PORT" => Some("7100".to_string()),
            "RND_SERVER_HOST" => Some("10.0.0.2".to_string()),
            _ => None
        };
        let cli = CliOverrides {
            host: None,
            port: Some(7200)
        };

        let config = resolve_with(Some(&path), &cli, env).unwrap();
        assert_eq!(config.server.port, 7200);
        assert_eq!(config.server.host, "10.0.0.2");
        assert_eq!(config.freezebee.timeout_seconds, 12);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resolved_config_is_validated() {
        let env = |key: &str| (key == "RND_FREEZEBEE_URL").then(|| "nope".to_string());

        let err = resolve_with(None, &CliOverrides::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = resolve_with(
            Some(Path::new("/nonexistent/gateway.toml")),
            &CliOverrides::default(),
            no_env
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
