use errors::SecurityError;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating the gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse TOML: {reason}")]
    TomlParse { reason: String },

    #[error("Failed to parse YAML: {reason}")]
    YamlParse { reason: String },

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid role resolution settings: {0}")]
    Security(#[from] SecurityError)
}
