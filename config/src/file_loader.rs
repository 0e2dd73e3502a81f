//! # Configuration File Loading
//!
//! Loads configuration from TOML or YAML files, detecting the format from the
//! file extension. Missing sections and fields fall back to their defaults.

use crate::config::GatewayConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|_e| ConfigError::FileNotFound {
        path: path.display().to_string()
    })
}

/// Load configuration from a TOML file.
pub fn load_from_toml(path: &Path) -> ConfigResult<GatewayConfig> {
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::TomlParse {
        reason: e.to_string()
    })
}

/// Load configuration from a YAML file.
pub fn load_from_yaml(path: &Path) -> ConfigResult<GatewayConfig> {
    let contents = read(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::YamlParse {
        reason: e.to_string()
    })
}

/// Load configuration from file with auto-detection.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`, `.yml`: YAML format
pub fn load_from_file(path: &Path) -> ConfigResult<GatewayConfig> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigError::UnsupportedFormat {
            extension: other.to_string()
        })
    }
}
