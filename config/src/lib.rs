//! # Configuration System
//!
//! Centralized configuration management for the R&D gateway.
//!
//! This crate provides:
//! - Configuration structures for the HTTP server, the microservice client,
//!   role resolution, the identity headers and observability
//! - Configuration file loading (TOML/YAML)
//! - Environment variable overrides (`RND_*`, 12-factor app principles)
//! - Configuration precedence (CLI > env > file > defaults)
//! - Configuration validation with the `validator` crate

pub mod config;
pub mod error;
pub mod file_loader;
pub mod loader;
pub mod precedence;

pub use config::{
    FreezebeeConfig, GatewayConfig, IdentityConfig, LogFormat, ObservabilityConfig,
    SecurityConfig, ServerConfig
};
pub use error::{ConfigError, ConfigResult};
pub use file_loader::{load_from_file, load_from_toml, load_from_yaml};
pub use loader::apply_env_overrides;
pub use precedence::{CliOverrides, resolve, resolve_with};
pub use validator::Validate;
