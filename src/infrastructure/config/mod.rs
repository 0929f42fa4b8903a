//! Configuration source infrastructure
//!
//! Figment-backed implementation of the domain's `ConfigMap` port:
//! - YAML and TOML file loading
//! - Environment variable overrides
//! - Validation into a typed `MessageConfiguration`

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, FigmentConfigMap, DEFAULT_ENV_PREFIX};
