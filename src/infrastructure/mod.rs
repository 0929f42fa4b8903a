//! Infrastructure layer module
//!
//! This module contains the adapters around the domain:
//! - Configuration sources (figment: YAML/TOML files, environment variables)
//! - Logging infrastructure (tracing-subscriber)
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
