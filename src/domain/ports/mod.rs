//! Port trait definitions (Hexagonal Architecture)
//!
//! - ConfigMap: typed read access to a key-value configuration store
//!
//! Keeping the accessor behind a trait lets the domain stay independent of
//! the configuration file format and loading mechanism.

pub mod config_map;

pub use config_map::{AccessError, ConfigMap, ConfigValue, MemoryConfigMap, ValueKind};
