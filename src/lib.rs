//! Jira trigger message configuration
//!
//! Materializes the typed, validated settings used to format chat messages
//! about Jira issues from an untyped key-value configuration source.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): the configuration model, its validation and the `ConfigMap` port
//! - **Infrastructure Layer** (`infrastructure`): figment-backed configuration sources and logging
//! - **CLI Layer** (`cli`): the `check` command
//!
//! # Example
//!
//! ```
//! use jira_trigger_config::{MemoryConfigMap, MessageConfiguration};
//!
//! let map = MemoryConfigMap::new()
//!     .with_bool("message.use_real_names", true)
//!     .with_string("message.date_pattern", "yyyy-MM-dd")
//!     .with_string("message.date_locale", "en-US")
//!     .with_bool("message.priority_colors", true)
//!     .with_string("message.default_color", "#205081")
//!     .with_long("message.max_text_length", 500);
//!
//! let config = MessageConfiguration::load(&map).unwrap();
//! assert_eq!(config.max_text_length(), 500);
//! assert!(config.fields().is_empty());
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{to_character_set, DateFormatter, MessageConfiguration};
pub use domain::ports::{AccessError, ConfigMap, MemoryConfigMap};
pub use domain::{ValidationCause, ValidationError};
pub use infrastructure::config::{ConfigError, ConfigLoader, FigmentConfigMap};
