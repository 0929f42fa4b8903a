//! Domain layer for the Jira trigger message configuration
//!
//! This module contains the configuration model, its validation rules and the
//! key-value accessor port it is read through.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{ValidationCause, ValidationError};
