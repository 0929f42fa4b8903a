use thiserror::Error;

use super::models::date_formatter::DateFormatError;
use super::ports::config_map::AccessError;

/// The first failure that stopped a message configuration from loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationCause {
    #[error("{key} must be provided")]
    MissingKey { key: &'static str },

    #[error("{key} has the wrong type: {source}")]
    WrongType {
        key: &'static str,
        #[source]
        source: AccessError,
    },

    #[error("Invalid date pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },

    #[error("Invalid date locale {tag:?}")]
    BadLocale { tag: String },

    #[error("{key} is not a valid integer: {value}")]
    BadInteger { key: &'static str, value: String },
}

impl ValidationCause {
    /// Classify an accessor failure for `key`.
    pub fn from_access(key: &'static str, source: AccessError) -> Self {
        match source {
            AccessError::OutOfRange { value, .. } => Self::BadInteger { key, value },
            source => Self::WrongType { key, source },
        }
    }

    /// The configuration key this failure relates to, when there is one.
    pub const fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingKey { key }
            | Self::WrongType { key, .. }
            | Self::BadInteger { key, .. } => Some(*key),
            Self::BadPattern { .. } | Self::BadLocale { .. } => None,
        }
    }
}

impl From<DateFormatError> for ValidationCause {
    fn from(err: DateFormatError) -> Self {
        match err {
            DateFormatError::InvalidPattern { pattern, reason } => {
                Self::BadPattern { pattern, reason }
            }
            DateFormatError::UnknownLocale { tag } => Self::BadLocale { tag },
        }
    }
}

/// A message configuration could not be built.
///
/// Wraps exactly one [`ValidationCause`]: the first failure encountered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Message configuration is invalid: {cause}")]
pub struct ValidationError {
    #[source]
    cause: ValidationCause,
}

impl ValidationError {
    pub const fn new(cause: ValidationCause) -> Self {
        Self { cause }
    }

    pub const fn cause(&self) -> &ValidationCause {
        &self.cause
    }

    pub fn into_cause(self) -> ValidationCause {
        self.cause
    }

    /// The configuration key the failure relates to, when there is one.
    pub const fn key(&self) -> Option<&'static str> {
        self.cause.key()
    }
}

impl From<ValidationCause> for ValidationError {
    fn from(cause: ValidationCause) -> Self {
        Self::new(cause)
    }
}
