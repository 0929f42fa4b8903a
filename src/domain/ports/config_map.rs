//! Key-value accessor port.
//!
//! The message configuration is read through this trait so the domain never
//! depends on a particular configuration source. Every getter distinguishes
//! three outcomes:
//! - `Ok(Some(value))` - the key is present and holds the requested kind
//! - `Ok(None)` - the key is absent
//! - `Err(AccessError)` - the key is present but cannot be read as that kind

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// The value kinds a [`ConfigMap`] can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A single string
    String,
    /// A boolean flag
    Bool,
    /// An ordered list of strings
    StringList,
    /// A 64-bit signed integer
    Long,
}

impl ValueKind {
    /// Human readable name used in error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "boolean",
            Self::StringList => "list of strings",
            Self::Long => "integer",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a [`ConfigMap`] when a present value has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{key} holds {found} value, expected {expected}")]
    WrongType {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("{key} cannot be read as {expected}: {message}")]
    Unreadable {
        key: String,
        expected: ValueKind,
        message: String,
    },

    #[error("{key} is an integer outside the 64-bit range: {value}")]
    OutOfRange { key: String, value: String },
}

/// Typed, read-only access to a flat key-value configuration store.
///
/// Keys are dotted paths such as `message.max_text_length`.
pub trait ConfigMap {
    /// Look up a string value.
    fn get_string(&self, key: &str) -> Result<Option<String>, AccessError>;

    /// Look up a boolean value.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, AccessError>;

    /// Look up an ordered list of strings.
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, AccessError>;

    /// Look up an integer value.
    fn get_long(&self, key: &str) -> Result<Option<i64>, AccessError>;
}

impl<C: ConfigMap + ?Sized> ConfigMap for &C {
    fn get_string(&self, key: &str) -> Result<Option<String>, AccessError> {
        (**self).get_string(key)
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, AccessError> {
        (**self).get_bool(key)
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, AccessError> {
        (**self).get_string_list(key)
    }

    fn get_long(&self, key: &str) -> Result<Option<i64>, AccessError> {
        (**self).get_long(key)
    }
}

/// A value held by [`MemoryConfigMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// A single string
    String(String),
    /// A boolean flag
    Bool(bool),
    /// An ordered list of strings
    StringList(Vec<String>),
    /// A 64-bit signed integer
    Long(i64),
}

impl ConfigValue {
    /// The kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::StringList(_) => ValueKind::StringList,
            Self::Long(_) => ValueKind::Long,
        }
    }
}

/// In-memory [`ConfigMap`], mostly useful for tests and programmatic setup.
///
/// Lookups are strict: asking for a kind other than the stored one is an
/// [`AccessError::WrongType`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryConfigMap {
    values: HashMap<String, ConfigValue>,
}

impl MemoryConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    /// Remove `key`, returning the value it held.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, ConfigValue::String(value.into()));
        self
    }

    #[must_use]
    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.insert(key, ConfigValue::Bool(value));
        self
    }

    #[must_use]
    pub fn with_string_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.insert(key, ConfigValue::StringList(list));
        self
    }

    #[must_use]
    pub fn with_long(mut self, key: impl Into<String>, value: i64) -> Self {
        self.insert(key, ConfigValue::Long(value));
        self
    }

    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.remove(key);
        self
    }

    fn lookup(&self, key: &str, expected: ValueKind) -> Result<Option<&ConfigValue>, AccessError> {
        match self.values.get(key) {
            Some(value) if value.kind() != expected => Err(AccessError::WrongType {
                key: key.to_string(),
                expected,
                found: value.kind(),
            }),
            other => Ok(other),
        }
    }
}

impl ConfigMap for MemoryConfigMap {
    fn get_string(&self, key: &str) -> Result<Option<String>, AccessError> {
        Ok(match self.lookup(key, ValueKind::String)? {
            Some(ConfigValue::String(value)) => Some(value.clone()),
            _ => None,
        })
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, AccessError> {
        Ok(match self.lookup(key, ValueKind::Bool)? {
            Some(ConfigValue::Bool(value)) => Some(*value),
            _ => None,
        })
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, AccessError> {
        Ok(match self.lookup(key, ValueKind::StringList)? {
            Some(ConfigValue::StringList(values)) => Some(values.clone()),
            _ => None,
        })
    }

    fn get_long(&self, key: &str) -> Result<Option<i64>, AccessError> {
        Ok(match self.lookup(key, ValueKind::Long)? {
            Some(ConfigValue::Long(value)) => Some(*value),
            _ => None,
        })
    }
}
