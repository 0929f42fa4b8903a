use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Toml, Yaml};
use figment::{Figment, Provider};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::models::message_config::MessageConfiguration;
use crate::domain::ports::config_map::{AccessError, ConfigMap, ValueKind};

/// Environment prefix used by [`ConfigLoader`].
pub const DEFAULT_ENV_PREFIX: &str = "JIRA_TRIGGER_";

/// Configuration source errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error(
        "Unsupported configuration format {extension:?} for {path}. Must be one of: yaml, yml, toml"
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
}

/// [`ConfigMap`] backed by a figment provider stack.
///
/// Keys are dotted paths into the merged document, so `message.fields` reads
/// the `fields` entry of the `message` table.
#[derive(Debug, Clone)]
pub struct FigmentConfigMap {
    figment: Figment,
}

impl FigmentConfigMap {
    pub const fn new(figment: Figment) -> Self {
        Self { figment }
    }

    /// Load a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let figment = match extension.as_str() {
            "yaml" | "yml" => Figment::new().merge(Yaml::file(path)),
            "toml" => Figment::new().merge(Toml::file(path)),
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    extension,
                })
            }
        };

        // Providers are lazy; surface syntax errors now rather than as absent keys.
        figment.data().map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;

        Ok(Self { figment })
    }

    /// Layer environment variables on top of the current sources.
    ///
    /// `<PREFIX>MESSAGE__MAX_TEXT_LENGTH=800` overrides `message.max_text_length`.
    #[must_use]
    pub fn with_env_prefix(self, prefix: &str) -> Self {
        Self {
            figment: self.figment.merge(Env::prefixed(prefix).split("__")),
        }
    }

    /// Blank entries (`username:` in YAML) read as absent.
    fn lookup<T: DeserializeOwned>(
        &self,
        key: &str,
        expected: ValueKind,
    ) -> Result<Option<T>, AccessError> {
        if !self.figment.contains(key) {
            return Ok(None);
        }
        self.figment
            .extract_inner::<Option<T>>(key)
            .map_err(|err| AccessError::Unreadable {
                key: key.to_string(),
                expected,
                message: err.to_string(),
            })
    }
}

impl From<Figment> for FigmentConfigMap {
    fn from(figment: Figment) -> Self {
        Self::new(figment)
    }
}

impl ConfigMap for FigmentConfigMap {
    fn get_string(&self, key: &str) -> Result<Option<String>, AccessError> {
        self.lookup(key, ValueKind::String)
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, AccessError> {
        self.lookup(key, ValueKind::Bool)
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, AccessError> {
        self.lookup(key, ValueKind::StringList)
    }

    fn get_long(&self, key: &str) -> Result<Option<i64>, AccessError> {
        match self.lookup::<i64>(key, ValueKind::Long) {
            Err(err) => match self.lookup::<u64>(key, ValueKind::Long) {
                Ok(Some(value)) => Err(AccessError::OutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                _ => Err(err),
            },
            found => found,
        }
    }
}

/// Entry points that read a configuration file and validate it.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the message configuration from `path`.
    ///
    /// Precedence (lowest to highest):
    /// 1. The YAML or TOML file at `path`
    /// 2. Environment variables (`JIRA_TRIGGER_*` prefix, `__` separates levels)
    pub fn load_message_config(path: impl AsRef<Path>) -> Result<MessageConfiguration> {
        let config_map = Self::config_map(path.as_ref(), true)?;
        Self::validate(&config_map)
    }

    /// Load the message configuration from `path` without environment overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<MessageConfiguration> {
        let config_map = Self::config_map(path.as_ref(), false)?;
        Self::validate(&config_map)
    }

    /// Build the key-value accessor for `path`.
    pub fn config_map(path: &Path, with_env: bool) -> Result<FigmentConfigMap> {
        let config_map = FigmentConfigMap::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Ok(if with_env {
            config_map.with_env_prefix(DEFAULT_ENV_PREFIX)
        } else {
            config_map
        })
    }

    /// Materialize and validate the message configuration.
    pub fn validate(config_map: &impl ConfigMap) -> Result<MessageConfiguration> {
        MessageConfiguration::load(config_map).context("Failed to validate message configuration")
    }
}
