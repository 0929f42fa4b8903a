//! Typed settings for the chat messages posted about Jira issues.
//!
//! [`MessageConfiguration::load`] reads every `message.*` key from a
//! [`ConfigMap`], coerces it and either returns a complete configuration or a
//! single [`ValidationError`] for the first problem found. Nothing is partially
//! built: the value only exists once every field is valid.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::date_formatter::{DateFormatter, DatePattern};
use crate::domain::error::{ValidationCause, ValidationError};
use crate::domain::ports::config_map::{AccessError, ConfigMap};

macro_rules! key_prefix {
    () => {
        "message."
    };
}

macro_rules! message_key {
    ($name:literal) => {
        concat!(key_prefix!(), $name)
    };
}

const KEY_PREFIX: &str = key_prefix!();

pub const USERNAME_KEY: &str = message_key!("username");
pub const USE_REAL_NAMES_KEY: &str = message_key!("use_real_names");
pub const ICON_URL_KEY: &str = message_key!("icon_url");
pub const DATE_PATTERN_KEY: &str = message_key!("date_pattern");
pub const DATE_LOCALE_KEY: &str = message_key!("date_locale");
pub const PRIORITY_COLORS_KEY: &str = message_key!("priority_colors");
pub const DEFAULT_COLOR_KEY: &str = message_key!("default_color");
pub const FIELDS_KEY: &str = message_key!("fields");
pub const WHITELISTED_KEY_PREFIXES_KEY: &str = message_key!("whitelisted_jira_key_prefixes");
pub const WHITELISTED_KEY_SUFFIXES_KEY: &str = message_key!("whitelisted_jira_key_suffixes");
pub const MAX_TEXT_LENGTH_KEY: &str = message_key!("max_text_length");

/// Keys that must be present for a configuration to load.
pub const REQUIRED_KEYS: [&str; 6] = [
    USE_REAL_NAMES_KEY,
    DATE_PATTERN_KEY,
    DATE_LOCALE_KEY,
    PRIORITY_COLORS_KEY,
    DEFAULT_COLOR_KEY,
    MAX_TEXT_LENGTH_KEY,
];

/// Every key read by [`MessageConfiguration::load`], in read order.
pub const ALL_KEYS: [&str; 11] = [
    USERNAME_KEY,
    USE_REAL_NAMES_KEY,
    ICON_URL_KEY,
    DATE_PATTERN_KEY,
    DATE_LOCALE_KEY,
    PRIORITY_COLORS_KEY,
    DEFAULT_COLOR_KEY,
    FIELDS_KEY,
    WHITELISTED_KEY_PREFIXES_KEY,
    WHITELISTED_KEY_SUFFIXES_KEY,
    MAX_TEXT_LENGTH_KEY,
];

/// Validated, immutable message settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageConfiguration {
    username: Option<String>,
    use_real_names: bool,
    icon_url: Option<String>,
    date_formatter: DateFormatter,
    priority_colors: bool,
    default_color: String,
    fields: Vec<String>,
    whitelisted_jira_key_prefixes: HashSet<char>,
    whitelisted_jira_key_suffixes: HashSet<char>,
    max_text_length: i32,
}

impl MessageConfiguration {
    /// Materialize the configuration from `config_map`.
    ///
    /// Keys are read in declaration order and the first failure wins.
    /// `max_text_length` is read as an `i64` and narrowed to `i32` keeping the
    /// low 32 bits, so `4_294_967_796` becomes `500`.
    pub fn load<C: ConfigMap + ?Sized>(config_map: &C) -> Result<Self, ValidationError> {
        match Self::read(config_map) {
            Ok(config) => {
                debug!(
                    fields = config.fields.len(),
                    prefixes = config.whitelisted_jira_key_prefixes.len(),
                    suffixes = config.whitelisted_jira_key_suffixes.len(),
                    max_text_length = config.max_text_length,
                    "message configuration loaded"
                );
                Ok(config)
            }
            Err(cause) => {
                warn!(key = cause.key(), error = %cause, "message configuration rejected");
                Err(ValidationError::new(cause))
            }
        }
    }

    fn read<C: ConfigMap + ?Sized>(map: &C) -> Result<Self, ValidationCause> {
        let username = optional(USERNAME_KEY, map.get_string(USERNAME_KEY))?;
        let use_real_names = required(USE_REAL_NAMES_KEY, map.get_bool(USE_REAL_NAMES_KEY))?;
        let icon_url = optional(ICON_URL_KEY, map.get_string(ICON_URL_KEY))?;
        let pattern = required(DATE_PATTERN_KEY, map.get_string(DATE_PATTERN_KEY))?;
        let pattern = DatePattern::compile(&pattern)?;
        let locale_tag = required(DATE_LOCALE_KEY, map.get_string(DATE_LOCALE_KEY))?;
        let date_formatter = pattern.with_locale(&locale_tag)?;
        let priority_colors = required(PRIORITY_COLORS_KEY, map.get_bool(PRIORITY_COLORS_KEY))?;
        let default_color = required(DEFAULT_COLOR_KEY, map.get_string(DEFAULT_COLOR_KEY))?;
        let fields = optional_string_list(map, FIELDS_KEY)?;
        let whitelisted_jira_key_prefixes =
            optional_character_set(map, WHITELISTED_KEY_PREFIXES_KEY)?;
        let whitelisted_jira_key_suffixes =
            optional_character_set(map, WHITELISTED_KEY_SUFFIXES_KEY)?;
        let max_text_length =
            narrow(required(MAX_TEXT_LENGTH_KEY, map.get_long(MAX_TEXT_LENGTH_KEY))?);

        Ok(Self {
            username,
            use_real_names,
            icon_url,
            date_formatter,
            priority_colors,
            default_color,
            fields,
            whitelisted_jira_key_prefixes,
            whitelisted_jira_key_suffixes,
            max_text_length,
        })
    }

    /// Name the bot posts as; `None` leaves the server default.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether users are shown by display name rather than login.
    pub const fn use_real_names(&self) -> bool {
        self.use_real_names
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub const fn date_formatter(&self) -> &DateFormatter {
        &self.date_formatter
    }

    /// Whether attachments are colored by issue priority.
    pub const fn priority_colors(&self) -> bool {
        self.priority_colors
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    /// Issue fields to include, in display order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Characters allowed directly before a Jira key in chat text.
    pub const fn whitelisted_jira_key_prefixes(&self) -> &HashSet<char> {
        &self.whitelisted_jira_key_prefixes
    }

    /// Characters allowed directly after a Jira key in chat text.
    pub const fn whitelisted_jira_key_suffixes(&self) -> &HashSet<char> {
        &self.whitelisted_jira_key_suffixes
    }

    pub const fn max_text_length(&self) -> i32 {
        self.max_text_length
    }
}

/// Collect every character of `s` into a set.
///
/// Whitespace and punctuation are members like any other character;
/// duplicates collapse.
pub fn to_character_set(s: &str) -> HashSet<char> {
    s.chars().collect()
}

/// Whether `key` lives under the `message.` namespace.
pub fn is_message_key(key: &str) -> bool {
    key.starts_with(KEY_PREFIX)
}

fn optional<T>(
    key: &'static str,
    value: Result<Option<T>, AccessError>,
) -> Result<Option<T>, ValidationCause> {
    value.map_err(|source| ValidationCause::from_access(key, source))
}

fn required<T>(
    key: &'static str,
    value: Result<Option<T>, AccessError>,
) -> Result<T, ValidationCause> {
    optional(key, value)?.ok_or(ValidationCause::MissingKey { key })
}

fn optional_string_list<C: ConfigMap + ?Sized>(
    map: &C,
    key: &'static str,
) -> Result<Vec<String>, ValidationCause> {
    Ok(optional(key, map.get_string_list(key))?.unwrap_or_default())
}

fn optional_character_set<C: ConfigMap + ?Sized>(
    map: &C,
    key: &'static str,
) -> Result<HashSet<char>, ValidationCause> {
    let raw = optional(key, map.get_string(key))?.unwrap_or_default();
    Ok(to_character_set(&raw))
}

/// Keep the low 32 bits.
#[allow(clippy::cast_possible_truncation)]
const fn narrow(value: i64) -> i32 {
    value as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::config_map::MemoryConfigMap;

    fn complete_map() -> MemoryConfigMap {
        MemoryConfigMap::new()
            .with_string(USERNAME_KEY, "jira-bot")
            .with_bool(USE_REAL_NAMES_KEY, true)
            .with_string(ICON_URL_KEY, "https://example.com/jira.png")
            .with_string(DATE_PATTERN_KEY, "yyyy-MM-dd")
            .with_string(DATE_LOCALE_KEY, "en-US")
            .with_bool(PRIORITY_COLORS_KEY, false)
            .with_string(DEFAULT_COLOR_KEY, "#205081")
            .with_string_list(FIELDS_KEY, ["assignee", "status", "priority"])
            .with_string(WHITELISTED_KEY_PREFIXES_KEY, " (")
            .with_string(WHITELISTED_KEY_SUFFIXES_KEY, " ),.")
            .with_long(MAX_TEXT_LENGTH_KEY, 500)
    }

    #[test]
    fn test_keys_share_prefix() {
        assert!(ALL_KEYS.iter().all(|key| is_message_key(key)));
        assert_eq!(USERNAME_KEY, "message.username");
        assert!(!is_message_key("username"));
        assert!(REQUIRED_KEYS.iter().all(|key| ALL_KEYS.contains(key)));
        assert_eq!(MAX_TEXT_LENGTH_KEY, "message.max_text_length");
    }

    #[test]
    fn test_load_complete_map() {
        let config = MessageConfiguration::load(&complete_map()).unwrap();

        assert_eq!(config.username(), Some("jira-bot"));
        assert!(config.use_real_names());
        assert_eq!(config.icon_url(), Some("https://example.com/jira.png"));
        assert_eq!(config.date_formatter().pattern(), "yyyy-MM-dd");
        assert_eq!(config.date_formatter().locale_tag(), "en_US");
        assert!(!config.priority_colors());
        assert_eq!(config.default_color(), "#205081");
        assert_eq!(config.fields(), ["assignee", "status", "priority"]);
        assert_eq!(
            config.whitelisted_jira_key_prefixes(),
            &HashSet::from([' ', '('])
        );
        assert_eq!(
            config.whitelisted_jira_key_suffixes(),
            &HashSet::from([' ', ')', ',', '.'])
        );
        assert_eq!(config.max_text_length(), 500);
    }

    #[test]
    fn test_optional_fields_default() {
        let map = complete_map()
            .without(USERNAME_KEY)
            .without(ICON_URL_KEY)
            .without(FIELDS_KEY)
            .without(WHITELISTED_KEY_PREFIXES_KEY)
            .without(WHITELISTED_KEY_SUFFIXES_KEY);

        let config = MessageConfiguration::load(&map).unwrap();

        assert_eq!(config.username(), None);
        assert_eq!(config.icon_url(), None);
        assert!(config.fields().is_empty());
        assert!(config.whitelisted_jira_key_prefixes().is_empty());
        assert!(config.whitelisted_jira_key_suffixes().is_empty());
    }

    #[test]
    fn test_each_required_key_is_enforced() {
        for key in REQUIRED_KEYS {
            let map = complete_map().without(key);
            let err = MessageConfiguration::load(&map).unwrap_err();
            assert_eq!(
                err.cause(),
                &ValidationCause::MissingKey { key },
                "removing {key} should fail"
            );
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let map = complete_map()
            .without(USE_REAL_NAMES_KEY)
            .without(MAX_TEXT_LENGTH_KEY);

        let err = MessageConfiguration::load(&map).unwrap_err();
        assert_eq!(err.key(), Some(USE_REAL_NAMES_KEY));
    }

    #[test]
    fn test_bad_pattern_reported_before_missing_locale() {
        let map = complete_map()
            .with_string(DATE_PATTERN_KEY, "yyyy-QQ")
            .without(DATE_LOCALE_KEY);

        let err = MessageConfiguration::load(&map).unwrap_err();
        assert!(matches!(
            err.cause(),
            ValidationCause::BadPattern { pattern, .. } if pattern == "yyyy-QQ"
        ));
    }

    #[test]
    fn test_bad_locale() {
        let map = complete_map().with_string(DATE_LOCALE_KEY, "xx-INVALID");

        let err = MessageConfiguration::load(&map).unwrap_err();
        assert_eq!(
            err.into_cause(),
            ValidationCause::BadLocale {
                tag: "xx-INVALID".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_type_is_wrapped() {
        let map = complete_map().with_string(PRIORITY_COLORS_KEY, "yes");

        let err = MessageConfiguration::load(&map).unwrap_err();
        assert!(matches!(
            err.cause(),
            ValidationCause::WrongType { key, .. } if *key == PRIORITY_COLORS_KEY
        ));
    }

    #[test]
    fn test_wrong_type_on_optional_field_still_fails() {
        let map = complete_map().with_string(FIELDS_KEY, "assignee");

        let err = MessageConfiguration::load(&map).unwrap_err();
        assert_eq!(err.key(), Some(FIELDS_KEY));
    }

    #[test]
    fn test_max_text_length_narrowing() {
        let cases = [
            (500_i64, 500_i32),
            (i64::from(i32::MAX), i32::MAX),
            (2_147_483_648, i32::MIN),
            (4_294_967_796, 500),
            (-1, -1),
        ];
        for (raw, expected) in cases {
            let map = complete_map().with_long(MAX_TEXT_LENGTH_KEY, raw);
            let config = MessageConfiguration::load(&map).unwrap();
            assert_eq!(config.max_text_length(), expected, "narrowing {raw}");
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let map = complete_map();
        let first = MessageConfiguration::load(&map).unwrap();
        let second = MessageConfiguration::load(&map).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_character_set() {
        assert!(to_character_set("").is_empty());
        assert_eq!(to_character_set("ab a"), HashSet::from(['a', 'b', ' ']));
        assert_eq!(to_character_set("äö-ä").len(), 3);
    }

    #[test]
    fn test_configuration_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MessageConfiguration>();
    }
}
