//! Locale-aware date formatter built from a pattern and a locale tag.
//!
//! Patterns are written with the Joda/CLDR pattern letters used in the
//! trigger's configuration files (`yyyy-MM-dd`, `EEEE d MMMM`, ...). They are
//! compiled once into a chrono strftime string; formatting then goes through
//! chrono's localized formatter so month and weekday names follow the locale.
//!
//! Construction is two-staged: [`DatePattern::compile`] validates the pattern
//! and [`DatePattern::with_locale`] binds it to a locale, yielding a
//! [`DateFormatter`].

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use thiserror::Error;

/// Errors raised while deriving a [`DateFormatter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    #[error("invalid date pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unknown locale tag {tag:?}")]
    UnknownLocale { tag: String },
}

/// A validated date pattern that is not yet bound to a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    pattern: String,
    strftime: String,
}

impl DatePattern {
    /// Compile a Joda-style pattern.
    pub fn compile(pattern: &str) -> Result<Self, DateFormatError> {
        let strftime = translate(pattern).map_err(|reason| DateFormatError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        })?;

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(DateFormatError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("compiled form {strftime:?} is not a valid format"),
            });
        }

        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
        })
    }

    /// The pattern as written in the configuration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The equivalent chrono strftime format string.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Bind the pattern to the locale named by `tag`.
    pub fn with_locale(self, tag: &str) -> Result<DateFormatter, DateFormatError> {
        let (locale, locale_tag) = resolve_locale(tag)?;
        Ok(DateFormatter {
            pattern: self,
            locale,
            locale_tag,
        })
    }
}

/// A date pattern bound to a locale.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: DatePattern,
    locale: Locale,
    locale_tag: String,
}

impl DateFormatter {
    /// Compile `pattern` and bind it to the locale named by `locale_tag`.
    pub fn new(pattern: &str, locale_tag: &str) -> Result<Self, DateFormatError> {
        DatePattern::compile(pattern)?.with_locale(locale_tag)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.pattern()
    }

    pub fn strftime(&self) -> &str {
        self.pattern.strftime()
    }

    /// Normalized locale name, e.g. `en_US`.
    pub fn locale_tag(&self) -> &str {
        &self.locale_tag
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Render a timestamp with the bound pattern and locale.
    pub fn format<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        at.format_localized(self.strftime(), self.locale).to_string()
    }

    /// Render a calendar date; time fields render as midnight UTC.
    pub fn format_date(&self, date: NaiveDate) -> String {
        self.format(&date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Parse a calendar date written in the bound pattern.
    ///
    /// Name fields (`MMM`, `EEEE`) are matched against English names only.
    pub fn parse_date(&self, input: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(input, self.strftime())
    }

    /// Parse a date and time written in the bound pattern.
    pub fn parse_datetime(&self, input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(input, self.strftime())
    }
}

impl PartialEq for DateFormatter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.locale_tag == other.locale_tag
    }
}

impl Eq for DateFormatter {}

impl fmt::Display for DateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pattern(), self.locale_tag)
    }
}

/// Translate a Joda-style pattern into a strftime string.
fn translate(pattern: &str) -> Result<String, String> {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(q) = chars.next() {
                if q == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        out.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                push_literal(&mut out, q);
            }
            if !closed {
                return Err("unterminated quoted literal".to_string());
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            continue;
        }

        let mut count = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            count += 1;
        }
        let spec = field(c, count).ok_or_else(|| {
            if count == 1 {
                format!("unsupported pattern letter '{c}'")
            } else {
                format!("unsupported pattern field '{}'", c.to_string().repeat(count))
            }
        })?;
        out.push_str(spec);
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Strftime specifier for a run of `count` copies of pattern letter `letter`.
///
/// Fractions only come in the widths chrono can print, and `ZZZ` (a zone id)
/// has no strftime equivalent.
fn field(letter: char, count: usize) -> Option<&'static str> {
    let spec = match (letter, count) {
        ('y' | 'Y', 2) => "%y",
        ('y' | 'Y', _) => "%Y",
        ('x', 2) => "%g",
        ('x', _) => "%G",
        ('C', _) => "%C",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('w', 1) => "%-V",
        ('w', _) => "%V",
        ('D', 1) => "%-j",
        ('D', _) => "%j",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('e', _) => "%u",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        ('a', _) => "%p",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('Z', 1) => "%z",
        ('Z', 2) => "%:z",
        ('z', _) => "%Z",
        _ => return None,
    };
    Some(spec)
}

/// Default regions for bare language tags whose region differs from the
/// upper-cased language code.
const LANGUAGE_DEFAULTS: &[(&str, &str)] = &[
    ("ar", "ar_SA"),
    ("ca", "ca_ES"),
    ("cs", "cs_CZ"),
    ("da", "da_DK"),
    ("el", "el_GR"),
    ("en", "en_US"),
    ("et", "et_EE"),
    ("fa", "fa_IR"),
    ("he", "he_IL"),
    ("hi", "hi_IN"),
    ("ja", "ja_JP"),
    ("ko", "ko_KR"),
    ("nb", "nb_NO"),
    ("nn", "nn_NO"),
    ("sl", "sl_SI"),
    ("sv", "sv_SE"),
    ("uk", "uk_UA"),
    ("vi", "vi_VN"),
    ("zh", "zh_CN"),
];

/// Resolve a BCP-47 or POSIX style tag (`en-US`, `sv_SE`, `de`) to a chrono
/// locale, returning it together with its normalized name.
fn resolve_locale(tag: &str) -> Result<(Locale, String), DateFormatError> {
    let unknown = || DateFormatError::UnknownLocale {
        tag: tag.to_string(),
    };

    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(unknown());
    }

    let mut parts = trimmed.split(['-', '_']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_uppercase);
    if parts.next().is_some() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(unknown());
    }

    let candidates = match region {
        Some(region) => vec![format!("{language}_{region}")],
        None => {
            let mut names = Vec::new();
            if let Some((_, name)) = LANGUAGE_DEFAULTS.iter().find(|(l, _)| *l == language) {
                names.push((*name).to_string());
            }
            names.push(format!("{language}_{}", language.to_ascii_uppercase()));
            names.push(language.clone());
            names
        }
    };

    candidates
        .into_iter()
        .find_map(|name| {
            Locale::try_from(name.as_str())
                .ok()
                .map(|locale| (locale, name))
        })
        .ok_or_else(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_translate_iso_date() {
        assert_eq!(translate("yyyy-MM-dd").unwrap(), "%Y-%m-%d");
    }

    #[test]
    fn test_translate_names_and_time() {
        assert_eq!(
            translate("EEEE, d MMMM yyyy HH:mm:ss").unwrap(),
            "%A, %-d %B %Y %H:%M:%S"
        );
        assert_eq!(translate("EEE MMM dd hh:mm a").unwrap(), "%a %b %d %I:%M %p");
    }

    #[test]
    fn test_translate_quotes_and_percent() {
        assert_eq!(translate("yyyy-MM-dd'T'HH:mm").unwrap(), "%Y-%m-%dT%H:%M");
        assert_eq!(translate("HH 'o''clock'").unwrap(), "%H o'clock");
        assert_eq!(translate("''yy").unwrap(), "'%y");
        assert_eq!(translate("d'%'").unwrap(), "%-d%%");
        assert_eq!(translate("'at' 100%").unwrap(), "at 100%%");
    }

    #[test]
    fn test_translate_rejects_unknown_letter() {
        let err = translate("yyyy-QQ").unwrap_err();
        assert!(err.contains("'Q'"));
    }

    #[test]
    fn test_translate_fraction_widths() {
        assert_eq!(translate("HH:mm:ss.SSS").unwrap(), "%H:%M:%S.%3f");
        assert_eq!(translate("ss.SSSSSS").unwrap(), "%S.%6f");
        assert_eq!(translate("ss.SSSSSSSSS").unwrap(), "%S.%9f");

        for count in [1, 2, 4, 5, 7, 8, 10] {
            let pattern = format!("ss.{}", "S".repeat(count));
            let err = translate(&pattern).unwrap_err();
            assert!(err.contains(&"S".repeat(count)), "{pattern}: {err}");
        }
    }

    #[test]
    fn test_translate_zone_fields() {
        assert_eq!(translate("HH:mm Z").unwrap(), "%H:%M %z");
        assert_eq!(translate("HH:mm ZZ").unwrap(), "%H:%M %:z");
        assert!(translate("HH:mm ZZZ").is_err());
        assert!(translate("HH:mm ZZZZ").is_err());
    }

    #[test]
    fn test_translate_rejects_unterminated_quote() {
        assert!(translate("yyyy 'at").is_err());
    }

    #[test]
    fn test_compile_reports_pattern() {
        let err = DatePattern::compile("yyyy-bb").unwrap_err();
        assert!(matches!(
            err,
            DateFormatError::InvalidPattern { ref pattern, .. } if pattern == "yyyy-bb"
        ));
    }

    #[test]
    fn test_resolve_locale_variants() {
        assert_eq!(resolve_locale("en-US").unwrap().1, "en_US");
        assert_eq!(resolve_locale("sv_SE").unwrap().1, "sv_SE");
        assert_eq!(resolve_locale("EN-us").unwrap().1, "en_US");
        assert_eq!(resolve_locale("de").unwrap().1, "de_DE");
        assert_eq!(resolve_locale("sv").unwrap().1, "sv_SE");
        assert_eq!(resolve_locale("en").unwrap().1, "en_US");
    }

    #[test]
    fn test_resolve_locale_rejects_garbage() {
        for tag in ["", "  ", "xx-INVALID", "en-US-extra", "1234", "zz"] {
            assert_eq!(
                resolve_locale(tag).unwrap_err(),
                DateFormatError::UnknownLocale {
                    tag: tag.to_string()
                },
                "tag {tag:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_and_parse_iso_date() {
        let formatter = DateFormatter::new("yyyy-MM-dd", "en-US").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(formatter.format_date(date), "2024-03-05");
        assert_eq!(formatter.parse_date("2024-03-05").unwrap(), date);
        assert!(formatter.parse_date("05/03/2024").is_err());
    }

    #[test]
    fn test_format_uses_locale_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let english = DateFormatter::new("EEEE d MMMM yyyy", "en-US").unwrap();
        assert_eq!(english.format_date(date), "Tuesday 5 March 2024");

        let french = DateFormatter::new("EEEE d MMMM yyyy", "fr-FR").unwrap();
        assert_eq!(french.format_date(date), "mardi 5 mars 2024");
    }

    #[test]
    fn test_format_datetime_with_offset() {
        let formatter = DateFormatter::new("yyyy-MM-dd HH:mm ZZ", "en-GB").unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(formatter.format(&at), "2024-03-05 14:07 +02:00");

        let utc = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        let parsed = formatter
            .parse_datetime("2024-03-05 09:30 +00:00")
            .unwrap();
        assert_eq!(parsed, utc.naive_utc());
    }

    #[test]
    fn test_equality_ignores_tag_spelling() {
        let a = DateFormatter::new("yyyy-MM-dd", "en-US").unwrap();
        let b = DateFormatter::new("yyyy-MM-dd", "en_us").unwrap();
        let c = DateFormatter::new("yyyy-MM-dd", "en-GB").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
