//! Implementation of the `jira-trigger-config check` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{add_detail_row, detail_table, or_dash, output, CommandOutput};
use crate::domain::models::MessageConfiguration;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file to validate (.yaml, .yml or .toml)
    pub config: PathBuf,

    /// Ignore JIRA_TRIGGER_* environment overrides
    #[arg(long)]
    pub no_env: bool,

    /// Timestamp (RFC 3339) rendered through the configured date format
    #[arg(long, value_parser = parse_sample)]
    pub sample: Option<DateTime<FixedOffset>>,
}

fn parse_sample(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub config_path: PathBuf,
    pub username: Option<String>,
    pub use_real_names: bool,
    pub icon_url: Option<String>,
    pub date_pattern: String,
    pub date_locale: String,
    pub sample_date: String,
    pub priority_colors: bool,
    pub default_color: String,
    pub fields: Vec<String>,
    pub whitelisted_jira_key_prefixes: Vec<char>,
    pub whitelisted_jira_key_suffixes: Vec<char>,
    pub max_text_length: i32,
}

impl CheckOutput {
    pub fn new(
        config_path: PathBuf,
        config: &MessageConfiguration,
        sample: &DateTime<FixedOffset>,
    ) -> Self {
        let formatter = config.date_formatter();
        Self {
            config_path,
            username: config.username().map(ToString::to_string),
            use_real_names: config.use_real_names(),
            icon_url: config.icon_url().map(ToString::to_string),
            date_pattern: formatter.pattern().to_string(),
            date_locale: formatter.locale_tag().to_string(),
            sample_date: formatter.format(sample),
            priority_colors: config.priority_colors(),
            default_color: config.default_color().to_string(),
            fields: config.fields().to_vec(),
            whitelisted_jira_key_prefixes: sorted(config.whitelisted_jira_key_prefixes()),
            whitelisted_jira_key_suffixes: sorted(config.whitelisted_jira_key_suffixes()),
            max_text_length: config.max_text_length(),
        }
    }
}

fn sorted<'a>(chars: impl IntoIterator<Item = &'a char>) -> Vec<char> {
    let mut chars: Vec<char> = chars.into_iter().copied().collect();
    chars.sort_unstable();
    chars
}

fn char_list(chars: &[char]) -> String {
    if chars.is_empty() {
        return "-".to_string();
    }
    chars.iter().map(|c| format!("{c:?}")).collect::<Vec<_>>().join(" ")
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let mut table = detail_table("setting", "value");
        add_detail_row(&mut table, "username", or_dash(self.username.as_deref()));
        add_detail_row(&mut table, "use_real_names", self.use_real_names.to_string());
        add_detail_row(&mut table, "icon_url", or_dash(self.icon_url.as_deref()));
        add_detail_row(&mut table, "date_pattern", self.date_pattern.as_str());
        add_detail_row(&mut table, "date_locale", self.date_locale.as_str());
        add_detail_row(&mut table, "sample_date", self.sample_date.as_str());
        add_detail_row(&mut table, "priority_colors", self.priority_colors.to_string());
        add_detail_row(&mut table, "default_color", self.default_color.as_str());
        add_detail_row(
            &mut table,
            "fields",
            if self.fields.is_empty() { "-".to_string() } else { self.fields.join(", ") },
        );
        add_detail_row(&mut table, "key_prefixes", char_list(&self.whitelisted_jira_key_prefixes));
        add_detail_row(&mut table, "key_suffixes", char_list(&self.whitelisted_jira_key_suffixes));
        add_detail_row(&mut table, "max_text_length", self.max_text_length.to_string());

        format!(
            "Message configuration in {} is valid.\n\n{}",
            self.config_path.display(),
            table
        )
    }
}

pub fn execute(args: CheckArgs, json_mode: bool) -> Result<()> {
    let config = if args.no_env {
        ConfigLoader::load_from_file(&args.config)?
    } else {
        ConfigLoader::load_message_config(&args.config)?
    };

    let sample = args.sample.unwrap_or_else(|| Utc::now().fixed_offset());
    let output_data = CheckOutput::new(args.config, &config, &sample);
    output(&output_data, json_mode);
    Ok(())
}
