pub mod date_formatter;
pub mod message_config;

pub use date_formatter::{DateFormatError, DateFormatter, DatePattern};
pub use message_config::{to_character_set, MessageConfiguration};
