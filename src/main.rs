//! jira-trigger-config CLI entry point.

use clap::Parser;

use jira_trigger_config::cli::{commands, handle_error, Cli, Commands};
use jira_trigger_config::infrastructure::logging::LoggerImpl;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = LoggerImpl::init(&cli.log_config()) {
        handle_error(err, cli.json);
    }

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
