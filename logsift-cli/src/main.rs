//! logsift CLI -- load Box and syslog device logs, merge them into one
//! timeline and search it from the command line.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use logsift_core::config::LogsiftConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config validate` reports load failures itself, so tracing starts
    // from defaults when the file cannot be loaded.
    let loaded = LogsiftConfig::load_or_default(&cli.config).await;

    let mut general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general)?;
    logsift_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "logsift starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
        Commands::View(args) => commands::view::execute(args, &loaded?, &writer).await,
        Commands::Classify(args) => commands::classify::execute(args, &loaded?, &writer).await,
    }
}
