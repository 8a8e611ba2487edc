//! mobclean CLI - contact spreadsheet cleaner.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use mobclean::CleanerConfig;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Process {
            files,
            column,
            output,
            format,
            sheet,
            translated_column,
            batch_size,
        } => {
            let mut config = CleanerConfig::default()
                .with_translated_column(translated_column)
                .with_batch_size(batch_size);
            if let Some(sheet) = sheet {
                config = config.with_sheet(sheet);
            }
            commands::process::run(files, column, output, format, config, cli.verbose)
        }

        Commands::Preview {
            file,
            rows,
            sheet,
            json,
        } => {
            let mut config = CleanerConfig::default();
            if let Some(sheet) = sheet {
                config = config.with_sheet(sheet);
            }
            commands::preview::run(file, rows, config, json)
        }

        Commands::Serve {
            port,
            no_open,
            max_upload_mb,
            max_uploads,
            translated_column,
        } => {
            let config = CleanerConfig::default().with_translated_column(translated_column);
            commands::serve::run(port, no_open, max_upload_mb, max_uploads, config, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
