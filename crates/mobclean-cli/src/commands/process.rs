//! Process command - clean the contact column of one or more files.

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use mobclean::output::write_json;
use mobclean::{processed_file_name, Cleaner, CleanerConfig, ProcessSummary, WorkbookWriter};

use crate::cli::OutputFormat;

const BAR_WIDTH: usize = 30;

pub fn run(
    files: Vec<PathBuf>,
    column: String,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: CleanerConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && files.len() > 1 {
        return Err("--output can only be used with a single input file".into());
    }

    let batch_size = config.pipeline.batch_size;
    let mut failed = 0;

    for file in &files {
        println!(
            "{} {}",
            "Processing".cyan().bold(),
            file.display().to_string().white()
        );

        let target = output
            .clone()
            .unwrap_or_else(|| default_output_path(file, format));

        match process_file(file, &column, &target, format, config.clone(), verbose) {
            Ok(summary) => {
                print_summary(&summary, batch_size);
                println!(
                    "{} {}",
                    "Saved to".green().bold(),
                    target.display().to_string().white()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!(
                    "{} {}: {}",
                    "Failed:".red().bold(),
                    file.display(),
                    e
                );
            }
        }
        println!();
    }

    if failed > 0 {
        return Err(format!("{} of {} file(s) failed", failed, files.len()).into());
    }

    Ok(())
}

fn process_file(
    file: &Path,
    column: &str,
    target: &Path,
    format: OutputFormat,
    config: CleanerConfig,
    verbose: bool,
) -> Result<ProcessSummary, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut cleaner = Cleaner::with_config(config);
    // Debug logging already reports each batch in verbose mode.
    if !verbose {
        cleaner = cleaner.with_progress(draw_progress);
    }

    let result = cleaner.process(file, column)?;

    match format {
        OutputFormat::Xlsx => WorkbookWriter::new().write(&result.output, target)?,
        OutputFormat::Json => write_json(&result.output, target)?,
    }

    Ok(result.output.summary)
}

/// `<stem>_processed.<ext>` in the input's directory.
fn default_output_path(file: &Path, format: OutputFormat) -> PathBuf {
    let name = file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.with_file_name(processed_file_name(&name, format.extension()))
}

fn draw_progress(processed: usize, total: usize) {
    if total == 0 {
        return;
    }
    let filled = processed * BAR_WIDTH / total;
    let bar: String = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);

    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r  {} {}/{} rows", bar.cyan(), processed, total);
    if processed >= total {
        let _ = writeln!(stderr);
    }
    let _ = stderr.flush();
}

fn print_summary(summary: &ProcessSummary, batch_size: usize) {
    println!(
        "  Rows: {} (batches of {})",
        summary.total_rows.to_string().white().bold(),
        batch_size.max(1)
    );
    println!(
        "  {} rows with a valid number ({} numbers)",
        summary.rows_with_valid.to_string().green().bold(),
        summary.valid_numbers
    );
    println!(
        "  {} rows with invalid numbers only ({} numbers)",
        summary.rows_invalid_only.to_string().yellow().bold(),
        summary.invalid_numbers
    );
    if summary.rows_without_contacts > 0 {
        println!(
            "  {} rows without contacts",
            summary.rows_without_contacts.to_string().dimmed()
        );
    }
}
