//! Preview command - list a file's columns and first rows.

use std::path::PathBuf;

use colored::Colorize;
use mobclean::{Cleaner, CleanerConfig, DataTable, SourceMetadata};
use serde_json::json;

/// Widest a cell is printed before it is cut.
const MAX_CELL_WIDTH: usize = 24;

pub fn run(
    file: PathBuf,
    rows: usize,
    config: CleanerConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Cleaner::with_config(config).read(&file)?;
    let head = table.head(rows);

    if json {
        let report = json!({
            "file": source.file,
            "format": source.format,
            "sheet": source.sheet,
            "columns": table.headers,
            "preview": head.to_records(),
            "total_rows": table.row_count(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&source);
    println!("{}", "Columns:".yellow().bold());
    for (i, name) in table.headers.iter().enumerate() {
        println!("  {:>3}  {}", i, name);
    }
    println!();

    if head.row_count() == 0 {
        println!("{}", "No data rows.".dimmed());
        return Ok(());
    }

    println!(
        "{} (first {} of {})",
        "Rows:".yellow().bold(),
        head.row_count(),
        table.row_count()
    );
    print_rows(&head);

    Ok(())
}

fn print_header(source: &SourceMetadata) {
    println!(
        "{} {}",
        "Preview".cyan().bold(),
        source.file.white()
    );
    let sheet = source
        .sheet
        .as_deref()
        .map(|s| format!(", sheet '{}'", s))
        .unwrap_or_default();
    println!(
        "  {} rows, {} columns ({}{})",
        source.row_count, source.column_count, source.format, sheet
    );
    println!();
}

fn print_rows(table: &DataTable) {
    let widths: Vec<usize> = (0..table.column_count())
        .map(|col| {
            let header = table.headers[col].chars().count();
            table
                .column_values(col)
                .map(|v| v.map_or(0, |s| s.chars().count()))
                .fold(header, usize::max)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header: Vec<String> = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("  {}", header.join(" | ").bold());

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell.as_deref().unwrap_or(""), *w))
            .collect();
        println!("  {}", cells.join(" | "));
    }
}

fn pad(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count > width {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", value, " ".repeat(width - count))
    }
}
