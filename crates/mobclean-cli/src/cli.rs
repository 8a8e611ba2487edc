//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mobclean: clean and validate mobile numbers in contact spreadsheets
#[derive(Parser)]
#[command(name = "mobclean")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize and validate the contact column of one or more files
    Process {
        /// Spreadsheets to process (xlsx, xlsm, xlsb, xls, ods, csv, tsv)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Name of the column holding the phone numbers
        #[arg(short, long)]
        column: String,

        /// Output file, only with a single input
        /// (default: <file>_processed.<ext> next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        /// Worksheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Add a combined Translated_Contacts column
        #[arg(long)]
        translated_column: bool,

        /// Rows classified between progress updates
        #[arg(long, default_value = "100")]
        batch_size: usize,
    },

    /// Show the columns and first rows of a file
    Preview {
        /// Spreadsheet to preview
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,

        /// Worksheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web form for upload, preview, process and download
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8088")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        /// Largest accepted upload, in megabytes
        #[arg(long, default_value = "50")]
        max_upload_mb: usize,

        /// Uploads kept in memory; the oldest is dropped past this
        #[arg(long, default_value = "32")]
        max_uploads: usize,

        /// Add a combined Translated_Contacts column
        #[arg(long)]
        translated_column: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use xlsx or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_args() {
        let cli = Cli::try_parse_from([
            "mobclean", "process", "a.xlsx", "b.csv", "-c", "Mobile", "--format", "json", "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Process {
                files,
                column,
                format,
                batch_size,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(column, "Mobile");
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(batch_size, 100);
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_process_requires_column() {
        assert!(Cli::try_parse_from(["mobclean", "process", "a.xlsx"]).is_err());
    }

    #[test]
    fn test_parse_serve_upload_limits() {
        let cli = Cli::try_parse_from(["mobclean", "serve", "--no-open", "--max-uploads", "4"])
            .unwrap();
        match cli.command {
            Commands::Serve {
                max_uploads,
                max_upload_mb,
                ..
            } => {
                assert_eq!(max_uploads, 4);
                assert_eq!(max_upload_mb, 50);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
