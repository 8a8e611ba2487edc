//! Main Cleaner struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput, ProgressReporter};

/// Configuration for reading and processing a contact file.
#[derive(Debug, Clone, Default)]
pub struct CleanerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Pipeline configuration.
    pub pipeline: PipelineConfig,
}

impl CleanerConfig {
    /// Read a specific worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.parser.sheet = Some(sheet.into());
        self
    }

    /// Add the combined `Translated_Contacts` column to the annotated table.
    pub fn with_translated_column(mut self, enabled: bool) -> Self {
        self.pipeline.translated_column = enabled;
        self
    }

    /// Set how many rows are classified between progress callbacks.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.pipeline.batch_size = batch_size;
        self
    }
}

/// Result of processing one contact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The pipeline's tables and summary.
    pub output: PipelineOutput,
}

/// Reads contact files and runs them through the pipeline.
pub struct Cleaner {
    parser: Parser,
    pipeline: Pipeline,
}

impl Cleaner {
    /// Create a Cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a Cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            pipeline: Pipeline::with_config(config.pipeline),
        }
    }

    /// Report batch progress while rows are classified.
    pub fn with_progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.pipeline = self.pipeline.with_progress(reporter);
        self
    }

    /// Read a file without processing it, e.g. to preview its columns.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Read in-memory file contents without processing them.
    pub fn read_bytes(&self, file_name: &str, contents: &[u8]) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_bytes(file_name, contents)
    }

    /// Read a file and process the contacts in `column`.
    pub fn process(&self, path: impl AsRef<Path>, column: &str) -> Result<ProcessResult> {
        let (table, source) = self.parser.parse_file(path)?;
        self.process_table(table, source, column)
    }

    /// Process in-memory file contents, using `file_name` to pick the format.
    pub fn process_bytes(&self, file_name: &str, contents: &[u8], column: &str) -> Result<ProcessResult> {
        let (table, source) = self.parser.parse_bytes(file_name, contents)?;
        self.process_table(table, source, column)
    }

    /// Process an already parsed table.
    pub fn process_table(
        &self,
        table: DataTable,
        source: SourceMetadata,
        column: &str,
    ) -> Result<ProcessResult> {
        info!(file = %source.file, column, rows = table.row_count(), "processing contacts");
        let output = self.pipeline.run(&table, column)?;
        Ok(ProcessResult { source, output })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
