//! Whole-table contact pipeline.

mod engine;
mod progress;
mod result;

pub use engine::{Pipeline, PipelineConfig, INVALID_COLUMN, TRANSLATED_COLUMN, VALID_COLUMN};
pub use progress::ProgressReporter;
pub use result::{
    PipelineOutput, ProcessSummary, INVALID_SHEET, ORIGINAL_SHEET, TRANSLATED_SHEET, VALID_SHEET,
};
