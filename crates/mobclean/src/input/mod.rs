//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{InputFormat, Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
