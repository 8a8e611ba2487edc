//! Output artifacts: the processed workbook and its JSON rendering.

mod writer;

pub use writer::{
    processed_file_name, to_json, write_json, WorkbookWriter, PROCESSED_SUFFIX, XLSX_MIME,
};
