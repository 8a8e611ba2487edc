//! Fuzz target for the file parser.
//!
//! Malformed CSV and workbook bytes must produce an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mobclean::Parser;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for name in ["contacts.csv", "contacts.tsv", "contacts.xlsx", "contacts.xls", "contacts.ods"] {
        if let Ok((table, _)) = parser.parse_bytes(name, data) {
            assert!(table.rows.iter().all(|row| row.len() == table.column_count()));
        }
    }
});
