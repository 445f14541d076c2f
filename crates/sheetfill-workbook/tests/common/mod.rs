#![allow(dead_code)]
// Shared test helpers (umya workbook builders, etc.)

use std::io::Cursor;
use umya_spreadsheet::Spreadsheet;

/// Build a one-sheet (`Sheet1`) workbook, let the caller populate it, and
/// return its xlsx bytes.
pub fn build_workbook_bytes(f: impl FnOnce(&mut Spreadsheet)) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    to_bytes(&book)
}

pub fn to_bytes(book: &Spreadsheet) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut buf).expect("write xlsx");
    buf.into_inner()
}
