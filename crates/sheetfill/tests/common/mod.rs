#![allow(dead_code)]
// Workbook fixtures for the fill pipeline tests.

use sheetfill::{CellAddress, LiteralValue, SpreadsheetReader, UmyaAdapter};
use std::io::Cursor;
use umya_spreadsheet::Spreadsheet;

/// Build a workbook whose first sheet is renamed to `first`, let the caller
/// populate it, and return its xlsx bytes.
pub fn build_template(first: &str, f: impl FnOnce(&mut Spreadsheet)) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0).expect("default sheet").set_name(first);
    f(&mut book);
    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf).expect("write xlsx");
    buf.into_inner()
}

/// Offer layout: header block, a templated position row with a formula in G15,
/// and a note outside the position columns.
pub fn offer_template() -> Vec<u8> {
    build_template("Tabelle1", |book| {
        let sh = book.get_sheet_by_name_mut("Tabelle1").expect("Tabelle1");
        sh.get_cell_mut("A1").set_value_string("Angebot");
        sh.get_cell_mut("B5").set_value_string("Kunde");
        sh.get_cell_mut("C15").set_value_string("template desc");
        sh.get_cell_mut("E15").set_value_string("template dim");
        sh.get_cell_mut("G15").set_formula("D15*2");
        sh.get_cell_mut("H3").set_value_number(42);
    })
}

pub fn open(bytes: Vec<u8>) -> UmyaAdapter {
    UmyaAdapter::open_bytes(bytes).expect("filled workbook opens")
}

/// Value at `a1`, with blank text folded into `None`.
pub fn value(book: &UmyaAdapter, sheet: &str, a1: &str) -> Option<LiteralValue> {
    let addr = CellAddress::parse_a1(a1).expect("fixture address");
    book.read_cell(sheet, addr.row(), addr.col())
        .expect("read cell")
        .and_then(|c| c.value)
        .filter(|v| !matches!(v, LiteralValue::Empty) && v.as_text() != Some(""))
}

pub fn formula(book: &UmyaAdapter, sheet: &str, a1: &str) -> Option<String> {
    let addr = CellAddress::parse_a1(a1).expect("fixture address");
    book.read_cell(sheet, addr.row(), addr.col())
        .expect("read cell")
        .and_then(|c| c.formula)
}

pub fn text(s: &str) -> Option<LiteralValue> {
    Some(LiteralValue::Text(s.to_string()))
}

pub fn number(n: f64) -> Option<LiteralValue> {
    Some(LiteralValue::Number(n))
}
