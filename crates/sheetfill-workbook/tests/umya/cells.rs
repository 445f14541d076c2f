use crate::common::build_workbook_bytes;
use sheetfill_workbook::{CellData, LiteralValue, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};

#[test]
fn sheet_names_follow_workbook_order() {
    let bytes = build_workbook_bytes(|book| {
        book.get_sheet_by_name_mut("Sheet1").unwrap().set_name("Summary");
        book.new_sheet("Tabelle1").unwrap();
    });
    let adapter = UmyaAdapter::open_bytes(bytes).unwrap();
    assert_eq!(adapter.sheet_names().unwrap(), vec!["Summary", "Tabelle1"]);
}

#[test]
fn read_cell_reports_typed_values_and_blanks() {
    let mut book = umya_spreadsheet::new_file();
    let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
    sh.get_cell_mut("A1").set_value_string("text");
    sh.get_cell_mut("B1").set_value_number(1.5);
    sh.get_cell_mut("C1").set_value_bool(true);
    let adapter = UmyaAdapter::from_spreadsheet(book);

    let value = |col| adapter.read_cell("Sheet1", 1, col).unwrap().and_then(|c| c.value);
    assert_eq!(value(1), Some(LiteralValue::Text("text".into())));
    assert_eq!(value(2), Some(LiteralValue::Number(1.5)));
    assert_eq!(value(3), Some(LiteralValue::Boolean(true)));
    assert_eq!(adapter.read_cell("Sheet1", 9, 9).unwrap(), None);
}

#[test]
fn text_values_are_not_reinterpreted() {
    let mut adapter = UmyaAdapter::from_spreadsheet(umya_spreadsheet::new_file());
    adapter
        .write_cell("Sheet1", 1, 1, CellData::from_value("0042"))
        .unwrap();
    adapter
        .write_cell("Sheet1", 1, 2, CellData::from_value(""))
        .unwrap();
    assert_eq!(
        adapter.read_cell("Sheet1", 1, 1).unwrap().and_then(|c| c.value),
        Some(LiteralValue::Text("0042".into()))
    );
}

#[test]
fn writes_never_create_sheets() {
    let mut adapter = UmyaAdapter::from_spreadsheet(umya_spreadsheet::new_file());
    assert!(
        adapter
            .write_cell("Missing", 1, 1, CellData::from_value("x"))
            .is_err(),
        "unknown sheet must be rejected"
    );
    assert_eq!(adapter.sheet_names().unwrap(), vec!["Sheet1"]);
}
