// Integration test for Umya backend; run with `--features umya`.
use crate::common::build_workbook_bytes;
use sheetfill_workbook::LiteralValue;
use sheetfill_workbook::{CellData, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};

#[test]
fn umya_open_bytes_write_and_save_to_bytes() {
    let bytes = build_workbook_bytes(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value_number(10); // A1
    });

    let mut adapter = UmyaAdapter::open_bytes(bytes).unwrap();
    adapter
        .write_cell("Sheet1", 5, 2, CellData::from_value("Max Mustermann"))
        .unwrap();
    let out = adapter.save_to_bytes().unwrap();
    assert!(out.len() > 100, "Expected non-trivial XLSX byte output");

    let reopened = UmyaAdapter::open_bytes(out).unwrap();
    assert_eq!(
        reopened
            .read_cell("Sheet1", 5, 2)
            .unwrap()
            .and_then(|c| c.value),
        Some(LiteralValue::Text("Max Mustermann".into()))
    );
    assert_eq!(
        reopened
            .read_cell("Sheet1", 1, 1)
            .unwrap()
            .and_then(|c| c.value),
        Some(LiteralValue::Number(10.0))
    );
}

#[test]
fn umya_save_keeps_formulas_in_untouched_cells() {
    let bytes = build_workbook_bytes(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((4, 15)).set_value_number(2); // D15
        sh.get_cell_mut((6, 15)).set_formula("D15*3"); // F15
    });

    let mut adapter = UmyaAdapter::open_bytes(bytes).unwrap();
    adapter
        .write_cell("Sheet1", 15, 4, CellData::from_value(4_i64))
        .unwrap();
    let out = adapter.save_to_bytes().unwrap();

    let reopened = UmyaAdapter::open_bytes(out).unwrap();
    assert_eq!(
        reopened
            .read_cell("Sheet1", 15, 6)
            .unwrap()
            .and_then(|c| c.formula),
        Some("=D15*3".to_string())
    );
    assert_eq!(
        reopened
            .read_cell("Sheet1", 15, 4)
            .unwrap()
            .and_then(|c| c.value),
        Some(LiteralValue::Number(4.0))
    );
}

#[test]
fn umya_open_bytes_returns_parse_error_for_invalid_payload() {
    let err = match UmyaAdapter::open_bytes(vec![0x01, 0x02, 0x03, 0x04]) {
        Ok(_) => panic!("expected parse failure"),
        Err(err) => err,
    };
    assert!(!err.to_string().is_empty());
}

#[test]
fn umya_saved_bytes_open_from_disk() {
    let bytes = build_workbook_bytes(|book| {
        book.get_sheet_by_name_mut("Sheet1")
            .unwrap()
            .set_name("Tabelle1");
    });
    let mut adapter = UmyaAdapter::open_bytes(bytes).unwrap();
    adapter
        .write_cell("Tabelle1", 15, 2, CellData::from_value("Spiegel"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filled.xlsx");
    std::fs::write(&path, adapter.save_to_bytes().unwrap()).unwrap();

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let sheet = book.get_sheet_by_name("Tabelle1").unwrap();
    assert_eq!(sheet.get_value("B15"), "Spiegel");
}
