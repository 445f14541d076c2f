use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn write_template(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    {
        let sh = book.get_sheet_mut(&0).unwrap();
        sh.set_name("Tabelle1");
        sh.get_cell_mut("A1").set_value_string("Angebot");
    }
    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf).unwrap();
    fs::write(path, buf.into_inner()).unwrap();
}

fn cell_text(path: &Path, a1: &str) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
    book.get_sheet_by_name("Tabelle1").unwrap().get_value(a1)
}

fn sheetfill() -> Command {
    Command::cargo_bin("sheetfill").unwrap()
}

#[test]
fn fill_writes_workbook_and_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("angebot.xlsx");
    let out = dir.path().join("out.xlsx");
    write_template(&template);

    sheetfill()
        .arg("fill")
        .arg("--template")
        .arg(&template)
        .arg("--payload-json")
        .arg(r#"{"cells":{"B5":"Max Mustermann"},"positions":[{"title":"Spiegel"}]}"#)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""sheet":"Tabelle1""#))
        .stdout(predicate::str::contains(r#""cells_written":6"#));

    assert_eq!(cell_text(&out, "B5"), "Max Mustermann");
    assert_eq!(cell_text(&out, "B15"), "Spiegel");
    assert_eq!(cell_text(&out, "A1"), "Angebot");
}

#[test]
fn fill_reads_payload_file_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("angebot.xlsx");
    let payload = dir.path().join("payload.json");
    let config = dir.path().join("sheetfill.yaml");
    let out = dir.path().join("out.xlsx");
    write_template(&template);
    fs::write(&payload, r#"{"positions":[{"title":"Lampe"}]}"#).unwrap();
    fs::write(&config, "default_start_row: 30\ndefault_columns:\n  title: C\n").unwrap();

    sheetfill()
        .args(["fill", "--template"])
        .arg(&template)
        .arg("--payload")
        .arg(&payload)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(cell_text(&out, "C30"), "Lampe");
    assert_eq!(cell_text(&out, "A30"), "");
}

#[test]
fn invalid_payload_exits_with_caller_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("angebot.xlsx");
    let out = dir.path().join("out.xlsx");
    write_template(&template);

    sheetfill()
        .arg("fill")
        .arg("--template")
        .arg(&template)
        .arg("--payload-json")
        .arg("{invalid")
        .arg("--out")
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("payload_excerpt"));

    assert!(!out.exists());
}

#[test]
fn bad_address_exits_with_internal_error() {
    sheetfill()
        .args(["plan", "--payload-json", r#"{"cells":{"ZZZZ1":1}}"#])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Server error"));
}

#[test]
fn plan_prints_assignments() {
    sheetfill()
        .args([
            "plan",
            "--payload-json",
            r#"{"sheetName":"Tabelle1","positionStartRow":"20","positions":[{}]}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""start_row": 20"#))
        .stdout(predicate::str::contains(r#""address": "A20""#))
        .stdout(predicate::str::contains(r#""kind": "position""#));
}

#[test]
fn payload_sources_are_exclusive() {
    sheetfill()
        .args(["plan", "--payload", "a.json", "--payload-json", "{}"])
        .assert()
        .failure();
    sheetfill().args(["plan"]).assert().failure();
}

#[test]
fn start_row_off_the_grid_is_rejected() {
    sheetfill()
        .args(["plan", "--start-row", "0", "--payload-json", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--start-row"));

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sheetfill.yaml");
    fs::write(&config, "default_start_row: 0\n").unwrap();
    sheetfill()
        .args(["plan", "--payload-json", "{}", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("start row 0 is outside"));
}
