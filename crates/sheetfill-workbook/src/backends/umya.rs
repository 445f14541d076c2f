#![cfg(feature = "umya")]

use crate::traits::{CellData, SpreadsheetReader, SpreadsheetWriter};
use sheetfill_common::LiteralValue;
use std::io::Cursor;
use umya_spreadsheet::{CellRawValue, CellValue, Spreadsheet, XlsxError, reader::xlsx};

/// xlsx backend over a fully deserialized `umya_spreadsheet::Spreadsheet`.
///
/// The adapter owns its workbook outright; a fill never shares one between
/// requests, so no interior locking is needed.
pub struct UmyaAdapter {
    workbook: Spreadsheet,
}

impl UmyaAdapter {
    /// Wrap an already built spreadsheet (fixtures, programmatic templates).
    pub fn from_spreadsheet(workbook: Spreadsheet) -> Self {
        Self { workbook }
    }

    fn convert_cell_value(cv: &CellValue) -> Option<LiteralValue> {
        let raw = cv.get_raw_value();
        if raw.is_empty() {
            return None;
        }
        if raw.is_error() {
            return Some(LiteralValue::Text(cv.get_value().to_string()));
        }
        match raw {
            CellRawValue::Numeric(n) => Some(LiteralValue::Number(*n)),
            CellRawValue::Bool(b) => Some(LiteralValue::Boolean(*b)),
            CellRawValue::String(s) => Some(LiteralValue::Text(s.to_string())),
            CellRawValue::RichText(rt) => Some(LiteralValue::Text(rt.get_text().to_string())),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    Some(LiteralValue::Number(n))
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    Some(LiteralValue::Boolean(true))
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    Some(LiteralValue::Boolean(false))
                } else {
                    Some(LiteralValue::Text(txt.to_string()))
                }
            }
            CellRawValue::Error(_) | CellRawValue::Empty => None,
        }
    }
}

impl SpreadsheetReader for UmyaAdapter {
    type Error = XlsxError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        let count = self.workbook.get_sheet_count();
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            if let Some(s) = self.workbook.get_sheet(&i) {
                names.push(s.get_name().to_string());
            }
        }
        Ok(names)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = data.len(), "umya: reading xlsx from memory");
        // Full read (not lazy) so every sheet is deserialized before save.
        let workbook = xlsx::read_reader(Cursor::new(data), true)?;
        Ok(Self { workbook })
    }

    fn read_cell(&self, sheet: &str, row: u32, col: u32) -> Result<Option<CellData>, Self::Error> {
        let ws = self
            .workbook
            .get_sheet_by_name(sheet)
            .ok_or_else(|| XlsxError::CellError(format!("sheet `{sheet}` not found")))?;
        // umya uses (col,row)
        let Some(cell) = ws.get_cell((col, row)) else {
            return Ok(None);
        };
        let cv = cell.get_cell_value();
        let formula = if cv.is_formula() {
            let f = cv.get_formula();
            if f.is_empty() {
                None
            } else if f.starts_with('=') {
                Some(f.to_string())
            } else {
                Some(format!("={f}"))
            }
        } else {
            None
        };
        let value = Self::convert_cell_value(cv);
        if value.is_none() && formula.is_none() {
            return Ok(None);
        }
        Ok(Some(CellData { value, formula }))
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    type Error = XlsxError;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error> {
        let ws = self
            .workbook
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| XlsxError::CellError(format!("sheet `{sheet}` not found")))?;
        // Existing cells keep their style; only the value/formula changes.
        let cell = ws.get_cell_mut((col, row));
        match data.value {
            Some(LiteralValue::Int(i)) => {
                cell.set_value_number(i as f64);
            }
            Some(LiteralValue::Number(n)) => {
                cell.set_value_number(n);
            }
            Some(LiteralValue::Boolean(b)) => {
                cell.set_value_bool(b);
            }
            Some(LiteralValue::Text(s)) => {
                cell.set_value_string(s);
            }
            Some(LiteralValue::Empty) | None => {
                cell.set_blank();
            }
        }
        if let Some(f) = data.formula {
            // umya stores formula without leading '='
            cell.set_formula(f.strip_prefix('=').unwrap_or(&f));
        }
        Ok(())
    }

    fn save_to_bytes(&mut self) -> Result<Vec<u8>, Self::Error> {
        let count = self.workbook.get_sheet_count();
        for i in 0..count {
            self.workbook.read_sheet(i);
        }
        let mut buf = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&self.workbook, &mut buf)?;
        Ok(buf.into_inner())
    }
}
