use crate::config::FillConfig;
use crate::error::FillError;
use sheetfill_workbook::SpreadsheetWriter;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serialized workbook plus the metadata a transport needs to return it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilledDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl FilledDocument {
    pub fn assemble<B: SpreadsheetWriter>(
        backend: &mut B,
        config: &FillConfig,
    ) -> Result<Self, FillError> {
        let bytes = backend.save_to_bytes().map_err(|e| FillError::Serialize {
            message: e.to_string(),
        })?;
        Ok(Self {
            bytes,
            content_type: XLSX_CONTENT_TYPE,
            filename: config.output_filename.clone(),
        })
    }

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        let name: String = self
            .filename
            .chars()
            .map(|c| if c == '"' || c.is_control() { '_' } else { c })
            .collect();
        format!("attachment; filename=\"{name}\"")
    }
}
