use sheetfill_common::column_to_letters;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("{backend} backend: {message}")]
    Backend { backend: String, message: String },

    #[error("{sheet}!{cell}: {message}")]
    Cell {
        sheet: String,
        cell: String,
        message: String,
    },
}

impl IoError {
    pub fn from_backend<E: std::error::Error>(backend: &str, err: E) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

/// Attach a sheet/cell location to a backend failure.
pub fn with_cell_context<E: std::error::Error>(err: E, sheet: &str, row: u32, col: u32) -> IoError {
    IoError::Cell {
        sheet: sheet.to_string(),
        cell: format!("{}{}", column_to_letters(col), row),
        message: err.to_string(),
    }
}
