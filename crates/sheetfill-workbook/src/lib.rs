pub mod backends;
pub mod error;
pub mod traits;

#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
pub use error::{IoError, with_cell_context};
pub use traits::{CellData, IntoLiteral, SpreadsheetIO, SpreadsheetReader, SpreadsheetWriter};

// Re-export for convenience
pub use sheetfill_common::{CellAddress, LiteralValue};
