use sheetfill_common::LiteralValue;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellData {
    pub value: Option<LiteralValue>,
    pub formula: Option<String>,
}

impl CellData {
    pub fn from_value<V: IntoLiteral>(value: V) -> Self {
        Self {
            value: Some(value.into_literal()),
            formula: None,
        }
    }
}

/// Local conversion trait so tests and callers can pass primitives directly
pub trait IntoLiteral {
    fn into_literal(self) -> LiteralValue;
}

impl IntoLiteral for LiteralValue {
    fn into_literal(self) -> LiteralValue {
        self
    }
}

impl IntoLiteral for i64 {
    fn into_literal(self) -> LiteralValue {
        LiteralValue::Int(self)
    }
}

impl IntoLiteral for String {
    fn into_literal(self) -> LiteralValue {
        LiteralValue::Text(self)
    }
}

impl<'a> IntoLiteral for &'a str {
    fn into_literal(self) -> LiteralValue {
        LiteralValue::Text(self.to_string())
    }
}

/// Read side of a loaded workbook. Rows and columns are 1-based.
pub trait SpreadsheetReader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn read_cell(&self, sheet: &str, row: u32, col: u32) -> Result<Option<CellData>, Self::Error>;
}

/// Write side of a loaded workbook. Writers only ever touch existing sheets.
pub trait SpreadsheetWriter: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        data: CellData,
    ) -> Result<(), Self::Error>;

    /// Serialize the whole workbook into the backend's container format.
    fn save_to_bytes(&mut self) -> Result<Vec<u8>, Self::Error>;
}

pub trait SpreadsheetIO: SpreadsheetReader + SpreadsheetWriter {}

impl<T> SpreadsheetIO for T where T: SpreadsheetReader + SpreadsheetWriter {}
