use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use sheetfill_common::A1ParseError;
use sheetfill_workbook::IoError;

/// Characters of raw payload echoed back when it fails to parse.
pub const PAYLOAD_EXCERPT_CHARS: usize = 300;

/// Everything that can stop a fill. Each variant aborts the remaining stages.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("missing template part (expected binary `template` or `file`)")]
    MissingTemplate { received: Vec<String> },

    #[error("missing payload part (expected text or binary `payload`)")]
    MissingPayload { received: Vec<String> },

    #[error("part `{field}` is {size} bytes, limit is {limit}")]
    UploadTooLarge {
        field: String,
        size: usize,
        limit: usize,
    },

    #[error("payload is not valid JSON: {message}")]
    InvalidPayloadJson { message: String, excerpt: String },

    #[error("payload must be a JSON object, found {found}")]
    PayloadNotObject { found: &'static str },

    #[error("template could not be read as a spreadsheet: {message}")]
    CorruptDocument { message: String },

    #[error("workbook has no worksheets")]
    WorksheetNotFound {
        requested: Option<String>,
        available: Vec<String>,
    },

    #[error("invalid cell reference `{address}` at {origin}: {source}")]
    InvalidCellAddress {
        address: String,
        origin: String,
        #[source]
        source: A1ParseError,
    },

    #[error("writing to the workbook failed: {0}")]
    Write(#[from] IoError),

    #[error("serializing the filled workbook failed: {message}")]
    Serialize { message: String },
}

/// HTTP-style status class for the transport layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StatusClass {
    BadRequest,
    PayloadTooLarge,
    Internal,
}

impl StatusClass {
    pub fn code(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::PayloadTooLarge => 413,
            StatusClass::Internal => 500,
        }
    }
}

/// JSON error body handed back to callers: `{ "error": ..., "details": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "JsonValue::is_null")]
    pub details: JsonValue,
}

impl FillError {
    pub fn status(&self) -> StatusClass {
        match self {
            FillError::MissingTemplate { .. }
            | FillError::MissingPayload { .. }
            | FillError::InvalidPayloadJson { .. }
            | FillError::PayloadNotObject { .. }
            | FillError::CorruptDocument { .. }
            | FillError::WorksheetNotFound { .. } => StatusClass::BadRequest,
            FillError::UploadTooLarge { .. } => StatusClass::PayloadTooLarge,
            FillError::InvalidCellAddress { .. }
            | FillError::Write(_)
            | FillError::Serialize { .. } => StatusClass::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status().code()
    }

    pub fn is_caller_error(&self) -> bool {
        self.status() != StatusClass::Internal
    }

    pub(crate) fn invalid_address(
        address: impl Into<String>,
        origin: impl Into<String>,
        source: A1ParseError,
    ) -> Self {
        FillError::InvalidCellAddress {
            address: address.into(),
            origin: origin.into(),
            source,
        }
    }

    pub(crate) fn invalid_json(err: &serde_json::Error, raw: &str) -> Self {
        FillError::InvalidPayloadJson {
            message: err.to_string(),
            excerpt: raw.chars().take(PAYLOAD_EXCERPT_CHARS).collect(),
        }
    }

    /// Diagnostics body. Caller errors describe what was expected and what was
    /// found; internal errors only carry a message.
    pub fn to_body(&self) -> ErrorBody {
        let details = match self {
            FillError::MissingTemplate { received } => json!({
                "expected": ["template", "file"],
                "received": received,
            }),
            FillError::MissingPayload { received } => json!({
                "expected": ["payload"],
                "received": received,
            }),
            FillError::UploadTooLarge { field, size, limit } => json!({
                "field": field,
                "size": size,
                "limit": limit,
            }),
            FillError::InvalidPayloadJson { message, excerpt } => json!({
                "message": message,
                "payload_excerpt": excerpt,
            }),
            FillError::PayloadNotObject { found } => json!({ "found": found }),
            FillError::CorruptDocument { message } => json!({ "message": message }),
            FillError::WorksheetNotFound {
                requested,
                available,
            } => json!({
                "requested": requested,
                "available": available,
            }),
            FillError::InvalidCellAddress { .. }
            | FillError::Write(_)
            | FillError::Serialize { .. } => JsonValue::String(self.to_string()),
        };
        let error = match self.status() {
            StatusClass::Internal => "Server error".to_string(),
            _ => self.to_string(),
        };
        ErrorBody { error, details }
    }
}
