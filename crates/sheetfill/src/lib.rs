//! Fill xlsx templates from a JSON cell map.
//!
//! A request is a set of named parts: a template workbook plus a JSON payload
//! naming fixed cells and a list of repeating position rows. The pipeline
//! resolves the parts, builds a [`FillPlan`], applies it to the workbook and
//! hands back the serialized result.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod plan;
pub mod response;

pub use config::{ColumnMap, FillConfig, StartRowOutOfRange};
pub use engine::{CellFillEngine, FillReport, SheetSelection};
pub use error::{ErrorBody, FillError, StatusClass};
pub use input::{
    FormParts, PAYLOAD_LOOKUP, PartBody, PartKind, PartLookup, PayloadSource, ResolvedInput,
    TEMPLATE_LOOKUP, parse_payload, resolve_input,
};
pub use plan::{Assignment, FillPlan};
pub use response::{FilledDocument, XLSX_CONTENT_TYPE};

pub use sheetfill_common::{CellAddress, LiteralValue, ROW_MAX};
pub use sheetfill_workbook::{SpreadsheetIO, SpreadsheetReader, SpreadsheetWriter};

#[cfg(feature = "umya")]
pub use sheetfill_workbook::UmyaAdapter;

/// Result of a successful fill.
#[derive(Clone, Debug, PartialEq)]
pub struct FillOutcome {
    pub document: FilledDocument,
    pub report: FillReport,
    pub plan: FillPlan,
}

/// Run the whole pipeline against backend `B`.
pub fn fill_template_with<B: SpreadsheetIO>(
    parts: FormParts,
    config: &FillConfig,
) -> Result<FillOutcome, FillError> {
    let _span = tracing::info_span!("fill_template", parts = parts.len()).entered();

    let input = resolve_input(parts, config)?;
    let payload = parse_payload(&input.payload)?;
    let plan = FillPlan::build(&payload, config)?;

    let mut backend = B::open_bytes(input.template).map_err(|e| FillError::CorruptDocument {
        message: e.to_string(),
    })?;
    let report = CellFillEngine::new(&mut backend).apply(&plan)?;
    let document = FilledDocument::assemble(&mut backend, config)?;

    tracing::info!(
        sheet = report.sheet.as_str(),
        cells = report.cells_written,
        positions = report.positions,
        bytes = document.bytes.len(),
        "template filled"
    );

    Ok(FillOutcome {
        document,
        report,
        plan,
    })
}

/// Run the whole pipeline with the xlsx backend.
#[cfg(feature = "umya")]
pub fn fill_template(parts: FormParts, config: &FillConfig) -> Result<FillOutcome, FillError> {
    fill_template_with::<UmyaAdapter>(parts, config)
}
