use crate::error::FillError;
use crate::plan::{Assignment, FillPlan};
use serde::Serialize;
use sheetfill_workbook::{CellData, IoError, SpreadsheetIO, with_cell_context};

/// Sheet a plan is applied to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetSelection {
    pub name: String,
    /// True when the requested sheet was missing and the first sheet was used.
    pub fallback: bool,
}

/// Summary of one applied plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub sheet: String,
    pub fallback: bool,
    pub cells_written: usize,
    pub fixed_cells: usize,
    pub positions: usize,
}

/// Applies fill plans to a loaded workbook.
///
/// The engine borrows the backend for the duration of the fill and only sets
/// cell values; whatever else the template carries stays untouched.
pub struct CellFillEngine<'a, B> {
    backend: &'a mut B,
}

impl<'a, B: SpreadsheetIO> CellFillEngine<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    /// Resolve the target sheet: the requested one if it exists, else the first.
    pub fn select_sheet(&self, requested: Option<&str>) -> Result<SheetSelection, FillError> {
        let names = self
            .backend
            .sheet_names()
            .map_err(|e| IoError::from_backend("workbook", e))?;

        if let Some(wanted) = requested {
            if names.iter().any(|n| n == wanted) {
                return Ok(SheetSelection {
                    name: wanted.to_string(),
                    fallback: false,
                });
            }
        }

        let Some(first) = names.first() else {
            return Err(FillError::WorksheetNotFound {
                requested: requested.map(str::to_string),
                available: names,
            });
        };
        if let Some(wanted) = requested {
            tracing::warn!(
                requested = wanted,
                using = first.as_str(),
                "sheet not found, falling back to first sheet"
            );
        }
        Ok(SheetSelection {
            name: first.clone(),
            fallback: requested.is_some(),
        })
    }

    /// Write every assignment of `plan` in order. Later writes to the same
    /// cell replace earlier ones.
    pub fn apply(&mut self, plan: &FillPlan) -> Result<FillReport, FillError> {
        let _span = tracing::debug_span!("apply_fill_plan", assignments = plan.len()).entered();

        let selection = self.select_sheet(plan.sheet.as_deref())?;
        let sheet = selection.name.as_str();

        let mut fixed_cells = 0;
        for assignment in &plan.assignments {
            if matches!(assignment, Assignment::Fixed { .. }) {
                fixed_cells += 1;
            }
            let address = assignment.address();
            let data = CellData::from_value(assignment.value().clone());
            self.backend
                .write_cell(sheet, address.row(), address.col(), data)
                .map_err(|e| with_cell_context(e, sheet, address.row(), address.col()))?;
        }

        tracing::debug!(
            sheet,
            cells = plan.len(),
            fixed_cells,
            positions = plan.positions,
            "fill plan applied"
        );

        Ok(FillReport {
            sheet: selection.name.clone(),
            fallback: selection.fallback,
            cells_written: plan.len(),
            fixed_cells,
            positions: plan.positions,
        })
    }
}
