//! Payload → canonical fill plan.
//!
//! The payload is loosely shaped JSON. [`FillPlan::build`] resolves every
//! default, coercion and address once, so the engine only ever sees a flat,
//! ordered list of validated [`Assignment`]s.

use crate::config::{ColumnMap, FillConfig};
use crate::error::FillError;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use sheetfill_common::{CellAddress, LiteralValue, ROW_MAX, parse_column};

/// A single cell write.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    /// Entry of the payload's `cells` map.
    Fixed {
        address: CellAddress,
        value: LiteralValue,
    },
    /// One mapped field of a logical position record.
    Position {
        index: usize,
        field: String,
        address: CellAddress,
        value: LiteralValue,
    },
    /// One column of a `{row, values}` position entry.
    ExplicitRow {
        index: usize,
        address: CellAddress,
        value: LiteralValue,
    },
}

impl Assignment {
    pub fn address(&self) -> CellAddress {
        match self {
            Assignment::Fixed { address, .. }
            | Assignment::Position { address, .. }
            | Assignment::ExplicitRow { address, .. } => *address,
        }
    }

    pub fn value(&self) -> &LiteralValue {
        match self {
            Assignment::Fixed { value, .. }
            | Assignment::Position { value, .. }
            | Assignment::ExplicitRow { value, .. } => value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillPlan {
    /// Requested sheet; `None` targets the first sheet.
    pub sheet: Option<String>,
    pub start_row: u32,
    pub columns: ColumnMap,
    /// Number of entries in the payload's `positions` list.
    pub positions: usize,
    /// Fixed cells first, then positions in list order. Applied in order.
    pub assignments: Vec<Assignment>,
}

/// How one `positions` entry is read.
enum PositionEntry<'a> {
    Logical(Option<&'a Map<String, JsonValue>>),
    Explicit {
        row: &'a JsonValue,
        values: &'a Map<String, JsonValue>,
    },
}

impl<'a> PositionEntry<'a> {
    fn classify(entry: &'a JsonValue) -> Self {
        let Some(obj) = entry.as_object() else {
            return PositionEntry::Logical(None);
        };
        match (obj.get("row"), obj.get("values")) {
            (Some(row), Some(JsonValue::Object(values))) => PositionEntry::Explicit { row, values },
            _ => PositionEntry::Logical(Some(obj)),
        }
    }
}

impl FillPlan {
    /// Build the plan for a parsed payload object.
    ///
    /// Pure: nothing is read from or written to a workbook. Every address in
    /// the result has already been validated.
    pub fn build(payload: &JsonValue, config: &FillConfig) -> Result<Self, FillError> {
        let sheet = payload
            .get("sheetName")
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let start_row = match payload.get("positionStartRow") {
            None | Some(JsonValue::Null) => config.default_start_row(),
            Some(raw) => coerce_row(raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    default = config.default_start_row(),
                    "unusable positionStartRow, using default"
                );
                config.default_start_row()
            }),
        };

        let columns = match payload.get("columns") {
            Some(JsonValue::Object(map)) => column_map_from_json(map)?,
            _ => config.default_columns.clone(),
        };
        // Resolve column indices once; declaration order is kept.
        let mut bound = Vec::with_capacity(columns.len());
        for (field, letters) in columns.iter() {
            parse_column(letters).map_err(|e| {
                FillError::invalid_address(letters, format!("columns.{field}"), e)
            })?;
            bound.push((field, letters));
        }

        let mut assignments = Vec::new();

        if let Some(JsonValue::Object(cells)) = payload.get("cells") {
            for (raw, value) in cells {
                let address = CellAddress::parse_a1(raw)
                    .map_err(|e| FillError::invalid_address(raw, "cells", e))?;
                assignments.push(Assignment::Fixed {
                    address,
                    value: scalar_from_json(value),
                });
            }
        }

        let empty = Vec::new();
        let positions = match payload.get("positions") {
            Some(JsonValue::Array(items)) => items,
            _ => &empty,
        };

        for (index, entry) in positions.iter().enumerate() {
            match PositionEntry::classify(entry) {
                PositionEntry::Explicit { row, values } => {
                    let origin = format!("positions[{index}]");
                    let row_num = coerce_row(row).ok_or_else(|| {
                        FillError::invalid_address(
                            row.to_string(),
                            format!("{origin}.row"),
                            sheetfill_common::A1ParseError::MissingRow(row.to_string()),
                        )
                    })?;
                    for (letters, value) in values {
                        let address = CellAddress::from_column(letters, row_num).map_err(|e| {
                            FillError::invalid_address(letters, format!("{origin}.values"), e)
                        })?;
                        assignments.push(Assignment::ExplicitRow {
                            index,
                            address,
                            value: scalar_from_json(value),
                        });
                    }
                }
                PositionEntry::Logical(record) => {
                    let row = u32::try_from(index)
                        .ok()
                        .and_then(|i| start_row.checked_add(i))
                        .unwrap_or(u32::MAX);
                    for (field, letters) in &bound {
                        let address = CellAddress::from_column(letters, row).map_err(|e| {
                            FillError::invalid_address(
                                format!("{letters}{row}"),
                                format!("positions[{index}].{field}"),
                                e,
                            )
                        })?;
                        let raw = record.and_then(|r| r.get(*field)).filter(|v| !v.is_null());
                        let value = match raw {
                            Some(v) => scalar_from_json(v),
                            None if *field == "pos" => LiteralValue::Int(index as i64 + 1),
                            None => LiteralValue::blank_text(),
                        };
                        assignments.push(Assignment::Position {
                            index,
                            field: field.to_string(),
                            address,
                            value,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            sheet = sheet.as_deref().unwrap_or("<first>"),
            start_row,
            positions = positions.len(),
            assignments = assignments.len(),
            "built fill plan"
        );

        Ok(FillPlan {
            sheet,
            start_row,
            columns,
            positions: positions.len(),
            assignments,
        })
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn column_map_from_json(map: &Map<String, JsonValue>) -> Result<ColumnMap, FillError> {
    let mut columns = ColumnMap::new();
    for (field, letters) in map {
        let Some(letters) = letters.as_str() else {
            return Err(FillError::invalid_address(
                letters.to_string(),
                format!("columns.{field}"),
                sheetfill_common::A1ParseError::MissingColumn(letters.to_string()),
            ));
        };
        columns.insert(field.as_str(), letters);
    }
    Ok(columns)
}

/// Normalize one payload value into what gets written to a cell.
///
/// Null becomes empty text. Integers stay integral. Arrays and objects are
/// written as their compact JSON text.
pub fn scalar_from_json(value: &JsonValue) -> LiteralValue {
    match value {
        JsonValue::Null => LiteralValue::blank_text(),
        JsonValue::Bool(b) => LiteralValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => LiteralValue::Int(i),
            None => n
                .as_f64()
                .map(LiteralValue::Number)
                .unwrap_or_else(|| LiteralValue::Text(n.to_string())),
        },
        JsonValue::String(s) => LiteralValue::Text(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => LiteralValue::Text(value.to_string()),
    }
}

/// Accept a 1-based row given as a JSON number or a numeric string.
pub fn coerce_row(value: &JsonValue) -> Option<u32> {
    let n = match value {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n > ROW_MAX as f64 {
        return None;
    }
    Some(n as u32)
}
