//! Process-wide fill settings.
//!
//! A [`FillConfig`] is built once (defaults, a YAML file, CLI flags) and passed
//! by reference into every fill. Nothing here is read from ambient state.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use sheetfill_common::ROW_MAX;
use std::fmt;

/// Row that receives the first position record when the payload names none.
pub const DEFAULT_START_ROW: u32 = 15;
/// Largest accepted template or payload part (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
/// Filename suggested to the caller for the filled workbook.
pub const DEFAULT_OUTPUT_FILENAME: &str = "filled.xlsx";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillConfig {
    /// Field → column mapping used when a payload carries no `columns`.
    pub default_columns: ColumnMap,
    /// First row of the repeating block when `positionStartRow` is missing or unusable.
    #[serde(deserialize_with = "deserialize_start_row")]
    default_start_row: u32,
    /// Upper bound for any single resolved input part, in bytes.
    pub max_upload_bytes: usize,
    pub output_filename: String,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            default_columns: ColumnMap::default(),
            default_start_row: DEFAULT_START_ROW,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
        }
    }
}

impl FillConfig {
    /// Read a config from YAML. Missing keys fall back to the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn default_start_row(&self) -> u32 {
        self.default_start_row
    }

    /// Set the fallback start row. It must lie on the grid (`1..=ROW_MAX`).
    pub fn with_default_start_row(mut self, row: u32) -> Result<Self, StartRowOutOfRange> {
        self.default_start_row = check_start_row(row)?;
        Ok(self)
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = name.into();
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("start row {0} is outside 1..={max}", max = ROW_MAX)]
pub struct StartRowOutOfRange(pub u32);

fn check_start_row(row: u32) -> Result<u32, StartRowOutOfRange> {
    if row == 0 || row > ROW_MAX {
        return Err(StartRowOutOfRange(row));
    }
    Ok(row)
}

fn deserialize_start_row<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let row = u32::deserialize(deserializer)?;
    check_start_row(row).map_err(de::Error::custom)
}

/// Ordered mapping from a position-record field name to a column reference.
///
/// Declaration order is kept: it is the order in which a record's cells are
/// written, which matters when two fields share a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::from_pairs([
            ("pos", "A"),
            ("title", "B"),
            ("desc", "C"),
            ("qty", "D"),
            ("dim", "E"),
        ])
    }
}

impl ColumnMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<I, F, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut map = Self::new();
        for (field, column) in pairs {
            map.insert(field, column);
        }
        map
    }

    /// Insert or replace a field binding. A replaced field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, column: impl Into<String>) {
        let field = field.into();
        let column = column.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((field, column)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ColumnMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, column) in &self.entries {
            map.serialize_entry(field, column)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColumnMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnMapVisitor;

        impl<'de> Visitor<'de> for ColumnMapVisitor {
            type Value = ColumnMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to column letters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ColumnMap, A::Error> {
                let mut map = ColumnMap::new();
                while let Some((field, column)) = access.next_entry::<String, String>()? {
                    if sheetfill_common::parse_column(&column).is_err() {
                        return Err(de::Error::custom(format!(
                            "field `{field}` maps to invalid column `{column}`"
                        )));
                    }
                    map.insert(field, column);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ColumnMapVisitor)
    }
}
