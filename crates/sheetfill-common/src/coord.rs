//! A1-style cell coordinates with Excel grid limits.
//!
//! `CellAddress` stores Excel's 1-based row and column. `$` anchors are accepted
//! on input but not retained: a fill only ever targets one concrete cell, so
//! `$B$5` and `B5` address the same place.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Last addressable row (1-based), matching Excel's 1,048,576 rows.
pub const ROW_MAX: u32 = 1 << 20;
/// Last addressable column (1-based), matching Excel's 16,384 columns (`XFD`).
pub const COL_MAX: u32 = 1 << 14;

/// Errors returned when an A1 reference or one of its parts is malformed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum A1ParseError {
    Empty,
    MissingColumn(String),
    MissingRow(String),
    InvalidCharacter { input: String, found: char },
    RowOutOfRange { input: String, row: u64 },
    ColumnOutOfRange(String),
}

impl fmt::Display for A1ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A1ParseError::Empty => write!(f, "empty cell reference"),
            A1ParseError::MissingColumn(input) => {
                write!(f, "cell reference `{input}` has no column letters")
            }
            A1ParseError::MissingRow(input) => {
                write!(f, "cell reference `{input}` has no row number")
            }
            A1ParseError::InvalidCharacter { input, found } => {
                write!(f, "cell reference `{input}` contains invalid character `{found}`")
            }
            A1ParseError::RowOutOfRange { input, row } => {
                write!(f, "row {row} in `{input}` is outside 1..={ROW_MAX}")
            }
            A1ParseError::ColumnOutOfRange(input) => {
                write!(f, "column `{input}` is outside A..=XFD")
            }
        }
    }
}

impl std::error::Error for A1ParseError {}

/// Concrete cell position, 1-based on both axes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    row: u32,
    col: u32,
}

impl CellAddress {
    /// Combine validated column letters with a row number.
    pub fn from_column(letters: &str, row: u32) -> Result<Self, A1ParseError> {
        let col = parse_column(letters)?;
        if row == 0 || row > ROW_MAX {
            return Err(A1ParseError::RowOutOfRange {
                input: format!("{}{row}", letters.trim()),
                row: row as u64,
            });
        }
        Ok(Self { row, col })
    }

    /// Parse an A1 reference such as `F5`, `$AB$12` or `c3`.
    pub fn parse_a1(reference: &str) -> Result<Self, A1ParseError> {
        let input = reference.trim();
        if input.is_empty() {
            return Err(A1ParseError::Empty);
        }
        let bytes = input.as_bytes();
        let mut idx = 0;
        if bytes[idx] == b'$' {
            idx += 1;
        }
        let letters_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        let letters = &input[letters_start..idx];
        if letters.is_empty() {
            return Err(match input[letters_start..].chars().next() {
                Some(ch) if !ch.is_ascii_digit() => A1ParseError::InvalidCharacter {
                    input: input.to_string(),
                    found: ch,
                },
                _ => A1ParseError::MissingColumn(input.to_string()),
            });
        }
        if idx < bytes.len() && bytes[idx] == b'$' {
            idx += 1;
        }
        let digits = &input[idx..];
        if digits.is_empty() {
            return Err(A1ParseError::MissingRow(input.to_string()));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(A1ParseError::InvalidCharacter {
                input: input.to_string(),
                found: bad,
            });
        }
        let row: u64 = digits
            .parse()
            .map_err(|_| A1ParseError::RowOutOfRange {
                input: input.to_string(),
                row: u64::MAX,
            })?;
        if row == 0 || row > ROW_MAX as u64 {
            return Err(A1ParseError::RowOutOfRange {
                input: input.to_string(),
                row,
            });
        }
        let col = letters_to_column_index(letters)
            .filter(|c| *c <= COL_MAX)
            .ok_or_else(|| A1ParseError::ColumnOutOfRange(letters.to_string()))?;
        Ok(Self {
            row: row as u32,
            col,
        })
    }

    #[inline(always)]
    pub fn row(self) -> u32 {
        self.row
    }

    #[inline(always)]
    pub fn col(self) -> u32 {
        self.col
    }

    /// Column letters for this address (`1 -> "A"`).
    pub fn column_letters(self) -> String {
        column_to_letters(self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = A1ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for CellAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CellAddress::parse_a1(&raw).map_err(serde::de::Error::custom)
    }
}

/// Validate a bare column reference (`"B"`, `"$aa"`) and return its 1-based index.
pub fn parse_column(letters: &str) -> Result<u32, A1ParseError> {
    let input = letters.trim();
    let stripped = input.strip_prefix('$').unwrap_or(input);
    if stripped.is_empty() {
        return Err(A1ParseError::MissingColumn(input.to_string()));
    }
    if let Some(bad) = stripped.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(A1ParseError::InvalidCharacter {
            input: input.to_string(),
            found: bad,
        });
    }
    letters_to_column_index(stripped)
        .filter(|c| *c <= COL_MAX)
        .ok_or_else(|| A1ParseError::ColumnOutOfRange(input.to_string()))
}

/// 1-based column index to letters (`28 -> "AB"`).
pub fn column_to_letters(mut col: u32) -> String {
    let mut buf = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        buf.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

fn letters_to_column_index(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in s.bytes() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let val = (ch.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col.checked_mul(26)?.checked_add(val)?;
    }
    Some(col)
}
