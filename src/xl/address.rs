//! Cell addressing: letter columns, 1-based rows and `A1:B2` style ranges
//!
//! Columns use bijective base-26 (A=1 … Z=26, AA=27 …) so there is no zero
//! digit and multi-letter columns past "Z" round-trip exactly.

use crate::error::{PhppError, PhppResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Longest column name a worksheet can have ("XFD")
pub const MAX_COLUMN_LETTERS: usize = 3;

static CELL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$"));

/// Convert column letters to a 1-based column index ("A" → 1, "AA" → 27).
///
/// Non-letter characters are ignored and lower-case is accepted, so `"$ab"`
/// reads as `"AB"`. An input with no letters gives 0, and more than
/// [`MAX_COLUMN_LETTERS`] letters is an error.
pub fn letters_to_index(column: &str) -> PhppResult<u32> {
    let letters: Vec<char> = column.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.len() > MAX_COLUMN_LETTERS {
        return Err(PhppError::InvalidAddress(format!(
            "column '{}' has more than {} letters",
            column, MAX_COLUMN_LETTERS
        )));
    }
    Ok(letters.iter().fold(0u32, |acc, c| {
        acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32) + 1
    }))
}

/// Convert a 1-based column index to letters (1 → "A", 27 → "AA").
///
/// Index 0 has no column and yields an empty string.
pub fn index_to_letters(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Return the column `offset` places away from `column` (`col_offset("Z", 1)` → "AA").
pub fn col_offset(column: &str, offset: i32) -> PhppResult<String> {
    let base = letters_to_index(column)? as i64;
    let target = base + offset as i64;
    if base == 0 || target < 1 {
        return Err(PhppError::InvalidAddress(format!(
            "{} offset by {}",
            column, offset
        )));
    }
    Ok(index_to_letters(target as u32))
}

/// A single cell: letter column plus 1-based row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub column: String,
    pub row: u32,
}

impl CellAddress {
    pub fn new(column: impl Into<String>, row: u32) -> Self {
        Self {
            column: column.into().to_ascii_uppercase(),
            row,
        }
    }

    /// Parse "B12" / "$B$12"
    pub fn parse(address: &str) -> PhppResult<Self> {
        let cell_pattern = CELL_PATTERN
            .as_ref()
            .map_err(|e| PhppError::InvalidAddress(format!("Regex error: {}", e)))?;
        let caps = cell_pattern
            .captures(address.trim())
            .ok_or_else(|| PhppError::InvalidAddress(address.to_string()))?;
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| PhppError::InvalidAddress(address.to_string()))?;
        if row == 0 {
            return Err(PhppError::InvalidAddress(address.to_string()));
        }
        Ok(Self::new(&caps[1], row))
    }

    /// 1-based column index, 0 when the column is not a worksheet column
    pub fn column_index(&self) -> u32 {
        letters_to_index(&self.column).unwrap_or(0)
    }

    /// The same row, `offset` columns over
    pub fn offset_columns(&self, offset: i32) -> PhppResult<Self> {
        Ok(Self::new(col_offset(&self.column, offset)?, self.row))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// A rectangular range, `start` top-left and `end` bottom-right (inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAddress {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl RangeAddress {
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    pub fn single(cell: CellAddress) -> Self {
        Self {
            end: cell.clone(),
            start: cell,
        }
    }

    /// Parse "A1" or "A1:C3"
    pub fn parse(range: &str) -> PhppResult<Self> {
        match range.split_once(':') {
            Some((a, b)) => Ok(Self::new(CellAddress::parse(a)?, CellAddress::parse(b)?)),
            None => Ok(Self::single(CellAddress::parse(range)?)),
        }
    }

    /// Column range in one row, e.g. "B7:K7"
    pub fn row_span(row: u32, first_col: &str, last_col: &str) -> Self {
        Self::new(CellAddress::new(first_col, row), CellAddress::new(last_col, row))
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// (first_row, last_row, first_col_index, last_col_index), normalized
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        let (r1, r2) = (self.start.row.min(self.end.row), self.start.row.max(self.end.row));
        let (c1, c2) = (self.start.column_index(), self.end.column_index());
        (r1, r2, c1.min(c2), c1.max(c2))
    }
}

impl fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}
