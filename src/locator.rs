//! Section discovery: find where a table lives on a worksheet by scanning for
//! its marker strings
//!
//! The same logical table sits at different rows across PHPP versions,
//! languages and user edits, so nothing here assumes a fixed layout. A
//! [`SectionLocator`] finds three rows for one table:
//!
//! - the header row: first row whose locator column matches the header
//!   marker, searched in growing windows up to a ceiling
//! - the first entry row: the entry marker (usually the number `1`) within a
//!   short window below the header, plus the section's `entry_row_offset`
//! - the last entry row: the row before the numbered entries stop (or before
//!   an explicit end marker, per `end_row_offset`)
//!
//! Each row is computed at most once per locator and cached until
//! [`SectionLocator::invalidate`] is called.

use crate::error::{PhppError, PhppResult};
use crate::shape::model::{HeaderShape, LocatedInput, MatchMode, SectionShape};
use crate::xl::address::CellAddress;
use crate::xl::connection::DocumentConnection;
use crate::xl::value::CellValue;
use std::cell::OnceCell;
use tracing::debug;

/// Window sizes and limits for every scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Row the header search starts on when the shape does not say otherwise
    pub header_start: u32,
    /// Rows read by the first header search window
    pub header_window: u32,
    /// Each missed header window is this many times larger than the last
    pub window_growth: u32,
    /// Rows below the header searched for the first entry marker
    pub entry_window: u32,
    /// Rows read per block while looking for the end of a table
    pub block_size: u32,
    /// No scan reads past this row
    pub ceiling: u32,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            header_start: 1,
            header_window: 100,
            window_growth: 10,
            entry_window: 25,
            block_size: 500,
            ceiling: 10_000,
        }
    }
}

/// Rows of one located table; `header_row <= first_entry_row <= last_entry_row`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLocation {
    pub header_row: u32,
    pub first_entry_row: u32,
    pub last_entry_row: u32,
}

impl SectionLocation {
    /// Number of entry rows in the table
    pub fn capacity(&self) -> usize {
        (self.last_entry_row - self.first_entry_row + 1) as usize
    }
}

/// Compare one cell against a marker
pub fn cell_matches(value: &CellValue, marker: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Equals => match value {
            CellValue::Text(s) => s.trim() == marker.trim(),
            CellValue::Number(_) => value.to_id_string() == marker.trim(),
            _ => false,
        },
        MatchMode::Contains => match value {
            CellValue::Empty => false,
            other => other.to_string().contains(marker),
        },
        MatchMode::Numeric => value.entry_number().as_deref() == Some(marker.trim()),
    }
}

fn offset_row(row: u32, offset: i32) -> u32 {
    (row as i64 + offset as i64).max(1) as u32
}

/// Search `column` for the header marker in growing windows
pub fn scan_for_header(
    conn: &dyn DocumentConnection,
    sheet: &str,
    header: &HeaderShape,
    policy: &ScanPolicy,
) -> PhppResult<u32> {
    let mut start = header.header_search_start.max(1);
    let mut window = policy.header_window.max(1);

    while start <= policy.ceiling {
        let end = start.saturating_add(window).min(policy.ceiling);
        let data = conn.get_single_column_data(sheet, &header.locator_col_header, start, end)?;
        if let Some(i) = data
            .iter()
            .position(|v| cell_matches(v, &header.locator_string_header, header.header_match))
        {
            return Ok(start + i as u32);
        }
        start = end + 1;
        window = window.saturating_mul(policy.window_growth.max(2));
    }

    Err(PhppError::SectionMarkerNotFound {
        marker: header.locator_string_header.clone(),
        sheet: sheet.to_string(),
        column: header.locator_col_header.clone(),
    })
}

/// Locator for a section that only needs its header row
#[derive(Debug)]
pub struct HeaderLocator {
    sheet: String,
    header: HeaderShape,
    policy: ScanPolicy,
    row: OnceCell<u32>,
}

impl HeaderLocator {
    pub fn new(sheet: impl Into<String>, header: HeaderShape) -> Self {
        Self::with_policy(sheet, header, ScanPolicy::default())
    }

    pub fn with_policy(sheet: impl Into<String>, header: HeaderShape, policy: ScanPolicy) -> Self {
        Self {
            sheet: sheet.into(),
            header,
            policy,
            row: OnceCell::new(),
        }
    }

    pub fn header_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        if let Some(row) = self.row.get() {
            return Ok(*row);
        }
        let row = scan_for_header(conn, &self.sheet, &self.header, &self.policy)?;
        debug!(sheet = %self.sheet, marker = %self.header.locator_string_header, row, "header located");
        let _ = self.row.set(row);
        Ok(row)
    }

    pub fn invalidate(&mut self) {
        self.row.take();
    }
}

/// Finds and caches the header, first and last entry rows of one table
#[derive(Debug)]
pub struct SectionLocator {
    sheet: String,
    shape: SectionShape,
    policy: ScanPolicy,
    /// (header_row, first_entry_row) for tables that start at fixed rows
    fixed: Option<(u32, u32)>,
    header_row: OnceCell<u32>,
    first_entry_row: OnceCell<u32>,
    last_entry_row: OnceCell<u32>,
}

impl SectionLocator {
    pub fn new(sheet: impl Into<String>, shape: SectionShape) -> Self {
        Self::with_policy(sheet, shape, ScanPolicy::default())
    }

    pub fn with_policy(sheet: impl Into<String>, shape: SectionShape, policy: ScanPolicy) -> Self {
        Self {
            sheet: sheet.into(),
            shape,
            policy,
            fixed: None,
            header_row: OnceCell::new(),
            first_entry_row: OnceCell::new(),
            last_entry_row: OnceCell::new(),
        }
    }

    /// A table whose header and first entry rows are fixed by the shape.
    /// Only the last entry row is scanned for.
    pub fn fixed(
        sheet: impl Into<String>,
        shape: SectionShape,
        header_row: u32,
        first_entry_row: u32,
    ) -> Self {
        let mut locator = Self::new(sheet, shape);
        locator.fixed = Some((header_row, first_entry_row.max(header_row)));
        locator
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn shape(&self) -> &SectionShape {
        &self.shape
    }

    /// The header marker, used to name the section in errors
    pub fn marker(&self) -> &str {
        &self.shape.header.locator_string_header
    }

    pub fn header_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        if let Some((header, _)) = self.fixed {
            return Ok(header);
        }
        if let Some(row) = self.header_row.get() {
            return Ok(*row);
        }
        let row = scan_for_header(conn, &self.sheet, &self.shape.header, &self.policy)?;
        debug!(sheet = %self.sheet, marker = %self.marker(), row, "header located");
        let _ = self.header_row.set(row);
        Ok(row)
    }

    pub fn first_entry_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        if let Some((_, first)) = self.fixed {
            return Ok(first);
        }
        if let Some(row) = self.first_entry_row.get() {
            return Ok(*row);
        }

        let header_row = self.header_row(conn)?;
        let end = (header_row + self.policy.entry_window).min(self.policy.ceiling.max(header_row));
        let data =
            conn.get_single_column_data(&self.sheet, &self.shape.locator_col_entry, header_row, end)?;
        let found = data.iter().position(|v| {
            cell_matches(v, &self.shape.locator_string_entry, self.shape.entry_match)
        });

        let row = match found {
            Some(i) => offset_row(header_row + i as u32, self.shape.entry_row_offset).max(header_row),
            None => {
                return Err(PhppError::SectionMarkerNotFound {
                    marker: self.shape.locator_string_entry.clone(),
                    sheet: self.sheet.clone(),
                    column: self.shape.locator_col_entry.clone(),
                })
            }
        };
        debug!(sheet = %self.sheet, marker = %self.marker(), row, "first entry row located");
        let _ = self.first_entry_row.set(row);
        Ok(row)
    }

    pub fn last_entry_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        if let Some(row) = self.last_entry_row.get() {
            return Ok(*row);
        }

        let first = self.first_entry_row(conn)?;
        let column = match &self.shape.locator_string_end {
            Some(_) => self.shape.end_column(),
            None => self.shape.locator_col_entry.as_str(),
        };
        let block = self.policy.block_size.max(1);

        let mut start = first;
        while start <= self.policy.ceiling {
            let end = start.saturating_add(block - 1).min(self.policy.ceiling);
            let data = conn.get_single_column_data(&self.sheet, column, start, end)?;
            for (i, value) in data.iter().enumerate() {
                let ends_here = match &self.shape.locator_string_end {
                    Some(end_marker) => cell_matches(value, end_marker, MatchMode::Contains),
                    None => !value.is_integer(),
                };
                if ends_here {
                    let row = offset_row(start + i as u32, self.shape.end_row_offset).max(first);
                    debug!(sheet = %self.sheet, marker = %self.marker(), row, "last entry row located");
                    let _ = self.last_entry_row.set(row);
                    return Ok(row);
                }
            }
            start = end + 1;
        }

        Err(PhppError::SectionMarkerNotFound {
            marker: self
                .shape
                .locator_string_end
                .clone()
                .unwrap_or_else(|| format!("end of '{}' entries", self.marker())),
            sheet: self.sheet.clone(),
            column: column.to_string(),
        })
    }

    /// All three rows at once
    pub fn location(&self, conn: &dyn DocumentConnection) -> PhppResult<SectionLocation> {
        Ok(SectionLocation {
            header_row: self.header_row(conn)?,
            first_entry_row: self.first_entry_row(conn)?,
            last_entry_row: self.last_entry_row(conn)?,
        })
    }

    /// Forget the cached rows so the next call scans again
    pub fn invalidate(&mut self) {
        self.header_row.take();
        self.first_entry_row.take();
        self.last_entry_row.take();
    }
}

/// Rows scanned when looking for the label of a single input cell
pub const INPUT_SEARCH_ROWS: (u32, u32) = (1, 200);

/// Find the cell of a single labelled input: the first row in
/// [`INPUT_SEARCH_ROWS`] whose locator column contains the label, shifted
/// by the input's row offset, in the input column
pub fn locate_input(
    conn: &dyn DocumentConnection,
    sheet: &str,
    input: &LocatedInput,
) -> PhppResult<CellAddress> {
    let (row_start, row_end) = INPUT_SEARCH_ROWS;
    let data = conn.get_single_column_data(sheet, &input.locator_col, row_start, row_end)?;
    let row = data
        .iter()
        .position(|v| cell_matches(v, &input.locator_string, MatchMode::Contains))
        .map(|i| row_start + i as u32)
        .ok_or_else(|| PhppError::SectionMarkerNotFound {
            marker: input.locator_string.clone(),
            sheet: sheet.to_string(),
            column: input.locator_col.clone(),
        })?;
    Ok(CellAddress::new(
        input.input_column.as_str(),
        offset_row(row, input.input_row_offset),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xl::memory::MemoryWorkbook;

    fn section(entry_match: MatchMode) -> SectionShape {
        SectionShape {
            header: HeaderShape {
                locator_col_header: "B".to_string(),
                locator_string_header: "HDR".to_string(),
                header_match: MatchMode::Equals,
                header_search_start: 1,
            },
            locator_col_entry: "B".to_string(),
            locator_string_entry: "1".to_string(),
            entry_match,
            entry_row_offset: 0,
            locator_string_end: None,
            locator_col_end: None,
            end_row_offset: -1,
        }
    }

    fn sheet() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.set("S", "B10", "HDR").unwrap();
        wb.set("S", "B12", "1").unwrap();
        wb.set("S", "B13", 2.0).unwrap();
        wb
    }

    #[test]
    fn test_cell_matches_numeric_coercion() {
        assert!(cell_matches(&CellValue::Number(1.0), "1", MatchMode::Numeric));
        assert!(cell_matches(&CellValue::text("1.0"), "1", MatchMode::Numeric));
        assert!(!cell_matches(&CellValue::text("one"), "1", MatchMode::Numeric));
        assert!(!cell_matches(&CellValue::Empty, "1", MatchMode::Numeric));
    }

    #[test]
    fn test_cell_matches_contains_and_equals() {
        assert!(cell_matches(&CellValue::text("Window Nr."), "Nr", MatchMode::Contains));
        assert!(!cell_matches(&CellValue::text("Window Nr."), "Nr", MatchMode::Equals));
        assert!(cell_matches(&CellValue::text(" Areas "), "Areas", MatchMode::Equals));
    }

    #[test]
    fn test_locates_synthetic_section() {
        let wb = sheet();
        let locator = SectionLocator::new("S", section(MatchMode::Numeric));
        assert_eq!(locator.header_row(&wb).unwrap(), 10);
        assert_eq!(locator.first_entry_row(&wb).unwrap(), 12);
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 13);
    }

    #[test]
    fn test_rows_are_cached() {
        let wb = sheet();
        let locator = SectionLocator::new("S", section(MatchMode::Numeric));
        let first = locator.location(&wb).unwrap();
        let reads = wb.read_count();
        let second = locator.location(&wb).unwrap();
        assert_eq!(first, second);
        assert_eq!(wb.read_count(), reads);
    }

    #[test]
    fn test_invalidate_rescans() {
        let mut wb = sheet();
        let mut locator = SectionLocator::new("S", section(MatchMode::Numeric));
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 13);
        wb.set("S", "B14", 3.0).unwrap();
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 13);
        locator.invalidate();
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 14);
    }

    #[test]
    fn test_header_found_past_first_window() {
        let mut wb = MemoryWorkbook::new();
        wb.set("S", "B450", "HDR").unwrap();
        let locator = SectionLocator::new("S", section(MatchMode::Numeric));
        assert_eq!(locator.header_row(&wb).unwrap(), 450);
    }

    #[test]
    fn test_missing_header_reports_marker_sheet_and_column() {
        let mut wb = MemoryWorkbook::new();
        wb.add_sheet("S");
        let locator = SectionLocator::new("S", section(MatchMode::Numeric));
        match locator.header_row(&wb) {
            Err(PhppError::SectionMarkerNotFound { marker, sheet, column }) => {
                assert_eq!(marker, "HDR");
                assert_eq!(sheet, "S");
                assert_eq!(column, "B");
            }
            other => panic!("expected SectionMarkerNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_end_marker_with_offset() {
        let mut wb = MemoryWorkbook::new();
        wb.set("S", "B10", "HDR").unwrap();
        wb.set("S", "B11", "Nr.").unwrap();
        wb.set("S", "B30", "Total").unwrap();
        let mut shape = section(MatchMode::Contains);
        shape.locator_string_entry = "Nr".to_string();
        shape.entry_row_offset = 2;
        shape.locator_string_end = Some("Total".to_string());
        shape.end_row_offset = -3;
        let locator = SectionLocator::new("S", shape);
        assert_eq!(locator.first_entry_row(&wb).unwrap(), 13);
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 27);
    }

    #[test]
    fn test_fixed_rows_skip_scanning() {
        let mut wb = MemoryWorkbook::new();
        wb.set("S", "B20", 1.0).unwrap();
        wb.set("S", "B21", 2.0).unwrap();
        let locator = SectionLocator::fixed("S", section(MatchMode::Numeric), 18, 20);
        assert_eq!(locator.header_row(&wb).unwrap(), 18);
        assert_eq!(locator.first_entry_row(&wb).unwrap(), 20);
        assert_eq!(wb.read_count(), 0);
        assert_eq!(locator.last_entry_row(&wb).unwrap(), 21);
    }

    #[test]
    fn test_locate_input_applies_offset() {
        let mut wb = MemoryWorkbook::new();
        wb.set("Verification", "B27", "Building category:").unwrap();
        let input = LocatedInput {
            locator_col: "B".to_string(),
            locator_string: "Building category".to_string(),
            input_column: "M".to_string(),
            input_row_offset: 1,
            options: Default::default(),
            unit: None,
        };
        let cell = locate_input(&wb, "Verification", &input).unwrap();
        assert_eq!(cell.to_string(), "M28");
    }
}
