//! In-memory workbook
//!
//! A sparse grid per worksheet. It backs the `.xlsx` load/save path and is the
//! document every test writes into. Each read call through
//! [`DocumentConnection`] bumps a counter so callers can prove caching.

use crate::error::{PhppError, PhppResult};
use crate::xl::address::{letters_to_index, CellAddress, RangeAddress};
use crate::xl::connection::DocumentConnection;
use crate::xl::value::{CellValue, WriteValue};
use std::cell::Cell;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Sheet {
    name: String,
    /// (row, column index) → value
    cells: BTreeMap<(u32, u32), CellValue>,
}

#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
    reads: Cell<usize>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty worksheet (no-op if the name already exists)
    pub fn add_sheet(&mut self, name: &str) -> &mut Self {
        if self.sheet(name).is_err() {
            self.sheets.push(Sheet {
                name: name.to_string(),
                cells: BTreeMap::new(),
            });
        }
        self
    }

    /// Set a cell by address text ("B10"), creating the sheet if needed
    pub fn set(
        &mut self,
        sheet: &str,
        address: &str,
        value: impl Into<CellValue>,
    ) -> PhppResult<&mut Self> {
        let cell = CellAddress::parse(address)?;
        self.set_cell(sheet, cell.row, cell.column_index(), value.into());
        Ok(self)
    }

    /// Set a cell by row and 1-based column index
    pub fn set_cell(&mut self, sheet: &str, row: u32, column: u32, value: CellValue) {
        self.add_sheet(sheet);
        if let Ok(target) = self.sheet_mut(sheet) {
            if value == CellValue::Empty {
                target.cells.remove(&(row, column));
            } else {
                target.cells.insert((row, column), value);
            }
        }
    }

    /// Value at an address; does not count as a read
    pub fn get(&self, sheet: &str, address: &str) -> PhppResult<CellValue> {
        let cell = CellAddress::parse(address)?;
        Ok(self.value_at(self.sheet(sheet)?, cell.row, cell.column_index()))
    }

    /// Every non-empty cell of a sheet as (row, column index, value), row-major
    pub fn cells(&self, sheet: &str) -> PhppResult<impl Iterator<Item = (u32, u32, &CellValue)>> {
        Ok(self
            .sheet(sheet)?
            .cells
            .iter()
            .map(|((row, col), value)| (*row, *col, value)))
    }

    /// Number of read calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn reset_read_count(&self) {
        self.reads.set(0);
    }

    fn count_read(&self) {
        self.reads.set(self.reads.get() + 1);
    }

    fn sheet(&self, name: &str) -> PhppResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| self.not_found(name))
    }

    fn sheet_mut(&mut self, name: &str) -> PhppResult<&mut Sheet> {
        let err = self.not_found(name);
        self.sheets.iter_mut().find(|s| s.name == name).ok_or(err)
    }

    fn not_found(&self, name: &str) -> PhppError {
        PhppError::WorksheetNotFound {
            candidates: vec![name.to_string()],
            found: self.sheets.iter().map(|s| s.name.clone()).collect(),
        }
    }

    fn value_at(&self, sheet: &Sheet, row: u32, column: u32) -> CellValue {
        sheet.cells.get(&(row, column)).cloned().unwrap_or_default()
    }
}

/// A leading `'` marks forced text, as in a spreadsheet UI; it is not stored
fn as_stored(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(s) => match s.strip_prefix('\'') {
            Some(rest) => CellValue::Text(rest.to_string()),
            None => cell.clone(),
        },
        other => other.clone(),
    }
}

impl DocumentConnection for MemoryWorkbook {
    fn worksheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn get_single_column_data(
        &self,
        sheet: &str,
        column: &str,
        row_start: u32,
        row_end: u32,
    ) -> PhppResult<Vec<CellValue>> {
        self.count_read();
        let target = self.sheet(sheet)?;
        let col = letters_to_index(column)?;
        Ok((row_start..=row_end)
            .map(|row| self.value_at(target, row, col))
            .collect())
    }

    fn get_single_row_data(&self, sheet: &str, row: u32) -> PhppResult<Vec<CellValue>> {
        self.count_read();
        let target = self.sheet(sheet)?;
        let last_col = target
            .cells
            .range((row, 0)..=(row, u32::MAX))
            .map(|((_, col), _)| *col)
            .max()
            .unwrap_or(0);
        Ok((1..=last_col)
            .map(|col| self.value_at(target, row, col))
            .collect())
    }

    fn get_data(&self, sheet: &str, range: &RangeAddress) -> PhppResult<Vec<Vec<CellValue>>> {
        self.count_read();
        let target = self.sheet(sheet)?;
        let (r1, r2, c1, c2) = range.bounds();
        Ok((r1..=r2)
            .map(|row| (c1..=c2).map(|col| self.value_at(target, row, col)).collect())
            .collect())
    }

    fn write(&mut self, sheet: &str, range: &RangeAddress, value: &WriteValue) -> PhppResult<()> {
        self.sheet(sheet)?;
        match value {
            WriteValue::Scalar(cell) => {
                let (r1, r2, c1, c2) = range.bounds();
                for row in r1..=r2 {
                    for col in c1..=c2 {
                        self.set_cell(sheet, row, col, as_stored(cell));
                    }
                }
            }
            WriteValue::Sequence(cells) => {
                let row = range.start.row;
                let start = range.start.column_index();
                for (i, cell) in cells.iter().enumerate() {
                    self.set_cell(sheet, row, start + i as u32, as_stored(cell));
                }
            }
        }
        Ok(())
    }
}
