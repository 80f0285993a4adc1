//! `.xlsx` load (calamine) and save (rust_xlsxwriter) for [`MemoryWorkbook`]
//!
//! Loading keeps cell formulas as `=...` text so that saving writes them back
//! as formulas. Cell formatting, defined names and data validation are not
//! carried over.

use crate::error::{PhppError, PhppResult};
use crate::xl::connection::DocumentConnection;
use crate::xl::memory::MemoryWorkbook;
use crate::xl::value::CellValue;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Formula, Workbook};
use std::path::Path;
use tracing::{debug, info};

/// Load every worksheet of an `.xlsx` file into memory
pub fn load_workbook<P: AsRef<Path>>(path: P) -> PhppResult<MemoryWorkbook> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| PhppError::Workbook(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut memory = MemoryWorkbook::new();
    let sheet_names = workbook.sheet_names().to_vec();

    for sheet_name in sheet_names {
        memory.add_sheet(&sheet_name);

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            PhppError::Workbook(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut count = 0usize;
        for (r, c, data) in range.used_cells() {
            let value = cell_from_data(data);
            if value != CellValue::Empty {
                memory.set_cell(
                    &sheet_name,
                    row0 + r as u32 + 1,
                    col0 + c as u32 + 1,
                    value,
                );
                count += 1;
            }
        }

        // Formula cells override their cached values
        if let Ok(formulas) = workbook.worksheet_formula(&sheet_name) {
            let (row0, col0) = formulas.start().unwrap_or((0, 0));
            for (r, c, formula) in formulas.used_cells() {
                if !formula.is_empty() {
                    memory.set_cell(
                        &sheet_name,
                        row0 + r as u32 + 1,
                        col0 + c as u32 + 1,
                        CellValue::Text(format!("={}", formula)),
                    );
                }
            }
        }
        debug!(sheet = %sheet_name, cells = count, "loaded worksheet");
    }

    info!(path = %path.display(), sheets = memory.worksheet_names().len(), "workbook loaded");
    Ok(memory)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Save the in-memory workbook as a new `.xlsx` file
pub fn save_workbook<P: AsRef<Path>>(memory: &MemoryWorkbook, path: P) -> PhppResult<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    for sheet_name in memory.worksheet_names() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet_name).map_err(|e| {
            PhppError::Workbook(format!("Failed to name sheet '{}': {}", sheet_name, e))
        })?;

        for (row, col, value) in memory.cells(&sheet_name)? {
            let (r, c) = (row - 1, (col - 1) as u16);
            let written = match value {
                CellValue::Number(n) => worksheet.write_number(r, c, *n).map(|_| ()),
                CellValue::Bool(b) => worksheet.write_boolean(r, c, *b).map(|_| ()),
                CellValue::Text(s) if s.starts_with('=') => {
                    worksheet.write_formula(r, c, Formula::new(s)).map(|_| ())
                }
                CellValue::Text(s) => worksheet.write_string(r, c, s).map(|_| ()),
                CellValue::Empty => Ok(()),
            };
            written.map_err(|e| {
                PhppError::Workbook(format!(
                    "Failed to write {}!R{}C{}: {}",
                    sheet_name, row, col, e
                ))
            })?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| PhppError::Workbook(format!("Failed to save {}: {}", path.display(), e)))?;
    info!(path = %path.display(), "workbook saved");
    Ok(())
}
