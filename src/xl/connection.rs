//! The document capability every sheet controller talks to

use crate::error::PhppResult;
use crate::xl::address::RangeAddress;
use crate::xl::item::WriteOp;
use crate::xl::value::{CellValue, WriteValue};
use tracing::debug;

/// Read and write access to an open workbook.
///
/// Rows are 1-based and columns are letters. Reads of cells that were never
/// set return [`CellValue::Empty`]; a missing worksheet is an error.
pub trait DocumentConnection {
    fn worksheet_names(&self) -> Vec<String>;

    /// Values of `column` from `row_start` to `row_end`, both inclusive
    fn get_single_column_data(
        &self,
        sheet: &str,
        column: &str,
        row_start: u32,
        row_end: u32,
    ) -> PhppResult<Vec<CellValue>>;

    /// Every value of `row`, from column A up to the last used column
    fn get_single_row_data(&self, sheet: &str, row: u32) -> PhppResult<Vec<CellValue>>;

    /// Rectangular block of values, row-major
    fn get_data(&self, sheet: &str, range: &RangeAddress) -> PhppResult<Vec<Vec<CellValue>>>;

    /// First row in `row_start..=row_end` of `column` whose value reads as
    /// `value` (text equal, or an integral number with the same digits)
    fn get_row_num_of_value_in_column(
        &self,
        sheet: &str,
        row_start: u32,
        row_end: u32,
        column: &str,
        value: &str,
    ) -> PhppResult<Option<u32>> {
        let wanted = value.trim();
        let data = self.get_single_column_data(sheet, column, row_start, row_end)?;
        let found = data.iter().position(|cell| match cell {
            CellValue::Text(s) => s.trim() == wanted,
            CellValue::Number(_) => cell.to_id_string() == wanted,
            _ => false,
        });
        Ok(found.map(|offset| row_start + offset as u32))
    }

    /// Write `value` into `range`.
    ///
    /// A scalar fills every cell of the range. A sequence is laid out
    /// rightward from the range start, one value per column.
    fn write(&mut self, sheet: &str, range: &RangeAddress, value: &WriteValue) -> PhppResult<()>;
}

/// Issue one merged write op against the connection
pub fn write_op(conn: &mut dyn DocumentConnection, op: &WriteOp) -> PhppResult<()> {
    let range = op.range();
    let value = op.write_value()?;
    debug!(sheet = op.sheet(), range = %range, "write");
    conn.write(op.sheet(), &range, &value)
}

/// Read a single cell
pub fn read_cell(
    conn: &dyn DocumentConnection,
    sheet: &str,
    column: &str,
    row: u32,
) -> PhppResult<CellValue> {
    Ok(conn
        .get_single_column_data(sheet, column, row, row)?
        .into_iter()
        .next()
        .unwrap_or_default())
}
