//! Addressed write items and same-row batching
//!
//! Every row builder produces a flat list of [`AddressedWriteItem`]s. Before
//! they reach the document, the items of one row are merged: runs of
//! contiguous columns become a single [`WriteBatch`] so the row goes out as
//! one range write instead of one call per cell.

use crate::error::PhppResult;
use crate::units;
use crate::xl::address::{CellAddress, RangeAddress};
use crate::xl::value::{CellValue, WriteValue};

/// "Write this value (converted from `source_unit` to `target_unit`) to
/// this cell of this sheet"
#[derive(Debug, Clone, PartialEq)]
pub struct AddressedWriteItem {
    pub sheet: String,
    pub address: CellAddress,
    pub value: WriteValue,
    pub source_unit: Option<String>,
    pub target_unit: Option<String>,
}

impl AddressedWriteItem {
    pub fn new(sheet: impl Into<String>, address: CellAddress, value: impl Into<WriteValue>) -> Self {
        Self {
            sheet: sheet.into(),
            address,
            value: value.into(),
            source_unit: None,
            target_unit: None,
        }
    }

    /// Attach the value's native unit and the unit the target column expects
    pub fn with_units(mut self, source_unit: &str, target_unit: Option<&str>) -> Self {
        self.source_unit = Some(source_unit.to_string());
        self.target_unit = target_unit.map(str::to_string);
        self
    }

    /// Full constructor from a column letter and row number
    pub fn create(
        sheet: impl Into<String>,
        column: &str,
        row: u32,
        value: impl Into<WriteValue>,
        source_unit: Option<&str>,
        target_unit: Option<&str>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            address: CellAddress::new(column, row),
            value: value.into(),
            source_unit: source_unit.map(str::to_string),
            target_unit: target_unit.map(str::to_string),
        }
    }

    pub fn column(&self) -> &str {
        &self.address.column
    }

    pub fn row(&self) -> u32 {
        self.address.row
    }

    /// The value to put in the document.
    ///
    /// With both units present, numbers are converted (elementwise for
    /// sequences). Text and empty cells are never converted.
    pub fn effective_value(&self) -> PhppResult<WriteValue> {
        let (from, to) = match (&self.source_unit, &self.target_unit) {
            (Some(from), Some(to)) => (from.as_str(), to.as_str()),
            _ => return Ok(self.value.clone()),
        };

        let convert_cell = |cell: &CellValue| -> PhppResult<CellValue> {
            match cell {
                CellValue::Number(n) => Ok(CellValue::Number(units::convert(*n, from, to)?)),
                other => Ok(other.clone()),
            }
        };

        match &self.value {
            WriteValue::Scalar(cell) => Ok(WriteValue::Scalar(convert_cell(cell)?)),
            WriteValue::Sequence(cells) => Ok(WriteValue::Sequence(
                cells.iter().map(convert_cell).collect::<PhppResult<Vec<_>>>()?,
            )),
        }
    }

    /// The range this item covers (sequences extend rightward)
    pub fn range(&self) -> RangeAddress {
        let width = self.value.width().max(1) as u32;
        let last = self.address.column_index() + width - 1;
        RangeAddress::new(
            self.address.clone(),
            CellAddress::new(crate::xl::address::index_to_letters(last), self.address.row),
        )
    }
}

/// Same-row items over contiguous columns, written as one range
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub sheet: String,
    pub items: Vec<AddressedWriteItem>,
}

impl WriteBatch {
    fn start(item: AddressedWriteItem) -> Self {
        Self {
            sheet: item.sheet.clone(),
            items: vec![item],
        }
    }

    pub fn range(&self) -> RangeAddress {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => {
                RangeAddress::new(first.address.clone(), last.address.clone())
            }
            _ => RangeAddress::single(CellAddress::new("A", 1)),
        }
    }

    /// Column-ascending effective values of the batch
    pub fn write_value(&self) -> PhppResult<WriteValue> {
        let mut values = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item.effective_value()? {
                WriteValue::Scalar(cell) => values.push(cell),
                WriteValue::Sequence(cells) => values.extend(cells),
            }
        }
        Ok(WriteValue::Sequence(values))
    }

    fn next_column(&self) -> u32 {
        self.items
            .last()
            .map(|item| item.address.column_index() + 1)
            .unwrap_or(0)
    }
}

/// One physical write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Item(AddressedWriteItem),
    Batch(WriteBatch),
}

impl WriteOp {
    pub fn sheet(&self) -> &str {
        match self {
            WriteOp::Item(item) => &item.sheet,
            WriteOp::Batch(batch) => &batch.sheet,
        }
    }

    pub fn range(&self) -> RangeAddress {
        match self {
            WriteOp::Item(item) => item.range(),
            WriteOp::Batch(batch) => batch.range(),
        }
    }

    pub fn write_value(&self) -> PhppResult<WriteValue> {
        match self {
            WriteOp::Item(item) => item.effective_value(),
            WriteOp::Batch(batch) => batch.write_value(),
        }
    }
}

/// Merge the items of one row into range writes.
///
/// Items spanning more than one sheet or row come back unmodified, one op
/// each, in their original order. Otherwise the items are stable-sorted by
/// column and chained while each column is exactly one past the previous.
/// Sequence-valued items always stay on their own.
pub fn merge_same_row(items: Vec<AddressedWriteItem>) -> Vec<WriteOp> {
    let single_row = match items.first() {
        Some(first) => items
            .iter()
            .all(|item| item.sheet == first.sheet && item.address.row == first.address.row),
        None => return Vec::new(),
    };
    if !single_row {
        return items.into_iter().map(WriteOp::Item).collect();
    }

    let mut sorted = items;
    sorted.sort_by_key(|item| item.address.column_index());

    let mut ops = Vec::new();
    let mut running: Option<WriteBatch> = None;

    for item in sorted {
        if item.value.is_sequence() {
            if let Some(batch) = running.take() {
                ops.push(finish(batch));
            }
            ops.push(WriteOp::Item(item));
            continue;
        }

        match running.as_mut() {
            Some(batch) if batch.next_column() == item.address.column_index() => {
                batch.items.push(item);
            }
            _ => {
                if let Some(batch) = running.take() {
                    ops.push(finish(batch));
                }
                running = Some(WriteBatch::start(item));
            }
        }
    }
    if let Some(batch) = running {
        ops.push(finish(batch));
    }
    ops
}

fn finish(mut batch: WriteBatch) -> WriteOp {
    if batch.items.len() == 1 {
        match batch.items.pop() {
            Some(item) => WriteOp::Item(item),
            None => WriteOp::Batch(batch),
        }
    } else {
        WriteOp::Batch(batch)
    }
}
