//! Row builders: one pure function per domain entity, turning the entity
//! plus a target row into the [`AddressedWriteItem`]s for that row
//!
//! Builders read nothing from the document. Cross-sheet references (the id
//! of a construction, a surface, a frame …) are looked up by the sheet
//! controllers beforehand and passed in as plain strings. Every numeric
//! value is given in its native unit and converted to the unit the shape
//! assigns to the target column.

pub mod addnl_vent;
pub mod areas;
pub mod climate;
pub mod components;
pub mod electricity;
pub mod hot_water;
pub mod shading;
pub mod u_values;
pub mod windows;

use crate::error::PhppResult;
use crate::shape::model::InputItem;
use crate::xl::address::CellAddress;
use crate::xl::item::AddressedWriteItem;
use crate::xl::value::CellValue;

/// Collects the items of one table row
#[derive(Debug)]
pub struct RowItems<'a> {
    sheet: &'a str,
    marker: &'a str,
    row: u32,
    items: Vec<AddressedWriteItem>,
}

impl<'a> RowItems<'a> {
    /// `marker` names the section in `MissingShapeField` errors
    pub fn new(sheet: &'a str, marker: &'a str, row: u32) -> Self {
        Self {
            sheet,
            marker,
            row,
            items: Vec::new(),
        }
    }

    /// Write `value` verbatim into the field's column
    pub fn put(
        &mut self,
        field: &str,
        input: &InputItem,
        value: impl Into<CellValue>,
    ) -> PhppResult<&mut Self> {
        let column = input.column_for(field, self.sheet, self.marker)?;
        self.items.push(AddressedWriteItem::new(
            self.sheet,
            CellAddress::new(column, self.row),
            Into::<CellValue>::into(value),
        ));
        Ok(self)
    }

    /// Write a number given in `native_unit`, converted to the field's unit
    pub fn put_unit(
        &mut self,
        field: &str,
        input: &InputItem,
        value: f64,
        native_unit: &str,
    ) -> PhppResult<&mut Self> {
        let column = input.column_for(field, self.sheet, self.marker)?;
        self.items.push(
            AddressedWriteItem::new(self.sheet, CellAddress::new(column, self.row), value)
                .with_units(native_unit, input.unit()),
        );
        Ok(self)
    }

    pub fn finish(self) -> Vec<AddressedWriteItem> {
        self.items
    }
}

/// Collects the items of one fixed block: a single column, each field at
/// its shape row offset below `base_row`
#[derive(Debug)]
pub struct BlockItems<'a> {
    sheet: &'a str,
    marker: &'a str,
    column: String,
    base_row: u32,
    items: Vec<AddressedWriteItem>,
}

impl<'a> BlockItems<'a> {
    pub fn new(sheet: &'a str, marker: &'a str, column: impl Into<String>, base_row: u32) -> Self {
        Self {
            sheet,
            marker,
            column: column.into(),
            base_row,
            items: Vec::new(),
        }
    }

    fn address(&self, field: &str, input: &InputItem) -> PhppResult<CellAddress> {
        let offset = input.row_for(field, self.sheet, self.marker)?;
        let row = (self.base_row as i64 + offset as i64).max(1) as u32;
        Ok(CellAddress::new(self.column.as_str(), row))
    }

    pub fn put(
        &mut self,
        field: &str,
        input: &InputItem,
        value: impl Into<CellValue>,
    ) -> PhppResult<&mut Self> {
        let address = self.address(field, input)?;
        self.items
            .push(AddressedWriteItem::new(self.sheet, address, Into::<CellValue>::into(value)));
        Ok(self)
    }

    pub fn put_unit(
        &mut self,
        field: &str,
        input: &InputItem,
        value: f64,
        native_unit: &str,
    ) -> PhppResult<&mut Self> {
        let address = self.address(field, input)?;
        self.items.push(
            AddressedWriteItem::new(self.sheet, address, value).with_units(native_unit, input.unit()),
        );
        Ok(self)
    }

    pub fn finish(self) -> Vec<AddressedWriteItem> {
        self.items
    }
}

/// Description text forced to a string (a leading `'` stops the workbook
/// from reading names like "1.5" as numbers)
pub fn as_text(name: &str) -> String {
    format!("'{}", name)
}

/// A cell at `start_row + offset` in a fixed block
pub fn block_item(
    sheet: &str,
    column: &str,
    start_row: u32,
    offset: i32,
    value: impl Into<CellValue>,
) -> AddressedWriteItem {
    let row = (start_row as i64 + offset as i64).max(1) as u32;
    AddressedWriteItem::new(sheet, CellAddress::new(column, row), Into::<CellValue>::into(value))
}
