//! Variants worksheet
//!
//! The user-input part of the worksheet holds three blocks, each found
//! below the previous one: building assemblies, window types and
//! ventilation. Every assembly and window type row carries a short prefix
//! in the column left of its name; `"{prefix}-{name}"` is what the other
//! worksheets select to follow the active variant.

use crate::error::{PhppError, PhppResult};
use crate::locator::{cell_matches, HeaderLocator};
use crate::shape::model::{HeaderShape, PhppShape};
use crate::sheets::write_items;
use crate::xl::address::{col_offset, CellAddress, RangeAddress};
use crate::xl::connection::DocumentConnection;
use crate::xl::item::AddressedWriteItem;
use crate::xl::value::CellValue;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Rows below the input header searched for the assemblies block
pub const ASSEMBLIES_SEARCH_ROWS: u32 = 100;
/// Rows below the previous block searched for windows and ventilation
pub const BLOCK_SEARCH_ROWS: u32 = 300;

/// Rows of the assemblies block read for ids
pub const ASSEMBLY_ID_ROWS: u32 = 52;
/// Rows of the window types block read for ids
pub const WINDOW_TYPE_ID_ROWS: u32 = 207;
/// Rows of the ventilation block read for item labels
pub const VENTILATION_ITEM_ROWS: u32 = 10;

/// Assemblies are entered every other row
pub const ASSEMBLY_ROW_STRIDE: u32 = 2;
/// Window types are entered every eighth row
pub const WINDOW_TYPE_ROW_STRIDE: u32 = 8;

/// A Variants row id: the row prefix and its display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantId {
    pub prefix: String,
    pub display_name: String,
}

impl VariantId {
    pub fn phpp_id(&self) -> String {
        format!("{}-{}", self.prefix, self.display_name)
    }
}

#[derive(Debug)]
pub struct VariantsSheet {
    shape: Rc<PhppShape>,
    input: HeaderLocator,
    assemblies_row: OnceCell<u32>,
    window_types_row: OnceCell<u32>,
    ventilation_row: OnceCell<u32>,
}

impl VariantsSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let input = HeaderLocator::new(&shape.variants.name, shape.variants.input_header.clone());
        Self {
            shape,
            input,
            assemblies_row: OnceCell::new(),
            window_types_row: OnceCell::new(),
            ventilation_row: OnceCell::new(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.variants.name
    }

    /// Column holding the value of the active variant
    pub fn active_value_column(&self) -> &str {
        &self.shape.variants.active_value_column
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BLOCK LOCATIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn find_below(
        &self,
        conn: &dyn DocumentConnection,
        header: &HeaderShape,
        start: u32,
        rows: u32,
    ) -> PhppResult<u32> {
        let data =
            conn.get_single_column_data(self.sheet_name(), &header.locator_col_header, start, start + rows)?;
        let row = data
            .iter()
            .position(|v| cell_matches(v, &header.locator_string_header, header.header_match))
            .map(|i| start + i as u32)
            .ok_or_else(|| PhppError::SectionMarkerNotFound {
                marker: header.locator_string_header.clone(),
                sheet: self.sheet_name().to_string(),
                column: header.locator_col_header.clone(),
            })?;
        debug!(sheet = self.sheet_name(), marker = %header.locator_string_header, row, "variants block located");
        Ok(row)
    }

    fn cached(
        cell: &OnceCell<u32>,
        find: impl FnOnce() -> PhppResult<u32>,
    ) -> PhppResult<u32> {
        if let Some(row) = cell.get() {
            return Ok(*row);
        }
        let row = find()?;
        Ok(*cell.get_or_init(|| row))
    }

    pub fn input_section_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        self.input.header_row(conn)
    }

    pub fn assemblies_start(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        Self::cached(&self.assemblies_row, || {
            let start = self.input_section_row(conn)?;
            self.find_below(conn, &self.shape.variants.assemblies.header, start, ASSEMBLIES_SEARCH_ROWS)
        })
    }

    pub fn window_types_start(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        Self::cached(&self.window_types_row, || {
            let start = self.assemblies_start(conn)?;
            self.find_below(conn, &self.shape.variants.windows.header, start, BLOCK_SEARCH_ROWS)
        })
    }

    pub fn ventilation_start(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        Self::cached(&self.ventilation_row, || {
            let start = self.window_types_start(conn)?;
            self.find_below(conn, &self.shape.variants.ventilation.header, start, BLOCK_SEARCH_ROWS)
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════

    /// Name the `index`th (0-based) assembly row
    pub fn write_assembly_layer(
        &self,
        conn: &mut dyn DocumentConnection,
        name: &str,
        index: u32,
    ) -> PhppResult<()> {
        let start = self.assemblies_start(&*conn)?;
        let row = start + index * ASSEMBLY_ROW_STRIDE + 1;
        let column = &self.shape.variants.assemblies.input_col;
        write_items(
            conn,
            vec![AddressedWriteItem::new(self.sheet_name(), CellAddress::new(column, row), name)],
        )
    }

    /// Name the `index`th (0-based) window type row
    pub fn write_window_type(
        &self,
        conn: &mut dyn DocumentConnection,
        name: &str,
        index: u32,
    ) -> PhppResult<()> {
        let start = self.window_types_start(&*conn)?;
        let row = start + index * WINDOW_TYPE_ROW_STRIDE + 1;
        let column = &self.shape.variants.windows.input_col;
        write_items(
            conn,
            vec![AddressedWriteItem::new(self.sheet_name(), CellAddress::new(column, row), name)],
        )
    }

    // ═══════════════════════════════════════════════════════════════════════
    // IDS
    // ═══════════════════════════════════════════════════════════════════════

    /// Rows of (prefix, name) pairs where both cells are filled
    fn ids_below(
        &self,
        conn: &dyn DocumentConnection,
        input_col: &str,
        start: u32,
        rows: u32,
    ) -> PhppResult<Vec<VariantId>> {
        let range = RangeAddress::new(
            CellAddress::new(col_offset(input_col, -1)?, start + 1),
            CellAddress::new(input_col, start + rows),
        );
        Ok(conn
            .get_data(self.sheet_name(), &range)?
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [prefix, name, ..] if !prefix.is_blank() && !name.is_blank() => Some(VariantId {
                    prefix: prefix.to_id_string(),
                    display_name: name.to_string(),
                }),
                _ => None,
            })
            .collect())
    }

    pub fn assembly_layer_ids(&self, conn: &dyn DocumentConnection) -> PhppResult<Vec<VariantId>> {
        let start = self.assemblies_start(conn)?;
        self.ids_below(conn, &self.shape.variants.assemblies.input_col, start, ASSEMBLY_ID_ROWS)
    }

    /// Window type ids keyed by display name
    pub fn window_type_ids(&self, conn: &dyn DocumentConnection) -> PhppResult<HashMap<String, VariantId>> {
        let start = self.window_types_start(conn)?;
        Ok(self
            .ids_below(conn, &self.shape.variants.windows.input_col, start, WINDOW_TYPE_ID_ROWS)?
            .into_iter()
            .map(|id| (id.display_name.clone(), id))
            .collect())
    }

    /// Row of each labelled item of the ventilation block
    pub fn ventilation_input_rows(&self, conn: &dyn DocumentConnection) -> PhppResult<HashMap<String, u32>> {
        let start = self.ventilation_start(conn)?;
        let data = conn.get_single_column_data(
            self.sheet_name(),
            &self.shape.variants.ventilation.input_col,
            start + 1,
            start + VENTILATION_ITEM_ROWS,
        )?;
        Ok(data
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_blank())
            .map(|(i, v)| (v.to_string(), start + 1 + i as u32))
            .collect())
    }

    /// Cell holding the active ventilation unit
    pub fn ventilator_unit_cell(&self, conn: &dyn DocumentConnection) -> PhppResult<CellAddress> {
        let vent = &self.shape.variants.ventilation;
        let label = &vent.input_item_names.ventilator_unit;
        let rows = self.ventilation_input_rows(conn)?;
        let row = rows.get(label).copied().ok_or_else(|| PhppError::SectionMarkerNotFound {
            marker: label.clone(),
            sheet: self.sheet_name().to_string(),
            column: vent.input_col.clone(),
        })?;
        Ok(CellAddress::new(self.active_value_column(), row))
    }

    /// Value of the active variant on `row`
    pub fn active_value(&self, conn: &dyn DocumentConnection, row: u32) -> PhppResult<CellValue> {
        crate::xl::connection::read_cell(conn, self.sheet_name(), self.active_value_column(), row)
    }
}
