//! Windows worksheet

use crate::error::PhppResult;
use crate::locator::SectionLocator;
use crate::model::constructions::PhxConstructionWindow;
use crate::model::geometry::PhxPolygon;
use crate::rows::windows::{window_row, WindowRefs};
use crate::shape::model::PhppShape;
use crate::sheets::{write_items, write_table, WriteReport};
use crate::xl::address::{col_offset, CellAddress};
use crate::xl::connection::DocumentConnection;
use crate::xl::item::AddressedWriteItem;
use std::rc::Rc;
use tracing::info;

pub const WINDOW_CAPACITY: usize = 150;

/// One window row: the element's polygon, its window type and the ids of
/// the rows it points at
#[derive(Debug, Clone)]
pub struct WindowInput<'a> {
    pub polygon: &'a PhxPolygon,
    pub window_type: &'a PhxConstructionWindow,
    pub refs: WindowRefs,
}

#[derive(Debug)]
pub struct WindowsSheet {
    shape: Rc<PhppShape>,
    windows: SectionLocator,
}

impl WindowsSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let windows = SectionLocator::new(&shape.windows.name, shape.windows.window_rows.locator.clone());
        Self { shape, windows }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.windows.name
    }

    pub fn windows(&self) -> &SectionLocator {
        &self.windows
    }

    pub fn write_windows(
        &self,
        conn: &mut dyn DocumentConnection,
        windows: &[WindowInput<'_>],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.windows;
        write_table(conn, &self.windows, "windows", Some(WINDOW_CAPACITY), windows, |row, w| {
            window_row(shape, row, w.polygon, w.window_type, &w.refs)
        })
    }

    /// Descriptions of every filled window row, top to bottom
    pub fn all_window_names(&self, conn: &dyn DocumentConnection) -> PhppResult<Vec<String>> {
        let shape = &self.shape.windows;
        let column = shape
            .window_rows
            .inputs
            .description
            .column_for("description", &shape.name, shape.window_rows.marker())?;
        let first = self.windows.first_entry_row(conn)?;
        let last = self.windows.last_entry_row(conn)?;
        Ok(conn
            .get_single_column_data(&shape.name, column, first, last)?
            .into_iter()
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
            .collect())
    }

    /// Point every window row's glazing and frame at the Variants window
    /// type selected in its variant column
    pub fn activate_variants(&self, conn: &mut dyn DocumentConnection) -> PhppResult<()> {
        let shape = &self.shape.windows;
        let inputs = &shape.window_rows.inputs;
        let marker = shape.window_rows.marker();
        let variant_col = inputs.variant_input.column_for("variant_input", &shape.name, marker)?;
        let glazing_col = inputs.glazing_id.column_for("glazing_id", &shape.name, marker)?;
        let frame_col = inputs.frame_id.column_for("frame_id", &shape.name, marker)?;
        let glazing_source = col_offset(variant_col, 1)?;
        let frame_source = col_offset(variant_col, 2)?;

        let first = self.windows.first_entry_row(&*conn)?;
        let last = self.windows.last_entry_row(&*conn)?;
        let mut items = Vec::new();
        for row in first..=last {
            items.push(AddressedWriteItem::new(
                &shape.name,
                CellAddress::new(glazing_col, row),
                format!("={}{}", glazing_source, row),
            ));
            items.push(AddressedWriteItem::new(
                &shape.name,
                CellAddress::new(frame_col, row),
                format!("={}{}", frame_source, row),
            ));
        }
        write_items(conn, items)?;
        info!(sheet = %shape.name, rows = last - first + 1, "window variants activated");
        Ok(())
    }
}
