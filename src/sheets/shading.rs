//! Shading worksheet

use crate::error::PhppResult;
use crate::locator::SectionLocator;
use crate::model::project::PhxApertureElement;
use crate::rows::shading::shading_row;
use crate::shape::model::PhppShape;
use crate::sheets::{write_table, WriteReport};
use crate::xl::connection::DocumentConnection;
use std::rc::Rc;

/// One shading row per Windows row
pub const SHADING_CAPACITY: usize = 150;

#[derive(Debug)]
pub struct ShadingSheet {
    shape: Rc<PhppShape>,
    rows: SectionLocator,
}

impl ShadingSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let rows = SectionLocator::new(&shape.shading.name, shape.shading.shading_rows.locator.clone());
        Self { shape, rows }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.shading.name
    }

    pub fn rows(&self) -> &SectionLocator {
        &self.rows
    }

    /// Elements must be in the same order as the Windows rows
    pub fn write_shading(
        &self,
        conn: &mut dyn DocumentConnection,
        elements: &[&PhxApertureElement],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.shading;
        write_table(conn, &self.rows, "shaded windows", Some(SHADING_CAPACITY), elements, |row, e| {
            shading_row(shape, row, e)
        })
    }
}
