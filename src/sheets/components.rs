//! Components worksheet: glazings, window frames and ventilation units
//!
//! The three tables sit side by side far to the right of the sheet. Glazings
//! start at fixed rows; frames and ventilators are located by their headers.
//! Each row carries a PHPP id in its first column, and other worksheets refer
//! to a component by `"{id}-{description}"`.

use crate::error::{PhppError, PhppResult};
use crate::locator::SectionLocator;
use crate::model::constructions::PhxConstructionWindow;
use crate::model::mech::PhxVentilator;
use crate::rows::components::{frame_row, glazing_row, ventilator_row};
use crate::shape::model::{InputItem, PhppShape, SectionShape};
use crate::sheets::{find_id_by_name, id_at_row, write_table, IdCache, WriteReport};
use crate::xl::address::{CellAddress, RangeAddress};
use crate::xl::connection::DocumentConnection;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Rows below the first entry searched for names and empty rows
pub const COMPONENT_SEARCH_ROWS: u32 = 500;

/// A glazing already present in the Components worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingGlazing {
    pub display_name: String,
    pub g_value: f64,
    /// In the worksheet's own unit
    pub u_value: f64,
}

impl ExistingGlazing {
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.display_name, self.g_value, self.u_value)
    }
}

#[derive(Debug)]
pub struct ComponentsSheet {
    shape: Rc<PhppShape>,
    glazings: SectionLocator,
    frames: SectionLocator,
    ventilators: SectionLocator,
    glazing_ids: IdCache,
    frame_ids: IdCache,
    ventilator_ids: IdCache,
}

impl ComponentsSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let components = &shape.components;
        let glazings = SectionLocator::fixed(
            &components.name,
            components.glazings.locator.clone(),
            components.glazings.header_start_row,
            components.glazings.entry_start_row,
        );
        let frames = SectionLocator::new(&components.name, components.frames.locator.clone());
        let ventilators = SectionLocator::new(&components.name, components.ventilators.locator.clone());
        Self {
            shape,
            glazings,
            frames,
            ventilators,
            glazing_ids: IdCache::default(),
            frame_ids: IdCache::default(),
            ventilator_ids: IdCache::default(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.components.name
    }

    pub fn glazings(&self) -> &SectionLocator {
        &self.glazings
    }

    pub fn frames(&self) -> &SectionLocator {
        &self.frames
    }

    pub fn ventilators(&self) -> &SectionLocator {
        &self.ventilators
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_glazings(
        &self,
        conn: &mut dyn DocumentConnection,
        windows: &[&PhxConstructionWindow],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.components;
        let report = write_table(conn, &self.glazings, "glazings", None, windows, |row, w| {
            glazing_row(shape, row, w)
        })?;
        self.glazing_ids.clear();
        Ok(report)
    }

    pub fn write_frames(
        &self,
        conn: &mut dyn DocumentConnection,
        windows: &[&PhxConstructionWindow],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.components;
        let report = write_table(conn, &self.frames, "window frames", None, windows, |row, w| {
            frame_row(shape, row, w)
        })?;
        self.frame_ids.clear();
        Ok(report)
    }

    pub fn write_ventilators(
        &self,
        conn: &mut dyn DocumentConnection,
        ventilators: &[&PhxVentilator],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.components;
        let report = write_table(
            conn,
            &self.ventilators,
            "ventilation units",
            None,
            ventilators,
            |row, v| ventilator_row(shape, row, v),
        )?;
        self.ventilator_ids.clear();
        Ok(report)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ID LOOKUPS
    // ═══════════════════════════════════════════════════════════════════════

    fn columns<'s>(
        &'s self,
        locator: &SectionShape,
        id: &'s InputItem,
        description: &'s InputItem,
    ) -> PhppResult<(&'s str, &'s str)> {
        let sheet = self.sheet_name();
        let marker = &locator.header.locator_string_header;
        Ok((
            id.column_for("id", sheet, marker)?,
            description.column_for("description", sheet, marker)?,
        ))
    }

    fn search_rows(&self, conn: &dyn DocumentConnection, locator: &SectionLocator) -> PhppResult<(u32, u32)> {
        let first = locator.first_entry_row(conn)?;
        Ok((first, first + COMPONENT_SEARCH_ROWS - 1))
    }

    /// `"{id}-{name}"` of the glazing with this description, if present
    pub fn glazing_id_by_name(
        &self,
        conn: &dyn DocumentConnection,
        name: &str,
        use_cache: bool,
    ) -> PhppResult<Option<String>> {
        let g = &self.shape.components.glazings;
        let (id_col, name_col) = self.columns(&g.locator, &g.inputs.id, &g.inputs.description)?;
        self.glazing_ids.lookup(name, use_cache, || {
            let rows = self.search_rows(conn, &self.glazings)?;
            find_id_by_name(conn, self.sheet_name(), name_col, id_col, rows, name)
        })
    }

    /// `"{id}-{name}"` of the frame with this description
    pub fn frame_id_by_name(
        &self,
        conn: &dyn DocumentConnection,
        name: &str,
        use_cache: bool,
    ) -> PhppResult<String> {
        let f = &self.shape.components.frames;
        let (id_col, name_col) = self.columns(&f.locator, &f.inputs.id, &f.inputs.description)?;
        let found = self.frame_ids.lookup(name, use_cache, || {
            let rows = self.search_rows(conn, &self.frames)?;
            find_id_by_name(conn, self.sheet_name(), name_col, id_col, rows, name)
        })?;
        found.ok_or_else(|| self.not_found("window frame", name, name_col))
    }

    /// `"{id}-{name}"` of the ventilation unit with this name
    pub fn ventilator_id_by_name(
        &self,
        conn: &dyn DocumentConnection,
        name: &str,
        use_cache: bool,
    ) -> PhppResult<String> {
        let v = &self.shape.components.ventilators;
        let (id_col, name_col) = self.columns(&v.locator, &v.inputs.id, &v.inputs.display_name)?;
        let found = self.ventilator_ids.lookup(name, use_cache, || {
            let rows = self.search_rows(conn, &self.ventilators)?;
            find_id_by_name(conn, self.sheet_name(), name_col, id_col, rows, name)
        })?;
        found.ok_or_else(|| self.not_found("ventilation unit", name, name_col))
    }

    fn not_found(&self, kind: &'static str, name: &str, column: &str) -> PhppError {
        PhppError::ReferenceNotFound {
            kind,
            name: name.to_string(),
            sheet: self.sheet_name().to_string(),
            column: column.to_string(),
        }
    }

    pub fn glazing_id_by_row(&self, conn: &dyn DocumentConnection, row: u32) -> PhppResult<String> {
        let g = &self.shape.components.glazings;
        let (id_col, name_col) = self.columns(&g.locator, &g.inputs.id, &g.inputs.description)?;
        id_at_row(conn, self.sheet_name(), name_col, id_col, row)
    }

    pub fn frame_id_by_row(&self, conn: &dyn DocumentConnection, row: u32) -> PhppResult<String> {
        let f = &self.shape.components.frames;
        let (id_col, name_col) = self.columns(&f.locator, &f.inputs.id, &f.inputs.description)?;
        id_at_row(conn, self.sheet_name(), name_col, id_col, row)
    }

    pub fn ventilator_id_by_row(&self, conn: &dyn DocumentConnection, row: u32) -> PhppResult<String> {
        let v = &self.shape.components.ventilators;
        let (id_col, name_col) = self.columns(&v.locator, &v.inputs.id, &v.inputs.display_name)?;
        id_at_row(conn, self.sheet_name(), name_col, id_col, row)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EXISTING DATA
    // ═══════════════════════════════════════════════════════════════════════

    fn first_empty(
        &self,
        conn: &dyn DocumentConnection,
        locator: &SectionLocator,
        column: &str,
    ) -> PhppResult<u32> {
        let (start, end) = self.search_rows(conn, locator)?;
        let data = conn.get_single_column_data(self.sheet_name(), column, start, end)?;
        data.iter()
            .position(|v| v.is_blank())
            .map(|i| start + i as u32)
            .ok_or_else(|| PhppError::SectionMarkerNotFound {
                marker: format!("empty row below '{}'", locator.marker()),
                sheet: self.sheet_name().to_string(),
                column: column.to_string(),
            })
    }

    /// First glazing row without a description
    pub fn first_empty_glazing_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        let g = &self.shape.components.glazings;
        let (_, name_col) = self.columns(&g.locator, &g.inputs.id, &g.inputs.description)?;
        self.first_empty(conn, &self.glazings, name_col)
    }

    /// First frame row without a description
    pub fn first_empty_frame_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        let f = &self.shape.components.frames;
        let (_, name_col) = self.columns(&f.locator, &f.inputs.id, &f.inputs.description)?;
        self.first_empty(conn, &self.frames, name_col)
    }

    /// Every complete glazing row, de-duplicated and sorted by key
    pub fn all_glazing_types(&self, conn: &dyn DocumentConnection) -> PhppResult<Vec<ExistingGlazing>> {
        let g = &self.shape.components.glazings;
        let sheet = self.sheet_name();
        let marker = &g.locator.header.locator_string_header;
        let name_col = g.inputs.description.column_for("description", sheet, marker)?;
        let u_col = g.inputs.u_value.column_for("u_value", sheet, marker)?;
        let (start, end) = self.search_rows(conn, &self.glazings)?;

        let range = RangeAddress::new(CellAddress::new(name_col, start), CellAddress::new(u_col, end));
        let mut found = BTreeMap::new();
        for row in conn.get_data(sheet, &range)? {
            let (Some(name), Some(g_value), Some(u_value)) = (row.first(), row.get(1), row.get(2)) else {
                continue;
            };
            if name.is_blank() {
                continue;
            }
            let (Some(g_value), Some(u_value)) = (g_value.as_f64(), u_value.as_f64()) else {
                continue;
            };
            let glazing = ExistingGlazing {
                display_name: name.to_string(),
                g_value,
                u_value,
            };
            found.insert(glazing.key(), glazing);
        }
        Ok(found.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::constructions::PhxWindowFrameElement;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::memory::MemoryWorkbook;
    use crate::xl::value::CellValue;

    fn sheet() -> ComponentsSheet {
        ComponentsSheet::new(Rc::new(ShapeCatalog::Embedded.load("EN_10_6.json").unwrap()))
    }

    fn workbook() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.set("Components", "IE14", "Glazing").unwrap();
        wb.set("Components", "IL14", "Window frames").unwrap();
        wb.set("Components", "JN14", "Ventilation units").unwrap();
        for i in 1..=20 {
            let row = 15 + i;
            wb.set("Components", &format!("IE{}", row), i as f64).unwrap();
            wb.set("Components", &format!("IL{}", row), i as f64).unwrap();
            wb.set("Components", &format!("JN{}", row), i as f64).unwrap();
        }
        wb
    }

    fn window(name: &str) -> PhxConstructionWindow {
        PhxConstructionWindow {
            id_num: 1,
            display_name: name.to_string(),
            glazing_type_display_name: format!("{} glass", name),
            frame_type_display_name: format!("{} frame", name),
            glass_g_value: 0.5,
            u_value_glass: 0.6,
            frame_left: PhxWindowFrameElement::default(),
            frame_right: PhxWindowFrameElement::default(),
            frame_bottom: PhxWindowFrameElement::default(),
            frame_top: PhxWindowFrameElement::default(),
        }
    }

    #[test]
    fn test_glazings_start_at_fixed_row() {
        let mut wb = workbook();
        let components = sheet();
        let a = window("A");
        let b = window("B");
        components.write_glazings(&mut wb, &[&a, &b]).unwrap();
        assert_eq!(wb.get("Components", "IF16").unwrap(), CellValue::text("A glass"));
        assert_eq!(wb.get("Components", "IF17").unwrap(), CellValue::text("B glass"));
        assert_eq!(components.first_empty_glazing_row(&wb).unwrap(), 18);
        assert_eq!(components.glazing_id_by_row(&wb, 17).unwrap(), "2-B glass");
    }

    #[test]
    fn test_frame_lookup_required_glazing_optional() {
        let mut wb = workbook();
        let components = sheet();
        let a = window("A");
        components.write_frames(&mut wb, &[&a]).unwrap();
        assert_eq!(components.frame_id_by_name(&wb, "A frame", true).unwrap(), "1-A frame");
        assert!(matches!(
            components.frame_id_by_name(&wb, "Missing", true),
            Err(PhppError::ReferenceNotFound { kind: "window frame", .. })
        ));
        assert_eq!(components.glazing_id_by_name(&wb, "Missing", true).unwrap(), None);
    }

    #[test]
    fn test_all_glazing_types_skips_incomplete_rows() {
        let mut wb = workbook();
        wb.set("Components", "IF16", "Double").unwrap();
        wb.set("Components", "IG16", 0.6).unwrap();
        wb.set("Components", "IH16", 1.1).unwrap();
        wb.set("Components", "IF17", "Half").unwrap();
        wb.set("Components", "IF18", "Double").unwrap();
        wb.set("Components", "IG18", 0.6).unwrap();
        wb.set("Components", "IH18", 1.1).unwrap();
        let types = sheet().all_glazing_types(&wb).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].display_name, "Double");
    }

    #[test]
    fn test_ventilator_lookup() {
        let mut wb = workbook();
        let components = sheet();
        let ventilator = PhxVentilator {
            id_num: 1,
            display_name: "ERV".to_string(),
            quantity: 1,
            sensible_heat_recovery: 0.8,
            latent_heat_recovery: 0.0,
            electric_efficiency: 0.45,
            frost_protection_reqd: true,
            temperature_below_defrost_used: -5.0,
        };
        components.write_ventilators(&mut wb, &[&ventilator]).unwrap();
        assert_eq!(components.ventilator_id_by_name(&wb, "ERV", false).unwrap(), "1-ERV");
        assert_eq!(components.ventilator_id_by_row(&wb, 16).unwrap(), "1-ERV");
    }
}
