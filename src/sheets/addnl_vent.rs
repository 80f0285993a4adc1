//! Additional Vent worksheet: ventilation units, rooms and duct runs
//!
//! Rooms and ducts refer to a ventilation unit by its number in the units
//! table, not by the Components id. The unit number is found by looking up
//! which units row selected a given Components ventilator.

use crate::error::{PhppError, PhppResult};
use crate::locator::SectionLocator;
use crate::model::mech::{PhxDuct, PhxVentilator};
use crate::model::project::{PhxSpace, VentilationPattern};
use crate::rows::addnl_vent::{duct_row, vent_space_row, vent_unit_row};
use crate::shape::model::PhppShape;
use crate::sheets::{write_items, write_table, WriteReport};
use crate::xl::address::CellAddress;
use crate::xl::connection::{read_cell, DocumentConnection};
use crate::xl::item::AddressedWriteItem;
use std::rc::Rc;
use tracing::info;

pub const VENT_UNIT_CAPACITY: usize = 10;
pub const VENT_SPACE_CAPACITY: usize = 30;
pub const DUCT_CAPACITY: usize = 20;

/// Rows below the first unit row searched for a selected ventilator
pub const UNIT_SEARCH_ROWS: u32 = 25;

/// A units row: the ventilator and the `"{id}-{name}"` of its Components row
#[derive(Debug, Clone)]
pub struct VentUnitInput<'a> {
    pub ventilator: &'a PhxVentilator,
    pub ventilator_id: String,
}

/// A rooms row and the unit number of the ventilator serving it
#[derive(Debug, Clone)]
pub struct SpaceInput<'a> {
    pub space: &'a PhxSpace,
    pub pattern: VentilationPattern,
    pub unit_number: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct DuctInput<'a> {
    pub duct: &'a PhxDuct,
    pub unit_number: u32,
}

#[derive(Debug)]
pub struct AddnlVentSheet {
    shape: Rc<PhppShape>,
    rooms: SectionLocator,
    units: SectionLocator,
    ducts: SectionLocator,
}

impl AddnlVentSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let vent = &shape.addnl_vent;
        let rooms = SectionLocator::new(&vent.name, vent.rooms.locator.clone());
        let units = SectionLocator::new(&vent.name, vent.units.locator.clone());
        let ducts = SectionLocator::new(&vent.name, vent.ducts.locator.clone());
        Self {
            shape,
            rooms,
            units,
            ducts,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.addnl_vent.name
    }

    pub fn rooms(&self) -> &SectionLocator {
        &self.rooms
    }

    pub fn units(&self) -> &SectionLocator {
        &self.units
    }

    pub fn ducts(&self) -> &SectionLocator {
        &self.ducts
    }

    pub fn write_vent_units(
        &self,
        conn: &mut dyn DocumentConnection,
        units: &[VentUnitInput<'_>],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.addnl_vent;
        write_table(
            conn,
            &self.units,
            "ventilation units",
            Some(VENT_UNIT_CAPACITY),
            units,
            |row, u| vent_unit_row(shape, row, u.ventilator, &u.ventilator_id),
        )
    }

    pub fn write_spaces(
        &self,
        conn: &mut dyn DocumentConnection,
        spaces: &[SpaceInput<'_>],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.addnl_vent;
        write_table(conn, &self.rooms, "rooms", Some(VENT_SPACE_CAPACITY), spaces, |row, s| {
            vent_space_row(shape, row, s.space, &s.pattern, s.unit_number)
        })
    }

    pub fn write_ducts(
        &self,
        conn: &mut dyn DocumentConnection,
        ducts: &[DuctInput<'_>],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.addnl_vent;
        write_table(conn, &self.ducts, "ducts", Some(DUCT_CAPACITY), ducts, |row, d| {
            duct_row(shape, row, d.duct, d.unit_number)
        })
    }

    /// Number of the units row that selected the Components ventilator
    /// `ventilator_id` (`"{id}-{name}"`)
    pub fn vent_unit_number_by_id(
        &self,
        conn: &dyn DocumentConnection,
        ventilator_id: &str,
    ) -> PhppResult<u32> {
        let shape = &self.shape.addnl_vent;
        let inputs = &shape.units.inputs;
        let marker = shape.units.marker();
        let selected_col = inputs.unit_selected.column_for("unit_selected", &shape.name, marker)?;
        let number_col = inputs.unit_number.column_for("unit_number", &shape.name, marker)?;

        let first = self.units.first_entry_row(conn)?;
        let row = conn
            .get_row_num_of_value_in_column(
                &shape.name,
                first,
                first + UNIT_SEARCH_ROWS - 1,
                selected_col,
                ventilator_id,
            )?
            .ok_or_else(|| PhppError::ReferenceNotFound {
                kind: "ventilation unit",
                name: ventilator_id.to_string(),
                sheet: shape.name.clone(),
                column: selected_col.to_string(),
            })?;

        let number = read_cell(conn, &shape.name, number_col, row)?;
        number
            .as_f64()
            .map(|n| n as u32)
            .ok_or_else(|| PhppError::ReferenceNotFound {
                kind: "ventilation unit number",
                name: ventilator_id.to_string(),
                sheet: shape.name.clone(),
                column: number_col.to_string(),
            })
    }

    /// Make every units row select the ventilator chosen in `source`, the
    /// Variants cell of the active ventilation unit
    pub fn activate_variants(
        &self,
        conn: &mut dyn DocumentConnection,
        variants_sheet: &str,
        source: &CellAddress,
    ) -> PhppResult<()> {
        let shape = &self.shape.addnl_vent;
        let selected_col = shape
            .units
            .inputs
            .unit_selected
            .column_for("unit_selected", &shape.name, shape.units.marker())?;
        let first = self.units.first_entry_row(&*conn)?;
        let last = self.units.last_entry_row(&*conn)?;
        let formula = format!("='{}'!{}", variants_sheet, source);
        let items = (first..=last)
            .map(|row| {
                AddressedWriteItem::new(&shape.name, CellAddress::new(selected_col, row), formula.as_str())
            })
            .collect();
        write_items(conn, items)?;
        info!(sheet = %shape.name, source = %formula, "ventilation unit variants activated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::memory::MemoryWorkbook;
    use crate::xl::value::CellValue;

    fn sheet() -> AddnlVentSheet {
        AddnlVentSheet::new(Rc::new(ShapeCatalog::Embedded.load("EN_10_6.json").unwrap()))
    }

    fn workbook() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.set("Additional Vent", "B10", "Dimensioning of ventilation systems").unwrap();
        for i in 1..=30 {
            wb.set("Additional Vent", &format!("D{}", 11 + i), i as f64).unwrap();
        }
        wb.set("Additional Vent", "B50", "Ventilation units / Heat recovery").unwrap();
        for i in 1..=10 {
            wb.set("Additional Vent", &format!("D{}", 51 + i), i as f64).unwrap();
        }
        wb.set("Additional Vent", "B70", "Duct insulation").unwrap();
        wb.set("Additional Vent", "B99", "Total").unwrap();
        wb
    }

    fn ventilator(name: &str) -> PhxVentilator {
        PhxVentilator {
            id_num: 1,
            display_name: name.to_string(),
            quantity: 1,
            sensible_heat_recovery: 0.8,
            latent_heat_recovery: 0.0,
            electric_efficiency: 0.45,
            frost_protection_reqd: true,
            temperature_below_defrost_used: -5.0,
        }
    }

    #[test]
    fn test_locations() {
        let wb = workbook();
        let vent = sheet();
        assert_eq!(vent.rooms().first_entry_row(&wb).unwrap(), 12);
        assert_eq!(vent.rooms().last_entry_row(&wb).unwrap(), 41);
        assert_eq!(vent.units().first_entry_row(&wb).unwrap(), 52);
        assert_eq!(vent.units().last_entry_row(&wb).unwrap(), 61);
        assert_eq!(vent.ducts().first_entry_row(&wb).unwrap(), 79);
        assert_eq!(vent.ducts().last_entry_row(&wb).unwrap(), 98);
    }

    #[test]
    fn test_unit_number_from_selected_ventilator() {
        let mut wb = workbook();
        let vent = sheet();
        let a = ventilator("A");
        let b = ventilator("B");
        let units = vec![
            VentUnitInput {
                ventilator: &a,
                ventilator_id: "1-A".to_string(),
            },
            VentUnitInput {
                ventilator: &b,
                ventilator_id: "2-B".to_string(),
            },
        ];
        vent.write_vent_units(&mut wb, &units).unwrap();
        assert_eq!(wb.get("Additional Vent", "F53").unwrap(), CellValue::text("B"));
        assert_eq!(vent.vent_unit_number_by_id(&wb, "2-B").unwrap(), 2);
        assert!(matches!(
            vent.vent_unit_number_by_id(&wb, "3-C"),
            Err(PhppError::ReferenceNotFound { kind: "ventilation unit", .. })
        ));
    }

    #[test]
    fn test_duct_assigned_to_unit_column() {
        let mut wb = workbook();
        let vent = sheet();
        let duct = PhxDuct {
            quantity: 1,
            diameter_mm: 160.0,
            insulation_thickness_mm: 25.0,
            insulation_conductivity: 0.04,
            insulation_reflective: false,
            supply_air_length: 3.0,
            outdoor_air_length: 2.0,
            ventilator_id_num: 1,
        };
        vent.write_ducts(&mut wb, &[DuctInput { duct: &duct, unit_number: 2 }]).unwrap();
        assert_eq!(wb.get("Additional Vent", "R79").unwrap(), CellValue::text("x"));
        assert_eq!(wb.get("Additional Vent", "Q79").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_activate_variants() {
        let mut wb = workbook();
        let vent = sheet();
        vent.activate_variants(&mut wb, "Variants", &CellAddress::new("E", 305)).unwrap();
        assert_eq!(wb.get("Additional Vent", "G52").unwrap(), CellValue::text("='Variants'!E305"));
        assert_eq!(wb.get("Additional Vent", "G61").unwrap(), CellValue::text("='Variants'!E305"));
        assert_eq!(wb.get("Additional Vent", "G62").unwrap(), CellValue::Empty);
    }
}
