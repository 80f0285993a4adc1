//! Ventilation worksheet: system type, airtightness and building volume

use crate::error::PhppResult;
use crate::locator::locate_input;
use crate::model::project::PhBuildingData;
use crate::shape::model::{LocatedInput, PhppShape};
use crate::sheets::{located_item, located_unit_item, write_items};
use crate::xl::connection::DocumentConnection;
use crate::xl::item::AddressedWriteItem;
use std::rc::Rc;
use tracing::info;

/// The only system type written; PHX carries no ventilation type of its own
pub const BALANCED_HR_VENTILATION: &str = "1-Balanced PH ventilation with HR";

#[derive(Debug)]
pub struct VentilationSheet {
    shape: Rc<PhppShape>,
}

impl VentilationSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        Self { shape }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.ventilation.name
    }

    /// Balanced ventilation, with the multiple-units worksheet switched on
    pub fn write_ventilation_type(&self, conn: &mut dyn DocumentConnection) -> PhppResult<()> {
        let v = &self.shape.ventilation;
        let read = &*conn;
        let items = vec![
            located_item(read, &v.name, &v.vent_type, BALANCED_HR_VENTILATION)?,
            located_item(read, &v.name, &v.multi_unit_on, "x")?,
        ];
        write_items(conn, items)?;
        info!(sheet = %v.name, "ventilation type written");
        Ok(())
    }

    /// Wind protection coefficients and the n50 air change rate
    pub fn write_airtightness(&self, conn: &mut dyn DocumentConnection, data: &PhBuildingData) -> PhppResult<()> {
        let v = &self.shape.ventilation;
        let read = &*conn;
        let items = vec![
            located_item(read, &v.name, &v.wind_coeff_e, data.wind_coefficient_e)?,
            located_item(read, &v.name, &v.wind_coeff_f, data.wind_coefficient_f)?,
            located_item(read, &v.name, &v.airtightness_n50, data.airtightness_n50)?,
        ];
        write_items(conn, items)?;
        info!(sheet = %v.name, n50 = data.airtightness_n50, "airtightness written");
        Ok(())
    }

    /// Net building volume (Vn50), given in M3
    pub fn write_volume(&self, conn: &mut dyn DocumentConnection, net_volume: f64) -> PhppResult<()> {
        let v = &self.shape.ventilation;
        let item = located_unit_item(&*conn, &v.name, &v.airtightness_vn50, net_volume, "M3")?;
        write_items(conn, vec![item])
    }

    /// Link the system type and n50 to their values in the variants column
    pub fn activate_variants(&self, conn: &mut dyn DocumentConnection) -> PhppResult<()> {
        let v = &self.shape.ventilation;
        let read = &*conn;
        let items = vec![
            self.variant_link(read, &v.vent_type)?,
            self.variant_link(read, &v.airtightness_n50)?,
        ];
        write_items(conn, items)?;
        info!(sheet = %v.name, column = %v.variants_col, "ventilation linked to variants");
        Ok(())
    }

    fn variant_link(&self, conn: &dyn DocumentConnection, input: &LocatedInput) -> PhppResult<AddressedWriteItem> {
        let v = &self.shape.ventilation;
        let address = locate_input(conn, &v.name, input)?;
        let formula = format!("={}{}", v.variants_col, address.row);
        Ok(AddressedWriteItem::new(v.name.as_str(), address, formula))
    }
}
