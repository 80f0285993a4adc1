//! Electricity worksheet

use crate::error::PhppResult;
use crate::model::elec::ElecDevice;
use crate::rows::electricity::{device_items, reset_items};
use crate::shape::model::PhppShape;
use crate::sheets::write_items;
use crate::xl::connection::DocumentConnection;
use std::rc::Rc;
use tracing::info;

#[derive(Debug)]
pub struct ElectricitySheet {
    shape: Rc<PhppShape>,
}

impl ElectricitySheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        Self { shape }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.electricity.name
    }

    /// Switch off every appliance row, then write `devices` over it
    pub fn write_equipment(&self, conn: &mut dyn DocumentConnection, devices: &[&ElecDevice]) -> PhppResult<()> {
        let shape = &self.shape.electricity;
        write_items(conn, reset_items(shape))?;
        for device in devices {
            write_items(conn, device_items(shape, device)?)?;
        }
        info!(sheet = %shape.name, devices = devices.len(), "appliances written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elec::{Cooling, WaterConnectedAppliance};
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::memory::MemoryWorkbook;
    use crate::xl::value::CellValue;

    #[test]
    fn test_unused_rows_switched_off() {
        let mut wb = MemoryWorkbook::new();
        wb.add_sheet("Electricity");
        let sheet = ElectricitySheet::new(Rc::new(ShapeCatalog::Embedded.load("EN_10_6.json").unwrap()));
        let dishwasher = ElecDevice::Dishwasher(WaterConnectedAppliance {
            in_conditioned_space: true,
            energy_demand_per_use: 1.1,
            water_connection: 2,
        });
        let fridge = ElecDevice::Refrigerator(Cooling {
            in_conditioned_space: true,
            energy_demand_per_use: 0.8,
        });

        sheet.write_equipment(&mut wb, &[&dishwasher]).unwrap();
        assert_eq!(wb.get("Electricity", "H15").unwrap(), CellValue::Number(1.0));
        assert_eq!(wb.get("Electricity", "D16").unwrap(), CellValue::text("2-Cold water connection"));
        assert_eq!(wb.get("Electricity", "H17").unwrap(), CellValue::Number(0.0));

        sheet.write_equipment(&mut wb, &[&fridge]).unwrap();
        assert_eq!(wb.get("Electricity", "H15").unwrap(), CellValue::Number(0.0));
    }
}
