//! Electricity worksheet: residential appliances
//!
//! Every appliance kind maps onto fixed rows of the sheet. Kinds without a
//! residential row (lighting, miscellaneous and custom loads) write nothing.

use crate::error::{PhppError, PhppResult};
use crate::model::elec::ElecDevice;
use crate::shape::model::{ElectricityInputRow, ElectricityShape};
use crate::xl::address::CellAddress;
use crate::xl::item::AddressedWriteItem;
use crate::xl::value::CellValue;

/// Kind of the gas exhaust-air dryer; its consumption goes on the selection row
const GAS_DRYER_TYPE: u32 = 6;

struct Writer<'a> {
    shape: &'a ElectricityShape,
    items: Vec<AddressedWriteItem>,
}

impl Writer<'_> {
    fn cell(&mut self, column: &str, row: u32, value: impl Into<CellValue>) {
        self.items.push(AddressedWriteItem::new(
            self.shape.name.as_str(),
            CellAddress::new(column, row),
            Into::<CellValue>::into(value),
        ));
    }

    fn used(&mut self, row: &ElectricityInputRow) {
        let shape = self.shape;
        self.cell(&shape.input_columns.used, row.data, 1.0);
    }

    fn in_conditioned_space(&mut self, row: &ElectricityInputRow, inside: bool) {
        let shape = self.shape;
        self.cell(&shape.input_columns.in_conditioned_space, row.data, if inside { "1" } else { "0" });
    }

    fn demand(&mut self, row: u32, value: f64) {
        let shape = self.shape;
        self.cell(&shape.input_columns.energy_demand_per_use, row, value);
    }

    fn selection(&mut self, device: &ElecDevice, row: &ElectricityInputRow, option: u32) -> PhppResult<()> {
        let key = option.to_string();
        let text = row
            .selection_options
            .get(&key)
            .cloned()
            .ok_or_else(|| PhppError::UnsupportedDeviceType {
                device: device.kind().to_string(),
                option: key,
            })?;
        let shape = self.shape;
        self.cell(&shape.input_columns.selection, row.selection, text);
        Ok(())
    }
}

/// Items for one appliance
pub fn device_items(shape: &ElectricityShape, device: &ElecDevice) -> PhppResult<Vec<AddressedWriteItem>> {
    let rows = &shape.input_rows;
    let mut w = Writer {
        shape,
        items: Vec::new(),
    };

    match device {
        ElecDevice::Dishwasher(d) | ElecDevice::ClothesWasher(d) => {
            let row = match device {
                ElecDevice::Dishwasher(_) => &rows.dishwasher,
                _ => &rows.clothes_washing,
            };
            w.used(row);
            w.in_conditioned_space(row, d.in_conditioned_space);
            w.demand(row.data, d.energy_demand_per_use);
            w.selection(device, row, d.water_connection)?;
        }
        ElecDevice::ClothesDryer(d) => {
            let row = &rows.clothes_drying;
            w.in_conditioned_space(row, d.in_conditioned_space);
            w.selection(device, row, d.dryer_type)?;
            if d.dryer_type == GAS_DRYER_TYPE {
                w.demand(row.selection, d.gas_consumption);
            } else {
                w.demand(row.data, d.energy_demand_per_use);
            }
        }
        ElecDevice::Refrigerator(d) | ElecDevice::FridgeFreezer(d) => {
            let row = match device {
                ElecDevice::Refrigerator(_) => &rows.refrigerator,
                _ => &rows.fridge_freezer,
            };
            w.used(row);
            w.demand(row.data, d.energy_demand_per_use);
        }
        ElecDevice::Freezer(d) => {
            let row = &rows.freezer;
            w.used(row);
            w.in_conditioned_space(row, d.in_conditioned_space);
            w.demand(row.data, d.energy_demand_per_use);
        }
        ElecDevice::Cooktop(d) => {
            let row = &rows.cooking;
            w.demand(row.data, d.energy_demand_per_use);
            w.selection(device, row, d.cooktop_type)?;
        }
        ElecDevice::Mel(_)
        | ElecDevice::LightingInterior(_)
        | ElecDevice::LightingExterior(_)
        | ElecDevice::LightingGarage(_)
        | ElecDevice::CustomElec(_)
        | ElecDevice::CustomLighting(_)
        | ElecDevice::CustomMel(_) => {}
    }

    Ok(w.items)
}

/// `used = 0` on every row that an appliance switches on
pub fn reset_items(shape: &ElectricityShape) -> Vec<AddressedWriteItem> {
    shape
        .input_rows
        .resettable()
        .iter()
        .map(|(_, row)| {
            AddressedWriteItem::new(
                shape.name.as_str(),
                CellAddress::new(shape.input_columns.used.as_str(), row.data),
                0.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elec::{ClothesDryer, Cooktop, OtherDevice};
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::WriteValue;

    fn shape() -> ElectricityShape {
        ShapeCatalog::Embedded.load("EN_10_6.json").unwrap().electricity
    }

    #[test]
    fn test_gas_dryer_writes_on_selection_row() {
        let dryer = ElecDevice::ClothesDryer(ClothesDryer {
            in_conditioned_space: true,
            energy_demand_per_use: 3.5,
            dryer_type: 6,
            gas_consumption: 2.0,
        });
        let items = device_items(&shape(), &dryer).unwrap();
        let demand = items.iter().find(|i| i.column() == "L").unwrap();
        assert_eq!(demand.row(), 20);
        assert_eq!(demand.value, WriteValue::Scalar(CellValue::Number(2.0)));
    }

    #[test]
    fn test_electric_dryer_writes_on_data_row() {
        let dryer = ElecDevice::ClothesDryer(ClothesDryer {
            dryer_type: 4,
            energy_demand_per_use: 3.5,
            ..Default::default()
        });
        let items = device_items(&shape(), &dryer).unwrap();
        let demand = items.iter().find(|i| i.column() == "L").unwrap();
        assert_eq!(demand.row(), 19);
    }

    #[test]
    fn test_unknown_selection_fails() {
        let cooktop = ElecDevice::Cooktop(Cooktop {
            energy_demand_per_use: 0.2,
            cooktop_type: 9,
        });
        match device_items(&shape(), &cooktop) {
            Err(PhppError::UnsupportedDeviceType { device, option }) => {
                assert_eq!(device, "cooktop");
                assert_eq!(option, "9");
            }
            other => panic!("expected UnsupportedDeviceType, got {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_kinds_write_nothing() {
        let lighting = ElecDevice::LightingInterior(OtherDevice::default());
        assert!(device_items(&shape(), &lighting).unwrap().is_empty());
    }

    #[test]
    fn test_reset_rows() {
        let items = reset_items(&shape());
        let rows: Vec<u32> = items.iter().map(|i| i.row()).collect();
        assert_eq!(rows, vec![15, 17, 21, 22, 23, 28, 29]);
    }
}
