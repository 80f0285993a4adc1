//! U-Values worksheet: one constructor block per opaque assembly

use crate::error::{PhppError, PhppResult};
use crate::model::constructions::PhxConstructionOpaque;
use crate::shape::model::{ConstructorInputs, InputItem, UValuesShape};
use crate::xl::address::CellAddress;
use crate::xl::item::AddressedWriteItem;
use crate::xl::value::CellValue;

/// The three material sections of a layer row: (description, conductivity,
/// percentage). Section 1 has no percentage cell.
fn sections(inputs: &ConstructorInputs) -> [(&InputItem, &InputItem, Option<&InputItem>); 3] {
    [
        (&inputs.sec_1_description, &inputs.sec_1_conductivity, None),
        (
            &inputs.sec_2_description,
            &inputs.sec_2_conductivity,
            Some(&inputs.sec_2_percentage),
        ),
        (
            &inputs.sec_3_description,
            &inputs.sec_3_conductivity,
            Some(&inputs.sec_3_percentage),
        ),
    ]
}

struct Block<'a> {
    sheet: &'a str,
    marker: &'a str,
    start_row: u32,
    items: Vec<AddressedWriteItem>,
}

impl<'a> Block<'a> {
    fn push(
        &mut self,
        field: &str,
        input: &InputItem,
        row: u32,
        value: impl Into<CellValue>,
        native_unit: Option<&str>,
    ) -> PhppResult<()> {
        let column = input.column_for(field, self.sheet, self.marker)?;
        let mut item = AddressedWriteItem::new(self.sheet, CellAddress::new(column, row), Into::<CellValue>::into(value));
        if let Some(unit) = native_unit {
            item = item.with_units(unit, input.unit());
        }
        self.items.push(item);
        Ok(())
    }
}

/// Number of layer rows in one constructor block
pub fn layer_slots(inputs: &ConstructorInputs) -> usize {
    (inputs.last_layer_row_offset.saturating_sub(inputs.first_layer_row_offset) + 1) as usize
}

/// Name, Rsi/Rse and layers of `construction` for the block at `start_row`.
///
/// Rsi and Rse are always 0: surface resistances come from the PHPP's own
/// defaults for the surface group. Mass layers are skipped.
pub fn constructor_items(
    shape: &UValuesShape,
    start_row: u32,
    construction: &PhxConstructionOpaque,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.constructor.inputs;
    let mut block = Block {
        sheet: &shape.name,
        marker: &shape.constructor.locator_string_header,
        start_row,
        items: Vec::new(),
    };

    block.push(
        "display_name",
        &inputs.display_name,
        start_row + inputs.name_row_offset,
        construction.display_name.as_str(),
        None,
    )?;
    block.push("r_si", &inputs.r_si, start_row + inputs.rsi_row_offset, 0.0, Some("M2K/W"))?;
    block.push("r_se", &inputs.r_se, start_row + inputs.rse_row_offset, 0.0, Some("M2K/W"))?;

    let layers: Vec<_> = construction.non_mass_layers().collect();
    if layers.len() > layer_slots(inputs) {
        return Err(PhppError::CapacityExceeded {
            kind: "layers in one assembly",
            sheet: shape.name.clone(),
            count: layers.len(),
            capacity: layer_slots(inputs),
        });
    }

    for (i, layer) in layers.iter().enumerate() {
        let row = block.start_row + inputs.first_layer_row_offset + i as u32;
        block.push("thickness", &inputs.thickness, row, layer.thickness_mm, Some("MM"))?;

        let slots = sections(inputs);
        if layer.materials.len() > slots.len() {
            return Err(PhppError::CapacityExceeded {
                kind: "materials in one layer",
                sheet: shape.name.clone(),
                count: layer.materials.len(),
                capacity: slots.len(),
            });
        }
        for (j, (material, (description, conductivity, percentage))) in
            layer.materials.iter().zip(slots).enumerate()
        {
            let sec = j + 1;
            block.push(
                &format!("sec_{}_description", sec),
                description,
                row,
                material.display_name.as_str(),
                None,
            )?;
            block.push(
                &format!("sec_{}_conductivity", sec),
                conductivity,
                row,
                material.conductivity,
                Some("W/MK"),
            )?;
            if let Some(percentage) = percentage {
                let field = format!("sec_{}_percentage", sec);
                let offset = percentage.row_for(&field, block.sheet, block.marker)?;
                let percentage_row = (block.start_row as i64 + offset as i64).max(1) as u32;
                block.push(
                    &field,
                    percentage,
                    percentage_row,
                    material.percentage_of_assembly,
                    None,
                )?;
            }
        }
    }

    Ok(block.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::constructions::{PhxLayer, PhxMaterial, MASS_MATERIAL_NAME};
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::WriteValue;

    fn material(name: &str, conductivity: f64, share: f64) -> PhxMaterial {
        PhxMaterial {
            display_name: name.to_string(),
            conductivity,
            percentage_of_assembly: share,
        }
    }

    #[test]
    fn test_constructor_block_layout() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let construction = PhxConstructionOpaque {
            id_num: 1,
            display_name: "Exterior wall".to_string(),
            layers: vec![
                PhxLayer {
                    thickness_mm: 100.0,
                    materials: vec![material(MASS_MATERIAL_NAME, 100.0, 1.0)],
                },
                PhxLayer {
                    thickness_mm: 140.0,
                    materials: vec![
                        material("Mineral wool", 0.035, 0.85),
                        material("Stud", 0.13, 0.15),
                    ],
                },
            ],
        };
        let items = constructor_items(&shape.u_values, 100, &construction).unwrap();

        let name = &items[0];
        assert_eq!(name.address, CellAddress::new("M", 102));
        assert_eq!(name.value, WriteValue::Scalar(CellValue::text("Exterior wall")));

        let thickness = items.iter().find(|i| i.column() == "R").unwrap();
        assert_eq!(thickness.row(), 108);

        let stud = items
            .iter()
            .find(|i| i.value == WriteValue::Scalar(CellValue::text("Stud")))
            .unwrap();
        assert_eq!(stud.address, CellAddress::new("N", 108));
        let share = items
            .iter()
            .find(|i| i.value == WriteValue::Scalar(CellValue::Number(0.15)))
            .unwrap();
        assert_eq!(share.row(), 117);
    }

    #[test]
    fn test_too_many_layers() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let layer = PhxLayer {
            thickness_mm: 10.0,
            materials: vec![material("Board", 0.1, 1.0)],
        };
        let construction = PhxConstructionOpaque {
            id_num: 1,
            display_name: "Thick".to_string(),
            layers: vec![layer; 9],
        };
        assert!(matches!(
            constructor_items(&shape.u_values, 1, &construction),
            Err(PhppError::CapacityExceeded { capacity: 8, .. })
        ));
    }
}
