//! Areas worksheet rows: opaque surfaces and thermal bridges

use crate::error::PhppResult;
use crate::model::geometry::PhxPolygon;
use crate::model::project::{Exposure, FaceType, PhxComponentOpaque, PhxThermalBridge};
use crate::rows::{as_text, RowItems};
use crate::shape::model::AreasShape;
use crate::xl::item::AddressedWriteItem;

const DEFAULT_SHADING: f64 = 0.5;
const DEFAULT_ABSORPTIVITY: f64 = 0.6;
const DEFAULT_EMISSIVITY: f64 = 0.9;

/// PHPP area group of an opaque component
pub fn surface_group_number(component: &PhxComponentOpaque) -> u32 {
    if component.exposure_exterior == Exposure::Surface {
        return 18;
    }
    match component.face_type {
        FaceType::Wall if component.exposure_exterior == Exposure::Exterior => 8,
        FaceType::Wall => 9,
        FaceType::Floor => 11,
        FaceType::RoofCeiling => 10,
        _ => 12,
    }
}

/// One opaque surface row.
///
/// The group number is written as text (`"8-"`) so IP workbooks do not
/// reinterpret it.
pub fn surface_row(
    shape: &AreasShape,
    row: u32,
    polygon: &PhxPolygon,
    component: &PhxComponentOpaque,
    assembly_id: Option<&str>,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.surface_rows.inputs;
    let mut items = RowItems::new(&shape.name, shape.surface_rows.marker(), row);
    items
        .put("description", &inputs.description, as_text(&polygon.display_name))?
        .put(
            "group_number",
            &inputs.group_number,
            format!("{}-", surface_group_number(component)),
        )?
        .put("quantity", &inputs.quantity, 1.0)?
        .put_unit("area", &inputs.area, polygon.area, "M2")?
        .put("assembly_id", &inputs.assembly_id, assembly_id)?
        .put("orientation", &inputs.orientation, polygon.cardinal_orientation_angle)?
        .put("angle", &inputs.angle, polygon.angle_from_horizontal)?
        .put("shading", &inputs.shading, DEFAULT_SHADING)?
        .put("absorptivity", &inputs.absorptivity, DEFAULT_ABSORPTIVITY)?
        .put("emissivity", &inputs.emissivity, DEFAULT_EMISSIVITY)?;
    Ok(items.finish())
}

pub fn thermal_bridge_row(
    shape: &AreasShape,
    row: u32,
    bridge: &PhxThermalBridge,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.thermal_bridge_rows.inputs;
    let mut items = RowItems::new(&shape.name, shape.thermal_bridge_rows.marker(), row);
    items
        .put("description", &inputs.description, bridge.display_name.as_str())?
        .put("group_number", &inputs.group_number, bridge.group_type.group_number())?
        .put("quantity", &inputs.quantity, bridge.quantity)?
        .put_unit("length", &inputs.length, bridge.length, "M")?
        .put_unit("psi_value", &inputs.psi_value, bridge.psi_value, "W/MK")?
        .put("fRsi_value", &inputs.frsi_value, bridge.frsi_value)?;
    Ok(items.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::{CellValue, WriteValue};

    fn component(face_type: FaceType, exposure_exterior: Exposure) -> PhxComponentOpaque {
        PhxComponentOpaque {
            face_type,
            exposure_exterior,
            assembly_type_name: "Wall".to_string(),
            polygons: vec![],
            apertures: vec![],
        }
    }

    #[test]
    fn test_group_numbers() {
        assert_eq!(surface_group_number(&component(FaceType::Wall, Exposure::Exterior)), 8);
        assert_eq!(surface_group_number(&component(FaceType::Wall, Exposure::Ground)), 9);
        assert_eq!(surface_group_number(&component(FaceType::Floor, Exposure::Ground)), 11);
        assert_eq!(surface_group_number(&component(FaceType::RoofCeiling, Exposure::Exterior)), 10);
        assert_eq!(surface_group_number(&component(FaceType::Wall, Exposure::Surface)), 18);
        assert_eq!(surface_group_number(&component(FaceType::Adiabatic, Exposure::Exterior)), 12);
    }

    #[test]
    fn test_surface_row_fields() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let polygon = PhxPolygon {
            display_name: "North wall".to_string(),
            area: 12.5,
            cardinal_orientation_angle: 0.0,
            ..Default::default()
        };
        let items = surface_row(
            &shape.areas,
            41,
            &polygon,
            &component(FaceType::Wall, Exposure::Exterior),
            Some("3-Wall"),
        )
        .unwrap();

        assert_eq!(items.len(), 11);
        assert!(items.iter().all(|i| i.row() == 41));
        let description = items.iter().find(|i| i.column() == "D").unwrap();
        assert_eq!(description.value, WriteValue::Scalar(CellValue::text("'North wall")));
        let group = items.iter().find(|i| i.column() == "E").unwrap();
        assert_eq!(group.value, WriteValue::Scalar(CellValue::text("8-")));
        let assembly = items.iter().find(|i| i.column() == "AB").unwrap();
        assert_eq!(assembly.value, WriteValue::Scalar(CellValue::text("3-Wall")));
    }
}
