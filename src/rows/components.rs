//! Components worksheet rows: glazings, frames and ventilation units

use crate::error::PhppResult;
use crate::model::constructions::PhxConstructionWindow;
use crate::model::mech::PhxVentilator;
use crate::rows::{as_text, RowItems};
use crate::shape::model::ComponentsShape;
use crate::xl::item::AddressedWriteItem;

pub fn glazing_row(
    shape: &ComponentsShape,
    row: u32,
    window: &PhxConstructionWindow,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.glazings.inputs;
    let marker = &shape.glazings.locator.header.locator_string_header;
    let mut items = RowItems::new(&shape.name, marker, row);
    items
        .put("description", &inputs.description, as_text(&window.glazing_type_display_name))?
        .put("g_value", &inputs.g_value, window.glass_g_value)?
        .put_unit("u_value", &inputs.u_value, window.u_value_glass, "W/M2K")?;
    Ok(items.finish())
}

pub fn frame_row(
    shape: &ComponentsShape,
    row: u32,
    window: &PhxConstructionWindow,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.frames.inputs;
    let mut items = RowItems::new(&shape.name, shape.frames.marker(), row);
    items.put("description", &inputs.description, as_text(&window.frame_type_display_name))?;

    let sides = [
        ("left", &window.frame_left, &inputs.u_value_left, &inputs.width_left, &inputs.psi_g_left, &inputs.psi_i_left),
        ("right", &window.frame_right, &inputs.u_value_right, &inputs.width_right, &inputs.psi_g_right, &inputs.psi_i_right),
        ("bottom", &window.frame_bottom, &inputs.u_value_bottom, &inputs.width_bottom, &inputs.psi_g_bottom, &inputs.psi_i_bottom),
        ("top", &window.frame_top, &inputs.u_value_top, &inputs.width_top, &inputs.psi_g_top, &inputs.psi_i_top),
    ];
    for (side, element, u_value, width, psi_g, psi_i) in sides {
        items
            .put_unit(&format!("u_value_{}", side), u_value, element.u_value, "W/M2K")?
            .put_unit(&format!("width_{}", side), width, element.width, "M")?
            .put_unit(&format!("psi_g_{}", side), psi_g, element.psi_glazing, "W/MK")?
            .put_unit(&format!("psi_i_{}", side), psi_i, element.psi_install, "W/MK")?;
    }
    Ok(items.finish())
}

pub fn ventilator_row(
    shape: &ComponentsShape,
    row: u32,
    ventilator: &PhxVentilator,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.ventilators.inputs;
    let frost = if ventilator.frost_protection_reqd { "yes" } else { "no" };
    let mut items = RowItems::new(&shape.name, shape.ventilators.marker(), row);
    items
        .put("display_name", &inputs.display_name, ventilator.display_name.as_str())?
        .put(
            "sensible_heat_recovery",
            &inputs.sensible_heat_recovery,
            ventilator.sensible_heat_recovery,
        )?
        .put(
            "latent_heat_recovery",
            &inputs.latent_heat_recovery,
            ventilator.latent_heat_recovery,
        )?
        .put_unit(
            "electric_efficiency",
            &inputs.electric_efficiency,
            ventilator.electric_efficiency,
            "WH/M3",
        )?
        .put("frost_protection_reqd", &inputs.frost_protection_reqd, frost)?;
    Ok(items.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::constructions::PhxWindowFrameElement;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::{CellValue, WriteValue};

    fn window() -> PhxConstructionWindow {
        let side = PhxWindowFrameElement {
            width: 0.1,
            u_value: 1.0,
            psi_glazing: 0.04,
            psi_install: 0.04,
        };
        PhxConstructionWindow {
            id_num: 1,
            display_name: "Triple".to_string(),
            glazing_type_display_name: "Triple glazing".to_string(),
            frame_type_display_name: "Wood frame".to_string(),
            glass_g_value: 0.5,
            u_value_glass: 0.6,
            frame_left: side.clone(),
            frame_right: side.clone(),
            frame_bottom: side.clone(),
            frame_top: side,
        }
    }

    #[test]
    fn test_frame_row_has_all_sides() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let items = frame_row(&shape.components, 20, &window()).unwrap();
        assert_eq!(items.len(), 17);
        assert_eq!(items[0].value, WriteValue::Scalar(CellValue::text("'Wood frame")));
    }

    #[test]
    fn test_glazing_row() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let items = glazing_row(&shape.components, 16, &window()).unwrap();
        let columns: Vec<_> = items.iter().map(|i| i.column()).collect();
        assert_eq!(columns, vec!["IF", "IG", "IH"]);
    }
}
