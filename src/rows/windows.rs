//! Windows worksheet rows

use crate::error::PhppResult;
use crate::model::constructions::PhxConstructionWindow;
use crate::model::geometry::PhxPolygon;
use crate::rows::{as_text, RowItems};
use crate::shape::model::WindowsShape;
use crate::xl::item::AddressedWriteItem;

/// Ids of the other rows a window row points at, as `"{id}-{name}"` text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowRefs {
    pub variant_type: Option<String>,
    pub host_surface: String,
    pub frame: String,
    pub glazing: Option<String>,
}

pub fn window_row(
    shape: &WindowsShape,
    row: u32,
    polygon: &PhxPolygon,
    window_type: &PhxConstructionWindow,
    refs: &WindowRefs,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.window_rows.inputs;
    let mut items = RowItems::new(&shape.name, shape.window_rows.marker(), row);
    items
        .put("variant_input", &inputs.variant_input, refs.variant_type.as_deref())?
        .put("quantity", &inputs.quantity, 1.0)?
        .put("description", &inputs.description, as_text(&polygon.display_name))?
        .put("host", &inputs.host, refs.host_surface.as_str())?
        .put("glazing_id", &inputs.glazing_id, refs.glazing.as_deref())?
        .put("frame_id", &inputs.frame_id, refs.frame.as_str())?
        .put_unit("width", &inputs.width, polygon.width, "M")?
        .put_unit("height", &inputs.height, polygon.height, "M")?
        .put_unit("psi_i_left", &inputs.psi_i_left, window_type.frame_left.psi_install, "W/MK")?
        .put_unit("psi_i_right", &inputs.psi_i_right, window_type.frame_right.psi_install, "W/MK")?
        .put_unit("psi_i_bottom", &inputs.psi_i_bottom, window_type.frame_bottom.psi_install, "W/MK")?
        .put_unit("psi_i_top", &inputs.psi_i_top, window_type.frame_top.psi_install, "W/MK")?;
    Ok(items.finish())
}
