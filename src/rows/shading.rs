//! Shading worksheet rows

use crate::error::PhppResult;
use crate::model::project::PhxApertureElement;
use crate::rows::RowItems;
use crate::shape::model::ShadingShape;
use crate::xl::item::AddressedWriteItem;

/// Shading of one window element. Elements without dimensions only get
/// their other-shading factors.
pub fn shading_row(
    shape: &ShadingShape,
    row: u32,
    element: &PhxApertureElement,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.shading_rows.inputs;
    let mut items = RowItems::new(&shape.name, shape.shading_rows.marker(), row);
    if let Some(dims) = &element.shading_dimensions {
        items
            .put_unit("h_hori", &inputs.h_hori, dims.h_hori, "M")?
            .put_unit("d_hori", &inputs.d_hori, dims.d_hori, "M")?
            .put_unit("o_reveal", &inputs.o_reveal, dims.o_reveal, "M")?
            .put_unit("d_reveal", &inputs.d_reveal, dims.d_reveal, "M")?
            .put_unit("o_over", &inputs.o_over, dims.o_over, "M")?
            .put_unit("d_over", &inputs.d_over, dims.d_over, "M")?;
    }
    items
        .put("r_other_winter", &inputs.r_other_winter, element.winter_shading_factor)?
        .put("r_other_summer", &inputs.r_other_summer, element.summer_shading_factor)?;
    Ok(items.finish())
}
