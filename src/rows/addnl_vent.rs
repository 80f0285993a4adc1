//! Additional Vent worksheet rows: ventilation units, rooms and ducts

use crate::error::{PhppError, PhppResult};
use crate::model::mech::{PhxDuct, PhxVentilator};
use crate::model::project::{PhxSpace, VentilationPattern};
use crate::rows::RowItems;
use crate::shape::model::AddnlVentShape;
use crate::xl::item::AddressedWriteItem;

/// One ventilation unit; `ventilator_id` is the Components row it selects
pub fn vent_unit_row(
    shape: &AddnlVentShape,
    row: u32,
    ventilator: &PhxVentilator,
    ventilator_id: &str,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.units.inputs;
    let mut items = RowItems::new(&shape.name, shape.units.marker(), row);
    items
        .put("quantity", &inputs.quantity, ventilator.quantity)?
        .put("display_name", &inputs.display_name, ventilator.display_name.as_str())?
        .put("unit_selected", &inputs.unit_selected, ventilator_id)?
        .put_unit(
            "temperature_below_defrost_used",
            &inputs.temperature_below_defrost_used,
            ventilator.temperature_below_defrost_used,
            "C",
        )?;
    Ok(items.finish())
}

/// One room. `unit_number` is the Additional Vent unit serving it, if any.
pub fn vent_space_row(
    shape: &AddnlVentShape,
    row: u32,
    space: &PhxSpace,
    pattern: &VentilationPattern,
    unit_number: Option<u32>,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.rooms.inputs;
    let (time_high, time_standard, time_minimum) = pattern.time_fractions();
    let (speed_high, speed_standard, speed_minimum) = pattern.speeds();
    let vent = &space.ventilation;

    let mut items = RowItems::new(&shape.name, shape.rooms.marker(), row);
    items
        .put("quantity", &inputs.quantity, space.quantity)?
        .put("display_name", &inputs.display_name, space.display_name.as_str())?
        .put("vent_unit_assigned", &inputs.vent_unit_assigned, unit_number)?
        .put_unit("weighted_floor_area", &inputs.weighted_floor_area, space.floor_area, "M2")?
        .put_unit("clear_height", &inputs.clear_height, space.clear_height, "M")?
        .put_unit("V_sup", &inputs.v_sup, vent.flow_supply, "M3/HR")?
        .put_unit("V_eta", &inputs.v_eta, vent.flow_extract, "M3/HR")?
        .put_unit("V_trans", &inputs.v_trans, vent.flow_transfer, "M3/HR")?
        .put("operating_hours", &inputs.operating_hours, pattern.operating_hours)?
        .put("operating_days", &inputs.operating_days, pattern.operating_days)?
        .put("holiday_days", &inputs.holiday_days, pattern.holiday_days)?
        .put("period_high_speed", &inputs.period_high_speed, speed_high)?
        .put("period_high_time", &inputs.period_high_time, time_high)?
        .put("period_standard_speed", &inputs.period_standard_speed, speed_standard)?
        .put("period_standard_time", &inputs.period_standard_time, time_standard)?
        .put("period_minimum_speed", &inputs.period_minimum_speed, speed_minimum)?
        .put("period_minimum_time", &inputs.period_minimum_time, time_minimum)?;
    Ok(items.finish())
}

/// One duct run. The duct is assigned to its unit by an `x` in that unit's
/// numbered column (unit 1 → first assignment column).
pub fn duct_row(
    shape: &AddnlVentShape,
    row: u32,
    duct: &PhxDuct,
    unit_number: u32,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let inputs = &shape.ducts.inputs;
    let mut items = RowItems::new(&shape.name, shape.ducts.marker(), row);
    items
        .put("quantity", &inputs.quantity, duct.quantity)?
        .put_unit("diameter", &inputs.diameter, duct.diameter_mm, "MM")?
        .put_unit("insul_thickness", &inputs.insul_thickness, duct.insulation_thickness_mm, "MM")?
        .put_unit(
            "insul_conductivity",
            &inputs.insul_conductivity,
            duct.insulation_conductivity,
            "W/MK",
        )?
        .put(
            "insul_reflective",
            &inputs.insul_reflective,
            if duct.insulation_reflective { "x" } else { "" },
        )?
        .put_unit("sup_air_duct_len", &inputs.sup_air_duct_len, duct.supply_air_length, "M")?
        .put_unit("oda_air_duct_len", &inputs.oda_air_duct_len, duct.outdoor_air_length, "M")?;

    let assign_field = format!("duct_assign[{}]", unit_number);
    let assign = unit_number
        .checked_sub(1)
        .and_then(|i| inputs.duct_assign.get(i as usize))
        .ok_or_else(|| PhppError::CapacityExceeded {
            kind: "ventilation units with ducts",
            sheet: shape.name.clone(),
            count: unit_number as usize,
            capacity: inputs.duct_assign.len(),
        })?;
    items.put(&assign_field, assign, "x")?;
    Ok(items.finish())
}
