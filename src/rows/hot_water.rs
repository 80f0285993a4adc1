//! DHW+Distribution worksheet: storage tanks and piping groups
//!
//! Piping goes in column groups. Segments are grouped by diameter, and
//! each group's diameter, insulation thickness and conductivity are
//! length-weighted averages over its segments.

use crate::error::{PhppError, PhppResult};
use crate::model::mech::{PhxHotWaterTank, PhxPipeSegment};
use crate::rows::BlockItems;
use crate::shape::model::DhwShape;
use crate::xl::address::col_offset;
use crate::xl::item::AddressedWriteItem;

/// `Σ(value·length) / Σ length` over `segments`; `0.0` for zero total length
pub fn length_weighted<F>(segments: &[&PhxPipeSegment], value: F) -> f64
where
    F: Fn(&PhxPipeSegment) -> f64,
{
    let total: f64 = segments.iter().map(|s| s.length).sum();
    if total == 0.0 {
        return 0.0;
    }
    segments.iter().map(|s| value(*s) * s.length).sum::<f64>() / total
}

/// Segments grouped by diameter, groups in first-seen order
pub fn group_by_diameter(segments: &[PhxPipeSegment]) -> Vec<Vec<&PhxPipeSegment>> {
    let mut groups: Vec<(u64, Vec<&PhxPipeSegment>)> = Vec::new();
    for segment in segments {
        let key = segment.diameter_mm.to_bits();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(segment),
            None => groups.push((key, vec![segment])),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

fn x_if(flag: bool) -> &'static str {
    if flag {
        "x"
    } else {
        ""
    }
}

/// One tank in the `slot`-th tank column (0 → tank 1, 1 → tank 2)
pub fn tank_items(
    shape: &DhwShape,
    slot: usize,
    tank: &PhxHotWaterTank,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let tanks = &shape.tanks;
    let column = match slot {
        0 => &tanks.input_columns.tank_1,
        1 => &tanks.input_columns.tank_2,
        _ => {
            return Err(PhppError::CapacityExceeded {
                kind: "hot water tanks",
                sheet: shape.name.clone(),
                count: slot + 1,
                capacity: 2,
            })
        }
    };
    let marker = "DHW tanks";
    let options = |field: &str, map: &std::collections::BTreeMap<String, String>, key: String| {
        map.get(&key).cloned().ok_or_else(|| PhppError::MissingOption {
            field: field.to_string(),
            sheet: shape.name.clone(),
            option: key,
        })
    };
    let tank_type = options("tank_type", &tanks.tank_type.options, tank.tank_type.to_string())?;
    let location = options(
        "tank_location",
        &tanks.tank_location.options,
        u32::from(tank.in_conditioned_space).to_string(),
    )?;
    let quantity = tank.quantity as f64;
    let rows = &tanks.input_rows;

    let mut items = BlockItems::new(&shape.name, marker, column.as_str(), tanks.entry_row_start);
    items
        .put("tank_type", &rows.tank_type, tank_type)?
        .put_unit("standby_losses", &rows.standby_losses, tank.standby_losses * quantity, "W/K")?
        .put_unit(
            "storage_capacity",
            &rows.storage_capacity,
            tank.storage_capacity * quantity,
            "LITER",
        )?
        .put("standby_fraction", &rows.standby_fraction, tank.standby_fraction)?
        .put("tank_location", &rows.tank_location, location)?
        .put_unit("water_temp", &rows.water_temp, tank.water_temp, "C")?;
    Ok(items.finish())
}

/// One recirculation group, `group` columns right of the first piping column
pub fn recirc_items(
    shape: &DhwShape,
    header_row: u32,
    group: usize,
    segments: &[&PhxPipeSegment],
    water_temp: f64,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let piping = &shape.recirc_piping;
    let rows = &piping.input_rows_offset;
    let column = col_offset(&piping.input_col_start, group as i32)?;
    let total_length: f64 = segments.iter().map(|s| s.length).sum();
    let daily_period = segments.iter().map(|s| s.daily_period).fold(0.0, f64::max);

    let mut items = BlockItems::new(&shape.name, &piping.header.locator_string_header, column, header_row);
    items
        .put_unit("total_length", &rows.total_length, total_length, "M")?
        .put_unit(
            "diameter",
            &rows.diameter,
            length_weighted(segments, |s| s.diameter_mm),
            "MM",
        )?
        .put_unit(
            "insul_thickness",
            &rows.insul_thickness,
            length_weighted(segments, |s| s.insulation_thickness_mm),
            "MM",
        )?
        .put(
            "insul_reflective",
            &rows.insul_reflective,
            x_if(segments.iter().any(|s| s.insulation_reflective)),
        )?
        .put_unit(
            "insul_conductivity",
            &rows.insul_conductivity,
            length_weighted(segments, |s| s.insulation_conductivity),
            "W/MK",
        )?
        .put("daily_period", &rows.daily_period, daily_period)?
        .put_unit("water_temp", &rows.water_temp, water_temp, "C")?;
    Ok(items.finish())
}

/// One branch-piping group
pub fn branch_items(
    shape: &DhwShape,
    header_row: u32,
    group: usize,
    segments: &[&PhxPipeSegment],
    num_taps: u32,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let piping = &shape.branch_piping;
    let rows = &piping.input_rows_offset;
    let column = col_offset(&piping.input_col_start, group as i32)?;
    let total_length: f64 = segments.iter().map(|s| s.length).sum();

    let mut items = BlockItems::new(&shape.name, &piping.header.locator_string_header, column, header_row);
    items
        .put_unit(
            "diameter",
            &rows.diameter,
            length_weighted(segments, |s| s.diameter_mm),
            "MM",
        )?
        .put_unit("total_length", &rows.total_length, total_length, "M")?
        .put("num_taps", &rows.num_taps, num_taps)?;
    Ok(items.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::{CellValue, WriteValue};

    fn segment(length: f64, diameter_mm: f64) -> PhxPipeSegment {
        PhxPipeSegment {
            display_name: String::new(),
            length,
            diameter_mm,
            insulation_thickness_mm: 25.0,
            insulation_conductivity: 0.04,
            insulation_reflective: false,
            daily_period: 24.0,
        }
    }

    #[test]
    fn test_length_weighted_diameter() {
        let a = segment(2.0, 10.0);
        let b = segment(4.0, 20.0);
        let weighted = length_weighted(&[&a, &b], |s| s.diameter_mm);
        assert!((weighted - 16.6667).abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_group_is_zero() {
        let a = segment(0.0, 10.0);
        assert_eq!(length_weighted(&[&a], |s| s.diameter_mm), 0.0);
        assert_eq!(length_weighted(&[], |s| s.diameter_mm), 0.0);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let segments = vec![segment(1.0, 20.0), segment(1.0, 10.0), segment(2.0, 20.0)];
        let groups = group_by_diameter(&segments);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].diameter_mm, 10.0);
    }

    #[test]
    fn test_branch_group_columns_and_rows() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let a = segment(2.0, 10.0);
        let items = branch_items(&shape.dhw, 150, 1, &[&a], 4).unwrap();
        assert!(items.iter().all(|i| i.column() == "K"));
        let taps = items.last().unwrap();
        assert_eq!(taps.row(), 155);
        assert_eq!(taps.value, WriteValue::Scalar(CellValue::Number(4.0)));
    }

    #[test]
    fn test_tank_scales_by_quantity() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let tank = PhxHotWaterTank {
            quantity: 2,
            tank_type: 2,
            standby_losses: 1.5,
            storage_capacity: 200.0,
            standby_fraction: 0.3,
            in_conditioned_space: true,
            water_temp: 60.0,
        };
        let items = tank_items(&shape.dhw, 0, &tank).unwrap();
        assert_eq!(items[0].address.row, 186);
        assert_eq!(items[0].value, WriteValue::Scalar(CellValue::text("2-DHW only")));
        assert_eq!(items[1].value, WriteValue::Scalar(CellValue::Number(3.0)));
        assert_eq!(
            items[4].value,
            WriteValue::Scalar(CellValue::text("1-Inside thermal envelope"))
        );
        assert!(tank_items(&shape.dhw, 2, &tank).is_err());
    }
}
