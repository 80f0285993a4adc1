//! Climate worksheet: the user-defined weather block and the active
//! dataset selection

use crate::error::PhppResult;
use crate::model::project::{PhxClimate, PhxClimatePeakLoad, PhxSite};
use crate::rows::{block_item, BlockItems};
use crate::shape::model::{ClimateShape, InputItem, UdBlockRows};
use crate::xl::address::CellAddress;
use crate::xl::item::AddressedWriteItem;

/// Native unit of a monthly row, by its name
fn row_unit(name: &str) -> &'static str {
    if name.starts_with("radiation") {
        "KWH/M2"
    } else {
        "C"
    }
}

/// The monthly rows with their twelve values, in shape row order
fn monthly_rows<'a>(
    rows: &'a UdBlockRows,
    climate: &'a PhxClimate,
) -> Vec<(&'static str, &'a InputItem, &'a [f64; 12])> {
    let mut all = vec![
        ("temperature_air", &rows.temperature_air, &climate.temperature_air),
        ("radiation_north", &rows.radiation_north, &climate.radiation_north),
        ("radiation_east", &rows.radiation_east, &climate.radiation_east),
        ("radiation_south", &rows.radiation_south, &climate.radiation_south),
        ("radiation_west", &rows.radiation_west, &climate.radiation_west),
        ("radiation_global", &rows.radiation_global, &climate.radiation_global),
        ("temperature_dewpoint", &rows.temperature_dewpoint, &climate.temperature_dewpoint),
        ("temperature_sky", &rows.temperature_sky, &climate.temperature_sky),
    ];
    all.sort_by_key(|(_, input, _)| input.row.unwrap_or(i32::MAX));
    all
}

/// Peak-load rows: air temperature plus the five radiation rows
fn peak_rows<'a>(
    rows: &'a UdBlockRows,
    peak: &PhxClimatePeakLoad,
) -> [(&'static str, &'a InputItem, f64); 6] {
    [
        ("temperature_air", &rows.temperature_air, peak.temperature_air),
        ("radiation_north", &rows.radiation_north, peak.radiation_north),
        ("radiation_east", &rows.radiation_east, peak.radiation_east),
        ("radiation_south", &rows.radiation_south, peak.radiation_south),
        ("radiation_west", &rows.radiation_west, peak.radiation_west),
        ("radiation_global", &rows.radiation_global, peak.radiation_global),
    ]
}

/// Location, monthly data and peak loads of the user-defined block
pub fn ud_block_items(shape: &ClimateShape, site: &PhxSite) -> PhppResult<Vec<AddressedWriteItem>> {
    let ud = &shape.ud_block;
    let columns = &ud.input_columns;
    let start = ud.start_row;
    let sheet = shape.name.as_str();
    let climate = &site.climate;

    let at = |column: &str| CellAddress::new(column, start);
    let mut items = vec![
        AddressedWriteItem::new(sheet, at(columns.latitude.as_str()), site.location.latitude),
        AddressedWriteItem::new(sheet, at(columns.longitude.as_str()), site.location.longitude),
        AddressedWriteItem::new(sheet, at(columns.elevation.as_str()), climate.station_elevation)
            .with_units("M", Some(columns.elevation_unit.as_str())),
        AddressedWriteItem::new(sheet, at(columns.display_name.as_str()), site.display_name.as_str()),
        AddressedWriteItem::new(sheet, at(columns.summer_delta_t.as_str()), climate.daily_temp_swing)
            .with_units("DELTA-C", Some(columns.summer_delta_t_unit.as_str())),
        AddressedWriteItem::new(sheet, at(columns.source.as_str()), site.source.as_str()),
    ];

    let marker = "user-defined climate block";
    for (month, column) in columns.months.iter().enumerate() {
        let mut block = BlockItems::new(sheet, marker, column.as_str(), start);
        for (name, input, values) in monthly_rows(&ud.input_rows, climate) {
            block.put_unit(name, input, values[month], row_unit(name))?;
        }
        items.extend(block.finish());
    }

    let peaks = [
        (&columns.peak_heating_1, &climate.peak_heating_1),
        (&columns.peak_heating_2, &climate.peak_heating_2),
        (&columns.peak_cooling_1, &climate.peak_cooling_1),
        (&columns.peak_cooling_2, &climate.peak_cooling_2),
    ];
    for (column, peak) in peaks {
        let mut block = BlockItems::new(sheet, marker, column.as_str(), start);
        for (name, input, value) in peak_rows(&ud.input_rows, peak) {
            if name.starts_with("radiation") {
                let peak_input = InputItem {
                    column: input.column.clone(),
                    row: input.row,
                    unit: ud.peak_radiation_unit.clone().or_else(|| input.unit.clone()),
                };
                block.put_unit(name, &peak_input, value, "W/M2")?;
            } else {
                block.put_unit(name, input, value, "C")?;
            }
        }
        items.extend(block.finish());
    }

    Ok(items)
}

/// Country, region and dataset selection below the active-dataset header.
///
/// Without a site elevation of its own the elevation cell gets the
/// shape's fallback formula (the station elevation).
pub fn active_dataset_items(
    shape: &ClimateShape,
    header_row: u32,
    site: &PhxSite,
) -> PhppResult<Vec<AddressedWriteItem>> {
    let active = &shape.active_dataset;
    let columns = &active.input_columns;
    let rows = &active.input_rows;
    let sheet = shape.name.as_str();
    let codes = &site.phpp_codes;

    let mut items = vec![
        block_item(sheet, &columns.country, header_row, rows.country as i32, codes.country_code.as_str()),
        block_item(sheet, &columns.region, header_row, rows.region as i32, codes.region_code.as_str()),
        block_item(sheet, &columns.dataset, header_row, rows.dataset as i32, codes.dataset_name.as_str()),
    ];

    match site.location.site_elevation {
        Some(elevation) => {
            let unit = active
                .elevation_unit
                .as_deref()
                .unwrap_or(&shape.ud_block.input_columns.elevation_unit);
            items.push(
                block_item(
                    sheet,
                    &columns.elevation_override,
                    header_row,
                    rows.elevation_override as i32,
                    elevation,
                )
                .with_units("M", Some(unit)),
            );
        }
        None => {
            let address = CellAddress::parse(&active.elevation_fallback.address)?;
            items.push(AddressedWriteItem::new(
                sheet,
                address,
                active.elevation_fallback.formula.as_str(),
            ));
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::value::{CellValue, WriteValue};

    #[test]
    fn test_ud_block_covers_every_month() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let mut site = PhxSite::default();
        site.climate.temperature_air[0] = -3.0;
        let items = ud_block_items(&shape.climate, &site).unwrap();
        // 6 location cells, 8 rows × 12 months, 6 rows × 4 peak columns
        assert_eq!(items.len(), 6 + 96 + 24);
        let january = items
            .iter()
            .find(|i| i.column() == "E" && i.row() == 101)
            .unwrap();
        assert_eq!(january.value, WriteValue::Scalar(CellValue::Number(-3.0)));
    }

    #[test]
    fn test_elevation_fallback_formula() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        let site = PhxSite::default();
        let items = active_dataset_items(&shape.climate, 8, &site).unwrap();
        let fallback = items.last().unwrap();
        assert_eq!(fallback.address, CellAddress::new("D", 18));
        assert_eq!(fallback.value, WriteValue::Scalar(CellValue::text("=D17")));
    }
}
