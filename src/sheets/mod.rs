//! Sheet controllers: one per PHPP worksheet
//!
//! A controller owns the locators of its worksheet's tables and the
//! name → id caches for rows other sheets refer to. It turns a list of
//! domain objects into row writes (through the row builders) and exposes the
//! lookups that later write steps need. Controllers never own the document;
//! every operation borrows the connection for the length of one call.

pub mod addnl_vent;
pub mod areas;
pub mod climate;
pub mod components;
pub mod electricity;
pub mod hot_water;
pub mod shading;
pub mod u_values;
pub mod variants;
pub mod ventilation;
pub mod verification;
pub mod windows;

pub use addnl_vent::AddnlVentSheet;
pub use areas::AreasSheet;
pub use climate::ClimateSheet;
pub use components::ComponentsSheet;
pub use electricity::ElectricitySheet;
pub use hot_water::HotWaterSheet;
pub use shading::ShadingSheet;
pub use u_values::UValuesSheet;
pub use variants::VariantsSheet;
pub use ventilation::VentilationSheet;
pub use verification::VerificationSheet;
pub use windows::WindowsSheet;

use crate::error::PhppResult;
use crate::locator::{locate_input, SectionLocator};
use crate::shape::model::LocatedInput;
use crate::xl::connection::{read_cell, write_op, DocumentConnection};
use crate::xl::item::{merge_same_row, AddressedWriteItem};
use crate::xl::value::CellValue;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, warn};

/// How many rows of a table were written and how many did not fit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub skipped: usize,
}

/// Write a list of items, merging contiguous cells of the same row.
///
/// Rows are written in the order they first appear in `items`.
pub fn write_items(
    conn: &mut dyn DocumentConnection,
    items: Vec<AddressedWriteItem>,
) -> PhppResult<()> {
    let mut rows: Vec<((String, u32), Vec<AddressedWriteItem>)> = Vec::new();
    for item in items {
        let key = (item.sheet.clone(), item.row());
        match rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(item),
            None => rows.push((key, vec![item])),
        }
    }

    for (_, group) in rows {
        for op in merge_same_row(group) {
            write_op(conn, &op)?;
        }
    }
    Ok(())
}

/// Keep the first `capacity` objects, warning once when some are dropped
pub fn truncate_to_capacity<'a, T>(
    objects: &'a [T],
    kind: &str,
    sheet: &str,
    capacity: usize,
) -> &'a [T] {
    if objects.len() > capacity {
        warn!(
            "{} {} found but the '{}' worksheet only has room for {}. Only the first {} are written.",
            objects.len(),
            kind,
            sheet,
            capacity,
            capacity
        );
        &objects[..capacity]
    } else {
        objects
    }
}

/// Write one row per object, starting at the table's first entry row.
///
/// With a `capacity`, objects past it are dropped with a single warning.
pub fn write_table<T>(
    conn: &mut dyn DocumentConnection,
    locator: &SectionLocator,
    kind: &str,
    capacity: Option<usize>,
    objects: &[T],
    mut build: impl FnMut(u32, &T) -> PhppResult<Vec<AddressedWriteItem>>,
) -> PhppResult<WriteReport> {
    let skipped = capacity.map_or(0, |c| objects.len().saturating_sub(c));
    let objects = match capacity {
        Some(capacity) => truncate_to_capacity(objects, kind, locator.sheet(), capacity),
        None => objects,
    };

    let first_row = locator.first_entry_row(&*conn)?;
    for (i, object) in objects.iter().enumerate() {
        let row = first_row + i as u32;
        write_items(conn, build(row, object)?)?;
    }
    debug!(sheet = locator.sheet(), kind, rows = objects.len(), first_row, "table written");

    Ok(WriteReport {
        written: objects.len(),
        skipped,
    })
}

/// One item for a labelled single-cell input
pub fn located_item(
    conn: &dyn DocumentConnection,
    sheet: &str,
    input: &LocatedInput,
    value: impl Into<CellValue>,
) -> PhppResult<AddressedWriteItem> {
    let address = locate_input(conn, sheet, input)?;
    Ok(AddressedWriteItem::new(sheet, address, Into::<CellValue>::into(value)))
}

/// Like [`located_item`], converting `value` from `native_unit` to the
/// input's unit
pub fn located_unit_item(
    conn: &dyn DocumentConnection,
    sheet: &str,
    input: &LocatedInput,
    value: f64,
    native_unit: &str,
) -> PhppResult<AddressedWriteItem> {
    let address = locate_input(conn, sheet, input)?;
    Ok(AddressedWriteItem::new(sheet, address, value).with_units(native_unit, input.unit.as_deref()))
}

/// Find `name` in `name_column` and return `"{id}-{name}"` from the same row
pub fn find_id_by_name(
    conn: &dyn DocumentConnection,
    sheet: &str,
    name_column: &str,
    id_column: &str,
    rows: (u32, u32),
    name: &str,
) -> PhppResult<Option<String>> {
    let Some(row) = conn.get_row_num_of_value_in_column(sheet, rows.0, rows.1, name_column, name)? else {
        return Ok(None);
    };
    let id = read_cell(conn, sheet, id_column, row)?;
    debug!(sheet, name, row, "id located");
    Ok(Some(format!("{}-{}", id.to_id_string(), name)))
}

/// `"{id}-{name}"` of the given row
pub fn id_at_row(
    conn: &dyn DocumentConnection,
    sheet: &str,
    name_column: &str,
    id_column: &str,
    row: u32,
) -> PhppResult<String> {
    let id = read_cell(conn, sheet, id_column, row)?;
    let name = read_cell(conn, sheet, name_column, row)?;
    Ok(format!("{}-{}", id.to_id_string(), name))
}

/// Display name → `"{id}-{name}"` of rows already looked up
#[derive(Debug, Default)]
pub struct IdCache {
    ids: RefCell<HashMap<String, String>>,
}

impl IdCache {
    pub fn get(&self, name: &str) -> Option<String> {
        self.ids.borrow().get(name).cloned()
    }

    pub fn insert(&self, name: &str, id: &str) {
        self.ids.borrow_mut().insert(name.to_string(), id.to_string());
    }

    pub fn clear(&self) {
        self.ids.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    /// Cached id when `use_cache` is set, otherwise (or on a miss) `lookup`.
    /// Found ids are always cached.
    pub fn lookup(
        &self,
        name: &str,
        use_cache: bool,
        lookup: impl FnOnce() -> PhppResult<Option<String>>,
    ) -> PhppResult<Option<String>> {
        if use_cache {
            if let Some(id) = self.get(name) {
                return Ok(Some(id));
            }
        }
        let found = lookup()?;
        if let Some(id) = &found {
            self.insert(name, id);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::model::{HeaderShape, MatchMode, SectionShape};
    use crate::xl::address::CellAddress;
    use crate::xl::memory::MemoryWorkbook;

    fn table() -> SectionLocator {
        SectionLocator::new(
            "S",
            SectionShape {
                header: HeaderShape {
                    locator_col_header: "A".to_string(),
                    locator_string_header: "Table".to_string(),
                    header_match: MatchMode::Equals,
                    header_search_start: 1,
                },
                locator_col_entry: "A".to_string(),
                locator_string_entry: "1".to_string(),
                entry_match: MatchMode::Numeric,
                entry_row_offset: 0,
                locator_string_end: None,
                locator_col_end: None,
                end_row_offset: -1,
            },
        )
    }

    fn workbook() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        wb.set("S", "A2", "Table").unwrap();
        for i in 1..=5 {
            wb.set("S", &format!("A{}", i + 2), i as f64).unwrap();
        }
        wb
    }

    #[test]
    fn test_write_table_truncates_to_capacity() {
        let mut wb = workbook();
        let locator = table();
        let names = ["a", "b", "c", "d"];
        let report = write_table(&mut wb, &locator, "things", Some(3), &names, |row, name| {
            Ok(vec![AddressedWriteItem::new("S", CellAddress::new("B", row), *name)])
        })
        .unwrap();
        assert_eq!(report.written, 3);
        assert_eq!(wb.get("S", "B3").unwrap(), CellValue::text("a"));
        assert_eq!(wb.get("S", "B5").unwrap(), CellValue::text("c"));
        assert_eq!(wb.get("S", "B6").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_find_id_by_name() {
        let mut wb = workbook();
        wb.set("S", "B4", "Wall").unwrap();
        let found = find_id_by_name(&wb, "S", "B", "A", (1, 20), "Wall").unwrap();
        assert_eq!(found.as_deref(), Some("2-Wall"));
        assert_eq!(find_id_by_name(&wb, "S", "B", "A", (1, 20), "Roof").unwrap(), None);
    }

    #[test]
    fn test_cache_only_consulted_when_asked() {
        let cache = IdCache::default();
        cache.insert("Wall", "1-Wall");
        let cached = cache.lookup("Wall", true, || Ok(Some("9-Wall".to_string()))).unwrap();
        assert_eq!(cached.as_deref(), Some("1-Wall"));
        let fresh = cache.lookup("Wall", false, || Ok(Some("9-Wall".to_string()))).unwrap();
        assert_eq!(fresh.as_deref(), Some("9-Wall"));
        assert_eq!(cache.get("Wall").as_deref(), Some("9-Wall"));
    }

    #[test]
    fn test_write_items_merges_rows() {
        let mut wb = MemoryWorkbook::new();
        wb.add_sheet("S");
        let items = vec![
            AddressedWriteItem::new("S", CellAddress::new("B", 1), 1.0),
            AddressedWriteItem::new("S", CellAddress::new("B", 2), 2.0),
            AddressedWriteItem::new("S", CellAddress::new("C", 1), 3.0),
        ];
        write_items(&mut wb, items).unwrap();
        assert_eq!(wb.get("S", "C1").unwrap(), CellValue::Number(3.0));
        assert_eq!(wb.get("S", "B2").unwrap(), CellValue::Number(2.0));
    }
}
