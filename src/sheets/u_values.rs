//! U-Values worksheet: a fixed stack of constructor blocks
//!
//! Each block starts at a row whose header column reads the header label
//! (or one of its alternates). Assemblies are written into consecutive
//! blocks; the block count is the worksheet's assembly capacity.

use crate::error::{PhppError, PhppResult};
use crate::model::constructions::PhxConstructionOpaque;
use crate::rows::u_values::constructor_items;
use crate::shape::model::PhppShape;
use crate::sheets::variants::VariantId;
use crate::sheets::{find_id_by_name, write_items, IdCache, WriteReport};
use crate::xl::address::{col_offset, CellAddress, RangeAddress};
use crate::xl::connection::{read_cell, DocumentConnection};
use crate::xl::item::AddressedWriteItem;
use crate::xl::value::{CellValue, WriteValue};
use std::cell::OnceCell;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct UValuesSheet {
    shape: Rc<PhppShape>,
    start_rows: OnceCell<Vec<u32>>,
    ids: IdCache,
}

impl UValuesSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        Self {
            shape,
            start_rows: OnceCell::new(),
            ids: IdCache::default(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.u_values.name
    }

    fn name_column(&self) -> PhppResult<&str> {
        let constructor = &self.shape.u_values.constructor;
        constructor
            .inputs
            .display_name
            .column_for("display_name", self.sheet_name(), &constructor.locator_string_header)
    }

    /// Header rows of every constructor block, top to bottom
    pub fn constructor_start_rows(&self, conn: &dyn DocumentConnection) -> PhppResult<&[u32]> {
        if let Some(rows) = self.start_rows.get() {
            return Ok(rows);
        }

        let constructor = &self.shape.u_values.constructor;
        let data = conn.get_single_column_data(
            self.sheet_name(),
            &constructor.locator_col_header,
            1,
            constructor.search_end_row,
        )?;
        let rows: Vec<u32> = data
            .iter()
            .enumerate()
            .filter(|(_, v)| {
                let text = v.to_string();
                let text = text.trim();
                text == constructor.locator_string_header
                    || constructor.alternate_header_strings.iter().any(|alt| alt == text)
            })
            .map(|(i, _)| 1 + i as u32)
            .collect();
        debug!(sheet = self.sheet_name(), blocks = rows.len(), "constructor blocks located");
        Ok(self.start_rows.get_or_init(|| rows))
    }

    /// Name of the block at `start_row`, blank for unused blocks
    pub fn constructor_name(&self, conn: &dyn DocumentConnection, start_row: u32) -> PhppResult<CellValue> {
        let row = start_row + self.shape.u_values.constructor.inputs.name_row_offset;
        read_cell(conn, self.sheet_name(), self.name_column()?, row)
    }

    /// Names of every used block, sorted
    pub fn used_constructor_names(&self, conn: &dyn DocumentConnection) -> PhppResult<Vec<String>> {
        let mut names = Vec::new();
        for start in self.constructor_start_rows(conn)? {
            let name = self.constructor_name(conn, *start)?;
            if !name.is_blank() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CLEARING
    // ═══════════════════════════════════════════════════════════════════════

    /// Empty the layers and surface films of one block, and its name when
    /// `clear_name` is set
    pub fn clear_constructor(
        &self,
        conn: &mut dyn DocumentConnection,
        start_row: u32,
        clear_name: bool,
    ) -> PhppResult<()> {
        let sheet = self.sheet_name();
        let constructor = &self.shape.u_values.constructor;
        let inputs = &constructor.inputs;
        let marker = &constructor.locator_string_header;

        let first_col = inputs.sec_1_description.column_for("sec_1_description", sheet, marker)?;
        let last_col = inputs.thickness.column_for("thickness", sheet, marker)?;
        let layers = RangeAddress::new(
            CellAddress::new(first_col, start_row + inputs.first_layer_row_offset),
            CellAddress::new(last_col, start_row + inputs.last_layer_row_offset),
        );
        let empty = WriteValue::Scalar(CellValue::Empty);
        conn.write(sheet, &layers, &empty)?;
        conn.write(sheet, &self.films(start_row)?, &empty)?;
        if clear_name {
            let name = CellAddress::new(self.name_column()?, start_row + inputs.name_row_offset);
            conn.write(sheet, &RangeAddress::single(name), &empty)?;
        }
        Ok(())
    }

    /// The Rsi/Rse cells of the block at `start_row`
    fn films(&self, start_row: u32) -> PhppResult<RangeAddress> {
        let sheet = self.sheet_name();
        let constructor = &self.shape.u_values.constructor;
        let inputs = &constructor.inputs;
        let marker = &constructor.locator_string_header;
        Ok(RangeAddress::new(
            CellAddress::new(
                inputs.r_si.column_for("r_si", sheet, marker)?,
                start_row + inputs.rsi_row_offset,
            ),
            CellAddress::new(
                inputs.r_se.column_for("r_se", sheet, marker)?,
                start_row + inputs.rse_row_offset,
            ),
        ))
    }

    pub fn clear_all_constructors(&self, conn: &mut dyn DocumentConnection, clear_name: bool) -> PhppResult<()> {
        let starts = self.constructor_start_rows(&*conn)?.to_vec();
        for start in starts {
            self.clear_constructor(conn, start, clear_name)?;
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════

    /// Replace every block with `constructions`, in order
    pub fn write_constructions(
        &self,
        conn: &mut dyn DocumentConnection,
        constructions: &[&PhxConstructionOpaque],
    ) -> PhppResult<WriteReport> {
        let starts = self.constructor_start_rows(&*conn)?.to_vec();
        if constructions.len() > starts.len() {
            return Err(PhppError::CapacityExceeded {
                kind: "assemblies",
                sheet: self.sheet_name().to_string(),
                count: constructions.len(),
                capacity: starts.len(),
            });
        }

        self.clear_all_constructors(conn, true)?;
        for (construction, start) in constructions.iter().zip(&starts) {
            write_items(conn, constructor_items(&self.shape.u_values, *start, construction)?)?;
        }
        self.ids.clear();
        info!(sheet = self.sheet_name(), assemblies = constructions.len(), "assemblies written");

        Ok(WriteReport {
            written: constructions.len(),
            skipped: 0,
        })
    }

    /// `"{id}-{name}"` of the block with this name, if present
    pub fn construction_id_by_name(
        &self,
        conn: &dyn DocumentConnection,
        name: &str,
        use_cache: bool,
    ) -> PhppResult<Option<String>> {
        let constructor = &self.shape.u_values.constructor;
        let name_col = self.name_column()?;
        let id_col = col_offset(name_col, constructor.inputs.phpp_id_num_col_offset)?;
        self.ids.lookup(name, use_cache, || {
            find_id_by_name(
                conn,
                self.sheet_name(),
                name_col,
                &id_col,
                (1, constructor.search_end_row),
                name,
            )
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VARIANTS
    // ═══════════════════════════════════════════════════════════════════════

    /// Drive each named block's first layer from the Variants assembly row
    /// of the same name. Blocks keep their names; every other input is
    /// cleared and the surface films are zeroed.
    pub fn activate_variants(
        &self,
        conn: &mut dyn DocumentConnection,
        variant_ids: &[VariantId],
    ) -> PhppResult<()> {
        self.clear_all_constructors(conn, false)?;

        let sheet = self.sheet_name().to_string();
        let constructor = &self.shape.u_values.constructor;
        let inputs = &constructor.inputs;
        let marker = &constructor.locator_string_header;
        let conductivity_col = inputs.sec_1_conductivity.column_for("sec_1_conductivity", &sheet, marker)?;
        let thickness_col = inputs.thickness.column_for("thickness", &sheet, marker)?;

        let starts = self.constructor_start_rows(&*conn)?.to_vec();
        let mut linked = 0;
        for start in starts {
            let name = self.constructor_name(&*conn, start)?;
            if name.is_blank() {
                continue;
            }
            let name = name.to_string();
            let Some(variant) = variant_ids.iter().find(|v| v.display_name == name) else {
                continue;
            };

            let row = start + inputs.first_layer_row_offset;
            let items = vec![
                AddressedWriteItem::new(
                    &sheet,
                    CellAddress::new(&inputs.variants_layer_name, row),
                    variant.phpp_id(),
                ),
                AddressedWriteItem::new(
                    &sheet,
                    CellAddress::new(conductivity_col, row),
                    format!("={}{}", inputs.variants_conductivity, row),
                ),
                AddressedWriteItem::new(
                    &sheet,
                    CellAddress::new(thickness_col, row),
                    format!("={}{}", inputs.variants_thickness, row),
                ),
            ];
            write_items(conn, items)?;
            conn.write(&sheet, &self.films(start)?, &WriteValue::Scalar(CellValue::Number(0.0)))?;
            linked += 1;
        }
        info!(sheet = %sheet, linked, "assembly variants activated");
        Ok(())
    }
}
