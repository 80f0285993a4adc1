//! Areas worksheet: opaque surfaces, thermal bridges and the treated floor area

use crate::error::{PhppError, PhppResult};
use crate::locator::SectionLocator;
use crate::model::geometry::PhxPolygon;
use crate::model::project::{PhxComponentOpaque, PhxThermalBridge};
use crate::rows::areas::{surface_row, thermal_bridge_row};
use crate::shape::model::PhppShape;
use crate::sheets::{find_id_by_name, located_unit_item, write_items, write_table, IdCache, WriteReport};
use crate::xl::connection::DocumentConnection;
use std::rc::Rc;

pub const SURFACE_CAPACITY: usize = 100;
pub const THERMAL_BRIDGE_CAPACITY: usize = 100;

/// One opaque surface row: the polygon, its host component and the
/// U-Values id of the component's assembly
#[derive(Debug, Clone)]
pub struct SurfaceInput<'a> {
    pub polygon: &'a PhxPolygon,
    pub component: &'a PhxComponentOpaque,
    pub assembly_id: Option<String>,
}

#[derive(Debug)]
pub struct AreasSheet {
    shape: Rc<PhppShape>,
    surfaces: SectionLocator,
    thermal_bridges: SectionLocator,
    surface_ids: IdCache,
}

impl AreasSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let areas = &shape.areas;
        let surfaces = SectionLocator::new(&areas.name, areas.surface_rows.locator.clone());
        let thermal_bridges = SectionLocator::new(&areas.name, areas.thermal_bridge_rows.locator.clone());
        Self {
            shape,
            surfaces,
            thermal_bridges,
            surface_ids: IdCache::default(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.areas.name
    }

    pub fn surfaces(&self) -> &SectionLocator {
        &self.surfaces
    }

    pub fn thermal_bridges(&self) -> &SectionLocator {
        &self.thermal_bridges
    }

    pub fn write_surfaces(
        &self,
        conn: &mut dyn DocumentConnection,
        surfaces: &[SurfaceInput<'_>],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.areas;
        let report = write_table(
            conn,
            &self.surfaces,
            "surfaces",
            Some(SURFACE_CAPACITY),
            surfaces,
            |row, s| surface_row(shape, row, s.polygon, s.component, s.assembly_id.as_deref()),
        )?;
        self.surface_ids.clear();
        Ok(report)
    }

    pub fn write_thermal_bridges(
        &self,
        conn: &mut dyn DocumentConnection,
        bridges: &[&PhxThermalBridge],
    ) -> PhppResult<WriteReport> {
        let shape = &self.shape.areas;
        write_table(
            conn,
            &self.thermal_bridges,
            "thermal bridges",
            Some(THERMAL_BRIDGE_CAPACITY),
            bridges,
            |row, tb| thermal_bridge_row(shape, row, tb),
        )
    }

    /// Treated floor area, given in M2
    pub fn write_tfa(&self, conn: &mut dyn DocumentConnection, tfa: f64) -> PhppResult<()> {
        let shape = &self.shape.areas;
        let item = located_unit_item(&*conn, &shape.name, &shape.tfa_input, tfa, "M2")?;
        write_items(conn, vec![item])
    }

    /// `"{id}-{name}"` of the surface row with this description
    pub fn surface_id_by_name(
        &self,
        conn: &dyn DocumentConnection,
        name: &str,
        use_cache: bool,
    ) -> PhppResult<String> {
        let shape = &self.shape.areas;
        let inputs = &shape.surface_rows.inputs;
        let marker = shape.surface_rows.marker();
        let name_column = inputs.description.column_for("description", &shape.name, marker)?;
        let id_column = inputs.id.column_for("id", &shape.name, marker)?;

        let found = self.surface_ids.lookup(name, use_cache, || {
            let first = self.surfaces.first_entry_row(conn)?;
            let rows = (first, first + SURFACE_CAPACITY as u32 - 1);
            find_id_by_name(conn, &shape.name, name_column, id_column, rows, name)
        })?;

        found.ok_or_else(|| PhppError::ReferenceNotFound {
            kind: "surface",
            name: name.to_string(),
            sheet: shape.name.clone(),
            column: name_column.to_string(),
        })
    }
}
