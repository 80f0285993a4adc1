//! DHW+Distribution worksheet: storage tanks, recirculation and branch piping

use crate::error::PhppResult;
use crate::locator::HeaderLocator;
use crate::model::mech::PhxHotWaterSystem;
use crate::rows::hot_water::{branch_items, group_by_diameter, recirc_items, tank_items};
use crate::shape::model::PhppShape;
use crate::sheets::{truncate_to_capacity, write_items, WriteReport};
use crate::xl::connection::DocumentConnection;
use std::rc::Rc;
use tracing::info;

pub const TANK_CAPACITY: usize = 2;
pub const PIPING_GROUP_CAPACITY: usize = 5;

/// Rows written per part of the hot water system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HotWaterReport {
    pub tanks: WriteReport,
    pub recirc_groups: WriteReport,
    pub branch_groups: WriteReport,
}

#[derive(Debug)]
pub struct HotWaterSheet {
    shape: Rc<PhppShape>,
    recirc: HeaderLocator,
    branch: HeaderLocator,
}

impl HotWaterSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let dhw = &shape.dhw;
        let recirc = HeaderLocator::new(&dhw.name, dhw.recirc_piping.header.clone());
        let branch = HeaderLocator::new(&dhw.name, dhw.branch_piping.header.clone());
        Self { shape, recirc, branch }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.dhw.name
    }

    pub fn recirc_header_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        self.recirc.header_row(conn)
    }

    pub fn branch_header_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        self.branch.header_row(conn)
    }

    /// Tanks, then recirculation groups, then branch groups. Anything past
    /// the worksheet's capacity is dropped with a warning.
    pub fn write_hot_water(
        &self,
        conn: &mut dyn DocumentConnection,
        system: &PhxHotWaterSystem,
    ) -> PhppResult<HotWaterReport> {
        let shape = &self.shape.dhw;
        let sheet = shape.name.as_str();

        let tanks = truncate_to_capacity(&system.tanks, "hot water tanks", sheet, TANK_CAPACITY);
        for (slot, tank) in tanks.iter().enumerate() {
            write_items(conn, tank_items(shape, slot, tank)?)?;
        }

        let recirc_groups = group_by_diameter(&system.recirc_piping);
        let recirc = truncate_to_capacity(&recirc_groups, "recirculation piping groups", sheet, PIPING_GROUP_CAPACITY);
        if !recirc.is_empty() {
            let header_row = self.recirc_header_row(&*conn)?;
            for (group, segments) in recirc.iter().enumerate() {
                let items = recirc_items(shape, header_row, group, segments, system.recirc_params.water_temp)?;
                write_items(conn, items)?;
            }
        }

        let branch_groups = group_by_diameter(&system.branch_piping);
        let branch = truncate_to_capacity(&branch_groups, "branch piping groups", sheet, PIPING_GROUP_CAPACITY);
        if !branch.is_empty() {
            let header_row = self.branch_header_row(&*conn)?;
            for (group, segments) in branch.iter().enumerate() {
                write_items(conn, branch_items(shape, header_row, group, segments, system.num_tap_points)?)?;
            }
        }

        let report = HotWaterReport {
            tanks: report(system.tanks.len(), tanks.len()),
            recirc_groups: report(recirc_groups.len(), recirc.len()),
            branch_groups: report(branch_groups.len(), branch.len()),
        };
        info!(
            sheet,
            tanks = tanks.len(),
            recirc_groups = recirc.len(),
            branch_groups = branch.len(),
            "hot water written"
        );
        Ok(report)
    }
}

fn report(total: usize, written: usize) -> WriteReport {
    WriteReport {
        written,
        skipped: total - written,
    }
}
