//! Climate worksheet

use crate::error::PhppResult;
use crate::locator::HeaderLocator;
use crate::model::project::PhxSite;
use crate::rows::climate::{active_dataset_items, ud_block_items};
use crate::shape::model::PhppShape;
use crate::sheets::write_items;
use crate::xl::connection::{read_cell, DocumentConnection};
use std::rc::Rc;
use tracing::info;

/// The dataset the workbook currently computes with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveDataset {
    pub country: String,
    pub region: String,
    pub dataset: String,
}

#[derive(Debug)]
pub struct ClimateSheet {
    shape: Rc<PhppShape>,
    active: HeaderLocator,
}

impl ClimateSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        let active = HeaderLocator::new(&shape.climate.name, shape.climate.active_dataset.header.clone());
        Self { shape, active }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.climate.name
    }

    pub fn active_dataset_row(&self, conn: &dyn DocumentConnection) -> PhppResult<u32> {
        self.active.header_row(conn)
    }

    /// Fill the user-defined weather block from the site's climate
    pub fn write_ud_block(&self, conn: &mut dyn DocumentConnection, site: &PhxSite) -> PhppResult<()> {
        write_items(conn, ud_block_items(&self.shape.climate, site)?)?;
        info!(sheet = self.sheet_name(), station = %site.display_name, "weather data written");
        Ok(())
    }

    /// Select the site's dataset (and elevation) as the active one
    pub fn write_active_dataset(&self, conn: &mut dyn DocumentConnection, site: &PhxSite) -> PhppResult<()> {
        let header_row = self.active_dataset_row(&*conn)?;
        write_items(conn, active_dataset_items(&self.shape.climate, header_row, site)?)?;
        info!(
            sheet = self.sheet_name(),
            country = %site.phpp_codes.country_code,
            dataset = %site.phpp_codes.dataset_name,
            "active climate dataset set"
        );
        Ok(())
    }

    pub fn active_dataset(&self, conn: &dyn DocumentConnection) -> PhppResult<ActiveDataset> {
        let active = &self.shape.climate.active_dataset;
        let header_row = self.active_dataset_row(conn)?;
        let sheet = self.sheet_name();
        let cell = |column: &str, offset: u32| -> PhppResult<String> {
            Ok(read_cell(conn, sheet, column, header_row + offset)?.to_string())
        };
        Ok(ActiveDataset {
            country: cell(&active.input_columns.country, active.input_rows.country)?,
            region: cell(&active.input_columns.region, active.input_rows.region)?,
            dataset: cell(&active.input_columns.dataset, active.input_rows.dataset)?,
        })
    }
}
