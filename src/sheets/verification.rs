//! Verification worksheet: certification settings and building parameters

use crate::error::PhppResult;
use crate::model::project::{PhBuildingData, PhiCertSettings};
use crate::shape::model::{LocatedInput, PhppShape};
use crate::sheets::{located_item, located_unit_item, write_items};
use crate::xl::connection::DocumentConnection;
use crate::xl::item::AddressedWriteItem;
use std::rc::Rc;
use tracing::info;

#[derive(Debug)]
pub struct VerificationSheet {
    shape: Rc<PhppShape>,
}

impl VerificationSheet {
    pub fn new(shape: Rc<PhppShape>) -> Self {
        Self { shape }
    }

    pub fn sheet_name(&self) -> &str {
        &self.shape.verification.name
    }

    /// Option text for an enum setting, placed at its labelled input
    fn option_item(
        &self,
        conn: &dyn DocumentConnection,
        field: &str,
        input: &LocatedInput,
        value: u32,
    ) -> PhppResult<AddressedWriteItem> {
        let text = input.option(field, self.sheet_name(), &value.to_string())?;
        located_item(conn, self.sheet_name(), input, text)
    }

    /// Write the certification settings and, when present, the building
    /// parameters (dwelling units, setpoints and mechanical cooling)
    pub fn write_certification(
        &self,
        conn: &mut dyn DocumentConnection,
        settings: &PhiCertSettings,
        building: Option<&PhBuildingData>,
    ) -> PhppResult<()> {
        let v = &self.shape.verification;
        let sheet = v.name.as_str();
        let read = &*conn;

        let mut items = vec![
            self.option_item(read, "phi_building_category_type", &v.phi_building_category_type, settings.phi_building_category_type)?,
            self.option_item(read, "phi_building_use_type", &v.phi_building_use_type, settings.phi_building_use_type)?,
            self.option_item(read, "phi_building_ihg_type", &v.phi_building_ihg_type, settings.phi_building_ihg_type)?,
            self.option_item(read, "phi_building_occupancy_type", &v.phi_building_occupancy_type, settings.phi_building_occupancy_type)?,
            self.option_item(read, "phi_certification_type", &v.phi_certification_type, settings.phi_certification_type)?,
            self.option_item(read, "phi_certification_class", &v.phi_certification_class, settings.phi_certification_class)?,
            self.option_item(read, "phi_pe_type", &v.phi_pe_type, settings.phi_pe_type)?,
            self.option_item(read, "phi_enerphit_type", &v.phi_enerphit_type, settings.phi_enerphit_type)?,
            self.option_item(read, "phi_retrofit_type", &v.phi_retrofit_type, settings.phi_retrofit_type)?,
        ];

        if let Some(data) = building {
            items.push(located_item(read, sheet, &v.num_of_units, data.num_of_units)?);
            items.push(located_unit_item(read, sheet, &v.setpoint_winter, data.setpoints.winter, "C")?);
            items.push(located_unit_item(read, sheet, &v.setpoint_summer, data.setpoints.summer, "C")?);
            items.push(self.option_item(
                read,
                "mechanical_cooling",
                &v.mechanical_cooling,
                u32::from(data.mechanical_cooling),
            )?);
        }

        write_items(conn, items)?;
        info!(sheet, building_data = building.is_some(), "certification settings written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhppError;
    use crate::model::project::Setpoints;
    use crate::shape::catalog::ShapeCatalog;
    use crate::xl::memory::MemoryWorkbook;
    use crate::xl::value::CellValue;

    fn workbook() -> MemoryWorkbook {
        let mut wb = MemoryWorkbook::new();
        let labels = [
            "Building category:",
            "Building type/use:",
            "Internal heat gains:",
            "Occupancy:",
            "Energy standard:",
            "Class:",
            "Primary energy:",
            "EnerPHit verification:",
            "New construction/retrofit:",
        ];
        for (i, label) in labels.iter().enumerate() {
            wb.set("Verification", &format!("R{}", 20 + i), *label).unwrap();
        }
        wb.set("Verification", "E30", "Number of dwelling units").unwrap();
        wb.set("Verification", "E31", "Interior temperature winter").unwrap();
        wb.set("Verification", "E32", "Interior temp. summer").unwrap();
        wb.set("Verification", "E33", "Mechanical cooling").unwrap();
        wb
    }

    fn sheet() -> VerificationSheet {
        VerificationSheet::new(Rc::new(ShapeCatalog::Embedded.load("EN_10_6.json").unwrap()))
    }

    #[test]
    fn test_settings_and_building_data() {
        let mut wb = workbook();
        let data = PhBuildingData {
            num_of_units: 4,
            setpoints: Setpoints {
                winter: 20.0,
                summer: 25.0,
            },
            mechanical_cooling: true,
            airtightness_n50: 0.6,
            wind_coefficient_e: 0.07,
            wind_coefficient_f: 15.0,
        };
        sheet()
            .write_certification(&mut wb, &PhiCertSettings::default(), Some(&data))
            .unwrap();

        assert_eq!(wb.get("Verification", "T20").unwrap(), CellValue::text("1-Residential building"));
        assert_eq!(wb.get("Verification", "J30").unwrap(), CellValue::Number(4.0));
        assert_eq!(wb.get("Verification", "J32").unwrap(), CellValue::Number(25.0));
        assert_eq!(wb.get("Verification", "J33").unwrap(), CellValue::text("x"));
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        let mut wb = workbook();
        let settings = PhiCertSettings {
            phi_building_category_type: 99,
            ..Default::default()
        };
        let err = sheet().write_certification(&mut wb, &settings, None).unwrap_err();
        assert!(matches!(err, PhppError::MissingOption { .. }));
    }
}
