//! The PHX project: building, site, certification settings and equipment
//! of one or more variants, plus the shared construction libraries

use crate::error::{PhppError, PhppResult};
use crate::model::constructions::{PhxConstructionOpaque, PhxConstructionWindow};
use crate::model::elec::ElecDevice;
use crate::model::geometry::PhxPolygon;
use crate::model::ids::IdAllocator;
use crate::model::mech::PhxMechanicalCollection;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVELOPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceType {
    #[default]
    Wall,
    Floor,
    RoofCeiling,
    AirBoundary,
    Adiabatic,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    #[default]
    Exterior,
    Ground,
    /// Adjacent to another conditioned surface
    Surface,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadingDimensions {
    #[serde(default)]
    pub h_hori: f64,
    #[serde(default)]
    pub d_hori: f64,
    #[serde(default)]
    pub o_reveal: f64,
    #[serde(default)]
    pub d_reveal: f64,
    #[serde(default)]
    pub o_over: f64,
    #[serde(default)]
    pub d_over: f64,
}

fn unshaded() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxApertureElement {
    pub polygon: PhxPolygon,
    #[serde(default)]
    pub shading_dimensions: Option<ShadingDimensions>,
    #[serde(default = "unshaded")]
    pub winter_shading_factor: f64,
    #[serde(default = "unshaded")]
    pub summer_shading_factor: f64,
}

/// A window (possibly split into several elements)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxAperture {
    pub display_name: String,
    /// Name of the variant window type, usually the window type name
    #[serde(default)]
    pub variant_type_name: String,
    pub window_type_name: String,
    pub elements: Vec<PhxApertureElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxComponentOpaque {
    #[serde(default)]
    pub face_type: FaceType,
    #[serde(default)]
    pub exposure_exterior: Exposure,
    pub assembly_type_name: String,
    pub polygons: Vec<PhxPolygon>,
    #[serde(default)]
    pub apertures: Vec<PhxAperture>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalBridgeType {
    #[default]
    Ambient,
    Perimeter,
    Underground,
}

impl ThermalBridgeType {
    /// PHPP group number of the thermal bridge type
    pub fn group_number(self) -> u32 {
        match self {
            ThermalBridgeType::Ambient => 15,
            ThermalBridgeType::Perimeter => 16,
            ThermalBridgeType::Underground => 17,
        }
    }
}

fn frsi_default() -> f64 {
    0.75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxThermalBridge {
    pub display_name: String,
    #[serde(default)]
    pub group_type: ThermalBridgeType,
    #[serde(default = "one_f")]
    pub quantity: f64,
    /// M
    pub length: f64,
    /// W/MK
    pub psi_value: f64,
    #[serde(default = "frsi_default")]
    pub frsi_value: f64,
}

fn one_f() -> f64 {
    1.0
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPACES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceVentilation {
    /// M3/HR
    #[serde(default)]
    pub flow_supply: f64,
    #[serde(default)]
    pub flow_extract: f64,
    #[serde(default)]
    pub flow_transfer: f64,
    /// Ventilation utilization pattern; `None` uses the default pattern
    #[serde(default)]
    pub schedule_id_num: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxSpace {
    pub display_name: String,
    #[serde(default = "one_u")]
    pub quantity: u32,
    /// M2, weighted (iCFA/TFA)
    pub floor_area: f64,
    /// M
    #[serde(default = "clear_height_default")]
    pub clear_height: f64,
    #[serde(default)]
    pub vent_unit_id_num: Option<u32>,
    #[serde(default)]
    pub ventilation: SpaceVentilation,
}

fn one_u() -> u32 {
    1
}

fn clear_height_default() -> f64 {
    2.5
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxZone {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub spaces: Vec<PhxSpace>,
    #[serde(default)]
    pub thermal_bridges: Vec<PhxThermalBridge>,
    #[serde(default)]
    pub elec_equipment: Vec<ElecDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxBuilding {
    #[serde(default)]
    pub opaque_components: Vec<PhxComponentOpaque>,
    #[serde(default)]
    pub zones: Vec<PhxZone>,
    /// M2; when unset the TFA is the sum of the space floor areas
    #[serde(default)]
    pub tfa_override: Option<f64>,
    /// M3
    #[serde(default)]
    pub net_volume: f64,
}

impl PhxBuilding {
    pub fn all_spaces(&self) -> impl Iterator<Item = &PhxSpace> {
        self.zones.iter().flat_map(|z| z.spaces.iter())
    }

    pub fn all_thermal_bridges(&self) -> impl Iterator<Item = &PhxThermalBridge> {
        self.zones.iter().flat_map(|z| z.thermal_bridges.iter())
    }

    pub fn all_elec_equipment(&self) -> impl Iterator<Item = &ElecDevice> {
        self.zones.iter().flat_map(|z| z.elec_equipment.iter())
    }

    pub fn all_apertures(&self) -> impl Iterator<Item = &PhxAperture> {
        self.opaque_components.iter().flat_map(|c| c.apertures.iter())
    }

    pub fn weighted_floor_area(&self) -> f64 {
        self.tfa_override
            .unwrap_or_else(|| self.all_spaces().map(|s| s.floor_area * s.quantity as f64).sum())
    }

    /// The opaque polygon with this id
    pub fn polygon_by_id(&self, id_num: u32) -> Option<&PhxPolygon> {
        self.opaque_components
            .iter()
            .flat_map(|c| c.polygons.iter())
            .find(|p| p.id_num == id_num)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VENTILATION PATTERNS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingPeriod {
    /// Hours per day
    #[serde(default)]
    pub period_operating_hours: f64,
    /// Fraction of the design flow
    #[serde(default)]
    pub period_operation_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPeriods {
    pub high: OperatingPeriod,
    pub standard: OperatingPeriod,
    pub basic: OperatingPeriod,
    pub minimum: OperatingPeriod,
}

impl Default for OperatingPeriods {
    fn default() -> Self {
        let period = |hours, speed| OperatingPeriod {
            period_operating_hours: hours,
            period_operation_speed: speed,
        };
        Self {
            high: period(0.0, 1.0),
            standard: period(24.0, 0.77),
            basic: period(0.0, 0.54),
            minimum: period(0.0, 0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationPattern {
    #[serde(default)]
    pub id_num: u32,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "hours_default")]
    pub operating_hours: f64,
    #[serde(default = "days_default")]
    pub operating_days: f64,
    #[serde(default)]
    pub holiday_days: f64,
    #[serde(default)]
    pub operating_periods: OperatingPeriods,
}

fn hours_default() -> f64 {
    24.0
}

fn days_default() -> f64 {
    7.0
}

impl Default for VentilationPattern {
    fn default() -> Self {
        Self {
            id_num: 0,
            display_name: "default".to_string(),
            operating_hours: hours_default(),
            operating_days: days_default(),
            holiday_days: 0.0,
            operating_periods: OperatingPeriods::default(),
        }
    }
}

impl VentilationPattern {
    /// Fractions of the day spent at high, standard and minimum speed.
    /// The minimum share is whatever is left so the three always add to 1.
    pub fn time_fractions(&self) -> (f64, f64, f64) {
        let p = &self.operating_periods;
        let high = p.high.period_operating_hours / 24.0;
        let standard = p.standard.period_operating_hours / 24.0;
        (high, standard, 1.0 - (high + standard))
    }

    /// High, standard and minimum speeds. The PHPP has no "basic" level, so
    /// basic and minimum are folded into one hours-weighted speed.
    pub fn speeds(&self) -> (f64, f64, f64) {
        let p = &self.operating_periods;
        let hours = p.basic.period_operating_hours + p.minimum.period_operating_hours;
        let minimum = if hours == 0.0 {
            0.0
        } else {
            (p.basic.period_operation_speed * p.basic.period_operating_hours
                + p.minimum.period_operation_speed * p.minimum.period_operating_hours)
                / hours
        };
        (
            p.high.period_operation_speed,
            p.standard.period_operation_speed,
            minimum,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SITE / CLIMATE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// M; when unset the PHPP uses the station elevation
    #[serde(default)]
    pub site_elevation: Option<f64>,
}

/// One peak-load design day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxClimatePeakLoad {
    pub temperature_air: f64,
    pub radiation_north: f64,
    pub radiation_east: f64,
    pub radiation_south: f64,
    pub radiation_west: f64,
    pub radiation_global: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxClimate {
    /// M
    pub station_elevation: f64,
    /// DELTA-C
    #[serde(default)]
    pub daily_temp_swing: f64,
    pub temperature_air: [f64; 12],
    pub radiation_north: [f64; 12],
    pub radiation_east: [f64; 12],
    pub radiation_south: [f64; 12],
    pub radiation_west: [f64; 12],
    pub radiation_global: [f64; 12],
    pub temperature_dewpoint: [f64; 12],
    pub temperature_sky: [f64; 12],
    #[serde(default)]
    pub peak_heating_1: PhxClimatePeakLoad,
    #[serde(default)]
    pub peak_heating_2: PhxClimatePeakLoad,
    #[serde(default)]
    pub peak_cooling_1: PhxClimatePeakLoad,
    #[serde(default)]
    pub peak_cooling_2: PhxClimatePeakLoad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhppClimateCodes {
    pub country_code: String,
    pub region_code: String,
    pub dataset_name: String,
}

impl Default for PhppClimateCodes {
    fn default() -> Self {
        Self {
            country_code: "ud---User-defined".to_string(),
            region_code: "All".to_string(),
            dataset_name: "ud---01-User-defined".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxSite {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub source: String,
    pub location: PhxLocation,
    pub climate: PhxClimate,
    #[serde(default)]
    pub phpp_codes: PhppClimateCodes,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CERTIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// PHI certification choices, as the numeric PHPP option codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhiCertSettings {
    pub phi_building_category_type: u32,
    pub phi_building_use_type: u32,
    pub phi_building_ihg_type: u32,
    pub phi_building_occupancy_type: u32,
    pub phi_certification_type: u32,
    pub phi_certification_class: u32,
    pub phi_pe_type: u32,
    pub phi_enerphit_type: u32,
    pub phi_retrofit_type: u32,
}

impl Default for PhiCertSettings {
    fn default() -> Self {
        Self {
            phi_building_category_type: 1,
            phi_building_use_type: 10,
            phi_building_ihg_type: 2,
            phi_building_occupancy_type: 1,
            phi_certification_type: 10,
            phi_certification_class: 10,
            phi_pe_type: 1,
            phi_enerphit_type: 2,
            phi_retrofit_type: 1,
        }
    }
}

fn cert_version_default() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhiCertification {
    /// Major PHPP version the settings were made for
    #[serde(default = "cert_version_default")]
    pub version: u32,
    #[serde(default)]
    pub settings: PhiCertSettings,
}

impl Default for PhiCertification {
    fn default() -> Self {
        Self {
            version: cert_version_default(),
            settings: PhiCertSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setpoints {
    /// C
    pub winter: f64,
    /// C
    pub summer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhBuildingData {
    #[serde(default = "one_u")]
    pub num_of_units: u32,
    /// ACH at 50 Pa
    pub airtightness_n50: f64,
    #[serde(default = "wind_e_default")]
    pub wind_coefficient_e: f64,
    #[serde(default = "wind_f_default")]
    pub wind_coefficient_f: f64,
    pub setpoints: Setpoints,
    #[serde(default)]
    pub mechanical_cooling: bool,
}

fn wind_e_default() -> f64 {
    0.07
}

fn wind_f_default() -> f64 {
    15.0
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxVariant {
    #[serde(default)]
    pub name: String,
    pub building: PhxBuilding,
    #[serde(default)]
    pub phi_cert: PhiCertification,
    #[serde(default)]
    pub ph_building_data: Option<PhBuildingData>,
    pub site: PhxSite,
    #[serde(default)]
    pub mech: PhxMechanicalCollection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxProject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assembly_types: Vec<PhxConstructionOpaque>,
    #[serde(default)]
    pub window_types: Vec<PhxConstructionWindow>,
    #[serde(default)]
    pub utilization_patterns_ventilation: Vec<VentilationPattern>,
    #[serde(default)]
    pub variants: Vec<PhxVariant>,
}

impl PhxProject {
    /// Load a project file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> PhppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut project: PhxProject = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        project.assign_missing_ids();
        Ok(project)
    }

    /// The single variant this project describes
    pub fn variant(&self) -> PhppResult<&PhxVariant> {
        match self.variants.as_slice() {
            [variant] => Ok(variant),
            [] => Err(PhppError::NoVariant),
            many => Err(PhppError::MultipleVariants(many.len())),
        }
    }

    pub fn assembly_type(&self, name: &str) -> Option<&PhxConstructionOpaque> {
        self.assembly_types.iter().find(|a| a.display_name == name)
    }

    pub fn window_type(&self, name: &str) -> Option<&PhxConstructionWindow> {
        self.window_types.iter().find(|w| w.display_name == name)
    }

    /// The ventilation pattern with this id, or the default pattern
    pub fn ventilation_pattern(&self, id_num: Option<u32>) -> VentilationPattern {
        id_num
            .and_then(|id| {
                self.utilization_patterns_ventilation
                    .iter()
                    .find(|p| p.id_num == id)
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Give every entity that still has id `0` a fresh id, per entity kind
    pub fn assign_missing_ids(&mut self) {
        let mut ids = IdAllocator::after(self.assembly_types.iter().map(|a| a.id_num));
        for assembly in &mut self.assembly_types {
            ids.fill(&mut assembly.id_num);
        }

        let mut ids = IdAllocator::after(self.window_types.iter().map(|w| w.id_num));
        for window in &mut self.window_types {
            ids.fill(&mut window.id_num);
        }

        let mut ids = IdAllocator::after(self.utilization_patterns_ventilation.iter().map(|p| p.id_num));
        for pattern in &mut self.utilization_patterns_ventilation {
            ids.fill(&mut pattern.id_num);
        }

        for variant in &mut self.variants {
            let used = variant
                .building
                .opaque_components
                .iter()
                .flat_map(|c| {
                    c.polygons
                        .iter()
                        .chain(c.apertures.iter().flat_map(|a| a.elements.iter().map(|e| &e.polygon)))
                })
                .map(|p| p.id_num)
                .collect::<Vec<_>>();
            let mut ids = IdAllocator::after(used);
            for component in &mut variant.building.opaque_components {
                for polygon in &mut component.polygons {
                    ids.fill(&mut polygon.id_num);
                }
                for aperture in &mut component.apertures {
                    for element in &mut aperture.elements {
                        ids.fill(&mut element.polygon.id_num);
                    }
                }
            }

            let mut ids = IdAllocator::after(variant.mech.ventilators.iter().map(|v| v.id_num));
            for ventilator in &mut variant.mech.ventilators {
                ids.fill(&mut ventilator.id_num);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_policy() {
        let mut project = PhxProject::default();
        assert!(matches!(project.variant(), Err(PhppError::NoVariant)));
        project.variants.push(PhxVariant::default());
        assert!(project.variant().is_ok());
        project.variants.push(PhxVariant::default());
        assert!(matches!(project.variant(), Err(PhppError::MultipleVariants(2))));
    }

    #[test]
    fn test_speeds_fold_basic_and_minimum() {
        let mut pattern = VentilationPattern::default();
        pattern.operating_periods.high.period_operating_hours = 6.0;
        pattern.operating_periods.standard.period_operating_hours = 12.0;
        pattern.operating_periods.basic = OperatingPeriod {
            period_operating_hours: 4.0,
            period_operation_speed: 0.5,
        };
        pattern.operating_periods.minimum = OperatingPeriod {
            period_operating_hours: 2.0,
            period_operation_speed: 0.2,
        };
        let (high, standard, minimum) = pattern.time_fractions();
        assert_eq!(high, 0.25);
        assert_eq!(standard, 0.5);
        assert_eq!(minimum, 0.25);
        let (_, _, min_speed) = pattern.speeds();
        assert!((min_speed - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_zero_hour_minimum_speed() {
        let (_, _, min_speed) = VentilationPattern::default().speeds();
        assert_eq!(min_speed, 0.0);
    }

    #[test]
    fn test_assign_missing_ids_keeps_existing() {
        let mut project = PhxProject {
            assembly_types: vec![
                PhxConstructionOpaque {
                    id_num: 3,
                    display_name: "A".to_string(),
                    layers: vec![],
                },
                PhxConstructionOpaque {
                    id_num: 0,
                    display_name: "B".to_string(),
                    layers: vec![],
                },
            ],
            ..Default::default()
        };
        project.assign_missing_ids();
        assert_eq!(project.assembly_types[0].id_num, 3);
        assert_eq!(project.assembly_types[1].id_num, 4);
    }

    #[test]
    fn test_tfa_falls_back_to_spaces() {
        let space = |area| PhxSpace {
            display_name: "Room".to_string(),
            quantity: 2,
            floor_area: area,
            clear_height: 2.5,
            vent_unit_id_num: None,
            ventilation: SpaceVentilation::default(),
        };
        let mut building = PhxBuilding {
            zones: vec![PhxZone {
                spaces: vec![space(10.0), space(5.0)],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(building.weighted_floor_area(), 30.0);
        building.tfa_override = Some(12.0);
        assert_eq!(building.weighted_floor_area(), 12.0);
    }
}
