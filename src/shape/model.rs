//! The PHPP "shape": worksheet names, section markers and input columns for
//! one PHPP version and language
//!
//! A shape is loaded once per workbook from a JSON catalog entry and is then
//! shared read-only by every sheet controller.

use crate::error::{PhppError, PhppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════════
// LEAF TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// A single cell coordinate with the unit the cell expects.
///
/// Inside a table section only `column` is used (the row comes from the
/// locator). Inside fixed blocks `row` is an offset from the block start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub row: Option<i32>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl InputItem {
    /// The configured column, or `MissingShapeField` naming `field`
    pub fn column_for(&self, field: &str, sheet: &str, marker: &str) -> PhppResult<&str> {
        self.column.as_deref().ok_or_else(|| PhppError::MissingShapeField {
            field: field.to_string(),
            sheet: sheet.to_string(),
            marker: marker.to_string(),
            part: "column",
        })
    }

    /// The configured row (offset), or `MissingShapeField` naming `field`
    pub fn row_for(&self, field: &str, sheet: &str, marker: &str) -> PhppResult<i32> {
        self.row.ok_or_else(|| PhppError::MissingShapeField {
            field: field.to_string(),
            sheet: sheet.to_string(),
            marker: marker.to_string(),
            part: "row",
        })
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// How a locator compares a cell with its marker string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Cell text equals the marker
    #[default]
    Equals,
    /// Cell text contains the marker
    Contains,
    /// Cell coerced through `int(float(x))` equals the marker
    Numeric,
}

fn default_search_start() -> u32 {
    1
}

fn default_entry_match() -> MatchMode {
    MatchMode::Numeric
}

fn default_end_row_offset() -> i32 {
    -1
}

/// Where a section header sits: a marker string in a locator column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderShape {
    pub locator_col_header: String,
    pub locator_string_header: String,
    #[serde(default)]
    pub header_match: MatchMode,
    #[serde(default = "default_search_start")]
    pub header_search_start: u32,
}

/// How to find a repeating table: its header, first entry and last entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionShape {
    #[serde(flatten)]
    pub header: HeaderShape,
    pub locator_col_entry: String,
    pub locator_string_entry: String,
    #[serde(default = "default_entry_match")]
    pub entry_match: MatchMode,
    /// Distance from the matched entry marker to the first writable row
    #[serde(default)]
    pub entry_row_offset: i32,
    /// Explicit end-of-section marker; without one the table ends at the
    /// first row whose entry column is not an integer
    #[serde(default)]
    pub locator_string_end: Option<String>,
    /// Column holding the end marker (defaults to the entry column)
    #[serde(default)]
    pub locator_col_end: Option<String>,
    /// Distance from the row that ends the scan to the last entry row
    #[serde(default = "default_end_row_offset")]
    pub end_row_offset: i32,
}

impl SectionShape {
    pub fn end_column(&self) -> &str {
        self.locator_col_end
            .as_deref()
            .unwrap_or(&self.locator_col_entry)
    }
}

/// A repeating table plus the columns of its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableShape<I> {
    #[serde(flatten)]
    pub locator: SectionShape,
    pub inputs: I,
}

impl<I> TableShape<I> {
    pub fn marker(&self) -> &str {
        &self.locator.header.locator_string_header
    }
}

/// A single input cell found by scanning for a label.
///
/// The value goes into `input_column` at the label's row plus
/// `input_row_offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedInput {
    pub locator_col: String,
    pub locator_string: String,
    pub input_column: String,
    #[serde(default)]
    pub input_row_offset: i32,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl LocatedInput {
    /// Look up the PHPP option text for a domain enum value
    pub fn option(&self, field: &str, sheet: &str, key: &str) -> PhppResult<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| PhppError::MissingOption {
                field: field.to_string(),
                sheet: sheet.to_string(),
                option: key.to_string(),
            })
    }
}

/// Option text keyed by the domain enum value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsMap {
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationShape {
    pub name: String,
    pub phi_building_category_type: LocatedInput,
    pub phi_building_use_type: LocatedInput,
    pub phi_building_ihg_type: LocatedInput,
    pub phi_building_occupancy_type: LocatedInput,
    pub phi_certification_type: LocatedInput,
    pub phi_certification_class: LocatedInput,
    pub phi_pe_type: LocatedInput,
    pub phi_enerphit_type: LocatedInput,
    pub phi_retrofit_type: LocatedInput,
    pub num_of_units: LocatedInput,
    pub setpoint_winter: LocatedInput,
    pub setpoint_summer: LocatedInput,
    pub mechanical_cooling: LocatedInput,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantBlock {
    #[serde(flatten)]
    pub header: HeaderShape,
    pub input_col: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantVentilationNames {
    pub vent_type: String,
    pub air_change_rate: String,
    pub design_flow_rate: String,
    pub install_location: String,
    pub ventilator_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantVentilation {
    #[serde(flatten)]
    pub header: HeaderShape,
    pub input_col: String,
    pub input_item_names: VariantVentilationNames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantsShape {
    pub name: String,
    /// Column holding the value of the active variant for each input row
    pub active_value_column: String,
    pub input_header: HeaderShape,
    pub assemblies: VariantBlock,
    pub windows: VariantBlock,
    pub ventilation: VariantVentilation,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLIMATE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDatasetColumns {
    pub country: String,
    pub region: String,
    pub dataset: String,
    pub elevation_override: String,
}

/// Row offsets from the active-dataset header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDatasetRows {
    pub country: u32,
    pub region: u32,
    pub dataset: u32,
    pub elevation_override: u32,
}

/// Formula written when the site has no elevation of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationFallback {
    pub address: String,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDatasetShape {
    #[serde(flatten)]
    pub header: HeaderShape,
    pub input_columns: ActiveDatasetColumns,
    pub input_rows: ActiveDatasetRows,
    #[serde(default)]
    pub elevation_unit: Option<String>,
    pub elevation_fallback: ElevationFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdBlockColumns {
    /// January … December
    pub months: [String; 12],
    pub peak_heating_1: String,
    pub peak_heating_2: String,
    pub peak_cooling_1: String,
    pub peak_cooling_2: String,
    pub latitude: String,
    pub longitude: String,
    pub elevation: String,
    pub elevation_unit: String,
    pub display_name: String,
    pub summer_delta_t: String,
    pub summer_delta_t_unit: String,
    pub source: String,
}

/// Row offsets (and units) of the monthly rows below the block start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdBlockRows {
    pub temperature_air: InputItem,
    pub radiation_north: InputItem,
    pub radiation_east: InputItem,
    pub radiation_south: InputItem,
    pub radiation_west: InputItem,
    pub radiation_global: InputItem,
    pub temperature_dewpoint: InputItem,
    pub temperature_sky: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdBlockShape {
    pub start_row: u32,
    pub input_columns: UdBlockColumns,
    pub input_rows: UdBlockRows,
    #[serde(default)]
    pub peak_radiation_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateShape {
    pub name: String,
    pub active_dataset: ActiveDatasetShape,
    pub ud_block: UdBlockShape,
}

// ═══════════════════════════════════════════════════════════════════════════════
// U-VALUES
// ═══════════════════════════════════════════════════════════════════════════════

fn default_constructor_search_end() -> u32 {
    1730
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInputs {
    pub display_name: InputItem,
    pub r_si: InputItem,
    pub r_se: InputItem,
    pub interior_insulation: InputItem,
    pub sec_1_description: InputItem,
    pub sec_1_conductivity: InputItem,
    pub sec_2_description: InputItem,
    pub sec_2_conductivity: InputItem,
    pub sec_2_percentage: InputItem,
    pub sec_3_description: InputItem,
    pub sec_3_conductivity: InputItem,
    pub sec_3_percentage: InputItem,
    pub thickness: InputItem,
    pub variants_layer_name: String,
    pub variants_conductivity: String,
    pub variants_thickness: String,
    pub phpp_id_num_col_offset: i32,
    pub name_row_offset: u32,
    pub rsi_row_offset: u32,
    pub rse_row_offset: u32,
    pub first_layer_row_offset: u32,
    pub last_layer_row_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorShape {
    pub locator_col_header: String,
    pub locator_string_header: String,
    /// Other labels that also start a constructor block
    #[serde(default)]
    pub alternate_header_strings: Vec<String>,
    #[serde(default = "default_constructor_search_end")]
    pub search_end_row: u32,
    pub inputs: ConstructorInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UValuesShape {
    pub name: String,
    pub constructor: ConstructorShape,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AREAS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInputs {
    pub id: InputItem,
    pub description: InputItem,
    pub group_number: InputItem,
    pub quantity: InputItem,
    pub area: InputItem,
    pub assembly_id: InputItem,
    pub orientation: InputItem,
    pub angle: InputItem,
    pub shading: InputItem,
    pub absorptivity: InputItem,
    pub emissivity: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalBridgeInputs {
    pub description: InputItem,
    pub group_number: InputItem,
    pub quantity: InputItem,
    pub length: InputItem,
    pub psi_value: InputItem,
    #[serde(rename = "fRsi_value")]
    pub frsi_value: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreasShape {
    pub name: String,
    pub surface_rows: TableShape<SurfaceInputs>,
    pub thermal_bridge_rows: TableShape<ThermalBridgeInputs>,
    pub tfa_input: LocatedInput,
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlazingInputs {
    pub id: InputItem,
    pub description: InputItem,
    pub g_value: InputItem,
    pub u_value: InputItem,
}

/// Glazings start at a fixed row instead of being located by scanning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlazingsShape {
    #[serde(flatten)]
    pub locator: SectionShape,
    pub header_start_row: u32,
    pub entry_start_row: u32,
    pub inputs: GlazingInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    pub id: InputItem,
    pub description: InputItem,
    pub u_value_left: InputItem,
    pub u_value_right: InputItem,
    pub u_value_bottom: InputItem,
    pub u_value_top: InputItem,
    pub width_left: InputItem,
    pub width_right: InputItem,
    pub width_bottom: InputItem,
    pub width_top: InputItem,
    pub psi_g_left: InputItem,
    pub psi_g_right: InputItem,
    pub psi_g_bottom: InputItem,
    pub psi_g_top: InputItem,
    pub psi_i_left: InputItem,
    pub psi_i_right: InputItem,
    pub psi_i_bottom: InputItem,
    pub psi_i_top: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilatorInputs {
    pub id: InputItem,
    pub display_name: InputItem,
    pub sensible_heat_recovery: InputItem,
    pub latent_heat_recovery: InputItem,
    pub electric_efficiency: InputItem,
    pub min_m3h: InputItem,
    pub max_m3h: InputItem,
    pub frost_protection_reqd: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentsShape {
    pub name: String,
    pub glazings: GlazingsShape,
    pub frames: TableShape<FrameInputs>,
    pub ventilators: TableShape<VentilatorInputs>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// WINDOWS / SHADING
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInputs {
    pub variant_input: InputItem,
    pub quantity: InputItem,
    pub description: InputItem,
    pub host: InputItem,
    pub glazing_id: InputItem,
    pub frame_id: InputItem,
    pub width: InputItem,
    pub height: InputItem,
    pub psi_i_left: InputItem,
    pub psi_i_right: InputItem,
    pub psi_i_bottom: InputItem,
    pub psi_i_top: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowsShape {
    pub name: String,
    pub window_rows: TableShape<WindowInputs>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingInputs {
    pub h_hori: InputItem,
    pub d_hori: InputItem,
    pub o_reveal: InputItem,
    pub d_reveal: InputItem,
    pub o_over: InputItem,
    pub d_over: InputItem,
    pub r_other_winter: InputItem,
    pub r_other_summer: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingShape {
    pub name: String,
    pub shading_rows: TableShape<ShadingInputs>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VENTILATION / ADDITIONAL VENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationShape {
    pub name: String,
    pub vent_type: LocatedInput,
    pub wind_coeff_e: LocatedInput,
    pub wind_coeff_f: LocatedInput,
    pub airtightness_n50: LocatedInput,
    #[serde(rename = "airtightness_Vn50")]
    pub airtightness_vn50: LocatedInput,
    pub multi_unit_on: LocatedInput,
    /// Column on this sheet holding the Variants-linked values
    pub variants_col: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInputs {
    pub quantity: InputItem,
    pub display_name: InputItem,
    pub vent_unit_assigned: InputItem,
    pub weighted_floor_area: InputItem,
    pub clear_height: InputItem,
    #[serde(rename = "V_sup")]
    pub v_sup: InputItem,
    #[serde(rename = "V_eta")]
    pub v_eta: InputItem,
    #[serde(rename = "V_trans")]
    pub v_trans: InputItem,
    pub operating_hours: InputItem,
    pub operating_days: InputItem,
    pub holiday_days: InputItem,
    pub period_high_speed: InputItem,
    pub period_high_time: InputItem,
    pub period_standard_speed: InputItem,
    pub period_standard_time: InputItem,
    pub period_minimum_speed: InputItem,
    pub period_minimum_time: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitInputs {
    /// Sequential unit number the rooms table refers to
    pub unit_number: InputItem,
    pub quantity: InputItem,
    pub display_name: InputItem,
    pub unit_selected: InputItem,
    pub temperature_below_defrost_used: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuctInputs {
    pub quantity: InputItem,
    pub diameter: InputItem,
    pub insul_thickness: InputItem,
    pub insul_conductivity: InputItem,
    pub insul_reflective: InputItem,
    pub sup_air_duct_len: InputItem,
    pub oda_air_duct_len: InputItem,
    /// One assignment column per ventilation unit number, in order
    pub duct_assign: Vec<InputItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddnlVentShape {
    pub name: String,
    pub rooms: TableShape<RoomInputs>,
    pub units: TableShape<UnitInputs>,
    pub ducts: TableShape<DuctInputs>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DHW
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecircPipingRows {
    pub total_length: InputItem,
    pub diameter: InputItem,
    pub insul_thickness: InputItem,
    pub insul_reflective: InputItem,
    pub insul_conductivity: InputItem,
    pub daily_period: InputItem,
    pub water_temp: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPipingRows {
    pub diameter: InputItem,
    pub total_length: InputItem,
    pub num_taps: InputItem,
}

/// Piping groups are columns: group N goes `N - 1` columns right of
/// `input_col_start`, each field at a row offset below the header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipingShape<R> {
    #[serde(flatten)]
    pub header: HeaderShape,
    pub input_rows_offset: R,
    pub input_col_start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankColumns {
    pub tank_1: String,
    pub tank_2: String,
    pub tank_buffer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRows {
    pub tank_type: InputItem,
    pub standby_losses: InputItem,
    pub storage_capacity: InputItem,
    pub standby_fraction: InputItem,
    pub tank_location: InputItem,
    pub water_temp: InputItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TanksShape {
    pub entry_row_start: u32,
    pub input_columns: TankColumns,
    pub tank_type: OptionsMap,
    pub tank_location: OptionsMap,
    pub input_rows: TankRows,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DhwShape {
    pub name: String,
    pub recirc_piping: PipingShape<RecircPipingRows>,
    pub branch_piping: PipingShape<BranchPipingRows>,
    pub tanks: TanksShape,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELECTRICITY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityColumns {
    pub selection: String,
    pub used: String,
    pub in_conditioned_space: String,
    pub energy_demand_per_use: String,
    pub utilization_factor: String,
    pub frequency: String,
}

/// One appliance: its data row, its selection row and the selection texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityInputRow {
    pub data: u32,
    pub selection: u32,
    #[serde(default)]
    pub selection_options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityRows {
    pub dishwasher: ElectricityInputRow,
    pub clothes_washing: ElectricityInputRow,
    pub clothes_drying: ElectricityInputRow,
    pub refrigerator: ElectricityInputRow,
    pub freezer: ElectricityInputRow,
    pub fridge_freezer: ElectricityInputRow,
    pub cooking: ElectricityInputRow,
    pub lighting: ElectricityInputRow,
    pub lighting_interior: ElectricityInputRow,
    pub lighting_exterior: ElectricityInputRow,
    pub consumer_elec: ElectricityInputRow,
    pub small_appliances: ElectricityInputRow,
}

impl ElectricityRows {
    /// Rows whose `used` flag is cleared before appliances are written
    pub fn resettable(&self) -> [(&'static str, &ElectricityInputRow); 7] {
        [
            ("dishwasher", &self.dishwasher),
            ("clothes_washing", &self.clothes_washing),
            ("refrigerator", &self.refrigerator),
            ("freezer", &self.freezer),
            ("fridge_freezer", &self.fridge_freezer),
            ("lighting_interior", &self.lighting_interior),
            ("lighting_exterior", &self.lighting_exterior),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityShape {
    pub name: String,
    pub input_columns: ElectricityColumns,
    pub input_rows: ElectricityRows,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MISC
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSheet {
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

/// The complete shape of one PHPP version/language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhppShape {
    #[serde(rename = "VERIFICATION")]
    pub verification: VerificationShape,
    #[serde(rename = "VARIANTS")]
    pub variants: VariantsShape,
    #[serde(rename = "CLIMATE")]
    pub climate: ClimateShape,
    #[serde(rename = "UVALUES")]
    pub u_values: UValuesShape,
    #[serde(rename = "AREAS")]
    pub areas: AreasShape,
    #[serde(rename = "COMPONENTS")]
    pub components: ComponentsShape,
    #[serde(rename = "WINDOWS")]
    pub windows: WindowsShape,
    #[serde(rename = "SHADING")]
    pub shading: ShadingShape,
    #[serde(rename = "VENTILATION")]
    pub ventilation: VentilationShape,
    #[serde(rename = "ADDNL_VENT")]
    pub addnl_vent: AddnlVentShape,
    #[serde(rename = "DHW")]
    pub dhw: DhwShape,
    #[serde(rename = "ELECTRICITY")]
    pub electricity: ElectricityShape,
    #[serde(rename = "EASY_PH")]
    pub easy_ph: NamedSheet,
}

impl PhppShape {
    /// Parse a shape document.
    ///
    /// Each top-level section is decoded on its own so that an error names
    /// the section it came from, e.g. `AREAS: missing field 'surface_rows'`.
    pub fn from_json(key: &str, text: &str) -> PhppResult<Self> {
        let root: serde_json::Value =
            serde_json::from_str(text).map_err(|e| PhppError::ShapeParse {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            verification: section(key, &root, "VERIFICATION")?,
            variants: section(key, &root, "VARIANTS")?,
            climate: section(key, &root, "CLIMATE")?,
            u_values: section(key, &root, "UVALUES")?,
            areas: section(key, &root, "AREAS")?,
            components: section(key, &root, "COMPONENTS")?,
            windows: section(key, &root, "WINDOWS")?,
            shading: section(key, &root, "SHADING")?,
            ventilation: section(key, &root, "VENTILATION")?,
            addnl_vent: section(key, &root, "ADDNL_VENT")?,
            dhw: section(key, &root, "DHW")?,
            electricity: section(key, &root, "ELECTRICITY")?,
            easy_ph: section(key, &root, "EASY_PH")?,
        })
    }
}

fn section<T: DeserializeOwned>(key: &str, root: &serde_json::Value, name: &str) -> PhppResult<T> {
    let value = root.get(name).ok_or_else(|| PhppError::ShapeParse {
        key: key.to_string(),
        message: format!("missing section '{}'", name),
    })?;
    T::deserialize(value).map_err(|e| PhppError::ShapeParse {
        key: key.to_string(),
        message: format!("{}: {}", name, e),
    })
}
