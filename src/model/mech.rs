//! Mechanical equipment: ventilators, ducts, hot-water tanks and piping

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxVentilator {
    #[serde(default)]
    pub id_num: u32,
    pub display_name: String,
    #[serde(default = "one")]
    pub quantity: u32,
    /// 0..1
    pub sensible_heat_recovery: f64,
    /// 0..1
    #[serde(default)]
    pub latent_heat_recovery: f64,
    /// WH/M3
    pub electric_efficiency: f64,
    #[serde(default = "yes")]
    pub frost_protection_reqd: bool,
    /// C
    #[serde(default = "defrost_default")]
    pub temperature_below_defrost_used: f64,
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

fn defrost_default() -> f64 {
    -5.0
}

/// A supply or outdoor-air duct run served by one ventilator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxDuct {
    #[serde(default = "one")]
    pub quantity: u32,
    pub diameter_mm: f64,
    pub insulation_thickness_mm: f64,
    /// W/MK
    pub insulation_conductivity: f64,
    #[serde(default)]
    pub insulation_reflective: bool,
    /// M
    #[serde(default)]
    pub supply_air_length: f64,
    /// M
    #[serde(default)]
    pub outdoor_air_length: f64,
    pub ventilator_id_num: u32,
}

/// PHPP tank type: 0 none, 1 DHW and heating, 2 DHW only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxHotWaterTank {
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default = "one")]
    pub tank_type: u32,
    /// W/K
    pub standby_losses: f64,
    /// LITER
    pub storage_capacity: f64,
    #[serde(default = "standby_default")]
    pub standby_fraction: f64,
    #[serde(default = "yes")]
    pub in_conditioned_space: bool,
    /// C
    #[serde(default = "water_temp_default")]
    pub water_temp: f64,
}

fn standby_default() -> f64 {
    0.3
}

fn water_temp_default() -> f64 {
    60.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxPipeSegment {
    #[serde(default)]
    pub display_name: String,
    /// M
    pub length: f64,
    pub diameter_mm: f64,
    #[serde(default)]
    pub insulation_thickness_mm: f64,
    /// W/MK
    #[serde(default = "pipe_conductivity_default")]
    pub insulation_conductivity: f64,
    #[serde(default)]
    pub insulation_reflective: bool,
    /// Hours per day the recirculation runs
    #[serde(default = "daily_period_default")]
    pub daily_period: f64,
}

fn pipe_conductivity_default() -> f64 {
    0.04
}

fn daily_period_default() -> f64 {
    24.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecircParams {
    /// C
    #[serde(default = "water_temp_default")]
    pub water_temp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxHotWaterSystem {
    #[serde(default)]
    pub tanks: Vec<PhxHotWaterTank>,
    #[serde(default)]
    pub branch_piping: Vec<PhxPipeSegment>,
    #[serde(default)]
    pub recirc_piping: Vec<PhxPipeSegment>,
    #[serde(default)]
    pub num_tap_points: u32,
    #[serde(default)]
    pub recirc_params: RecircParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxMechanicalCollection {
    #[serde(default)]
    pub ventilators: Vec<PhxVentilator>,
    #[serde(default)]
    pub ducts: Vec<PhxDuct>,
    #[serde(default)]
    pub hot_water: PhxHotWaterSystem,
}

impl PhxMechanicalCollection {
    pub fn ventilator_by_id(&self, id_num: u32) -> Option<&PhxVentilator> {
        self.ventilators.iter().find(|v| v.id_num == id_num)
    }
}
