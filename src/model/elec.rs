//! Residential electric appliances

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterConnectedAppliance {
    #[serde(default)]
    pub in_conditioned_space: bool,
    /// kWh per use
    #[serde(default)]
    pub energy_demand_per_use: f64,
    /// 1 = DHW connection, 2 = cold water
    #[serde(default = "one")]
    pub water_connection: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClothesDryer {
    #[serde(default)]
    pub in_conditioned_space: bool,
    #[serde(default)]
    pub energy_demand_per_use: f64,
    /// 1-6; 6 is a gas exhaust-air dryer
    #[serde(default = "one")]
    pub dryer_type: u32,
    #[serde(default)]
    pub gas_consumption: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooling {
    #[serde(default)]
    pub in_conditioned_space: bool,
    /// kWh per day
    #[serde(default)]
    pub energy_demand_per_use: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooktop {
    #[serde(default)]
    pub energy_demand_per_use: f64,
    /// 1 = electric, 2 = natural gas, 3 = LPG
    #[serde(default = "one")]
    pub cooktop_type: u32,
}

/// Appliances the PHPP has no residential row for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherDevice {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub energy_demand: f64,
}

fn one() -> u32 {
    1
}

/// Every appliance kind a project may carry; unknown tags fail to load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "device_type", rename_all = "snake_case")]
pub enum ElecDevice {
    Dishwasher(WaterConnectedAppliance),
    ClothesWasher(WaterConnectedAppliance),
    ClothesDryer(ClothesDryer),
    Refrigerator(Cooling),
    Freezer(Cooling),
    FridgeFreezer(Cooling),
    Cooktop(Cooktop),
    Mel(OtherDevice),
    LightingInterior(OtherDevice),
    LightingExterior(OtherDevice),
    LightingGarage(OtherDevice),
    CustomElec(OtherDevice),
    CustomLighting(OtherDevice),
    CustomMel(OtherDevice),
}

impl ElecDevice {
    pub fn kind(&self) -> &'static str {
        match self {
            ElecDevice::Dishwasher(_) => "dishwasher",
            ElecDevice::ClothesWasher(_) => "clothes_washer",
            ElecDevice::ClothesDryer(_) => "clothes_dryer",
            ElecDevice::Refrigerator(_) => "refrigerator",
            ElecDevice::Freezer(_) => "freezer",
            ElecDevice::FridgeFreezer(_) => "fridge_freezer",
            ElecDevice::Cooktop(_) => "cooktop",
            ElecDevice::Mel(_) => "mel",
            ElecDevice::LightingInterior(_) => "lighting_interior",
            ElecDevice::LightingExterior(_) => "lighting_exterior",
            ElecDevice::LightingGarage(_) => "lighting_garage",
            ElecDevice::CustomElec(_) => "custom_elec",
            ElecDevice::CustomLighting(_) => "custom_lighting",
            ElecDevice::CustomMel(_) => "custom_mel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_device_loads() {
        let json = r#"{"device_type": "clothes_dryer", "dryer_type": 6, "gas_consumption": 2.5}"#;
        let device: ElecDevice = serde_json::from_str(json).unwrap();
        match device {
            ElecDevice::ClothesDryer(dryer) => {
                assert_eq!(dryer.dryer_type, 6);
                assert_eq!(dryer.gas_consumption, 2.5);
            }
            other => panic!("unexpected device {:?}", other),
        }
    }

    #[test]
    fn test_unknown_device_type_fails() {
        let json = r#"{"device_type": "hot_tub"}"#;
        assert!(serde_json::from_str::<ElecDevice>(json).is_err());
    }
}
