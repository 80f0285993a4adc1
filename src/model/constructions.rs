//! Opaque assemblies and window types

use serde::{Deserialize, Serialize};

/// Name the PHPP reserves for thermal-mass-only layers
pub const MASS_MATERIAL_NAME: &str = "MAT_Mass";
const MASS_MATERIAL_CONDUCTIVITY: f64 = 100.0;

fn full_share() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxMaterial {
    pub display_name: String,
    /// W/MK
    pub conductivity: f64,
    /// Share of the layer this material takes (0..1)
    #[serde(default = "full_share")]
    pub percentage_of_assembly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxLayer {
    pub thickness_mm: f64,
    pub materials: Vec<PhxMaterial>,
}

impl PhxLayer {
    /// Mass layers only exist for the dynamic models and never go to the PHPP
    pub fn is_mass_layer(&self) -> bool {
        self.materials.iter().any(|m| {
            m.display_name == MASS_MATERIAL_NAME
                && (m.conductivity - MASS_MATERIAL_CONDUCTIVITY).abs() < f64::EPSILON
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxConstructionOpaque {
    #[serde(default)]
    pub id_num: u32,
    pub display_name: String,
    #[serde(default)]
    pub layers: Vec<PhxLayer>,
}

impl PhxConstructionOpaque {
    pub fn non_mass_layers(&self) -> impl Iterator<Item = &PhxLayer> {
        self.layers.iter().filter(|layer| !layer.is_mass_layer())
    }
}

/// One side of a window frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxWindowFrameElement {
    /// M
    pub width: f64,
    /// W/M2K
    pub u_value: f64,
    /// W/MK
    pub psi_glazing: f64,
    /// W/MK
    pub psi_install: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhxConstructionWindow {
    #[serde(default)]
    pub id_num: u32,
    pub display_name: String,
    pub glazing_type_display_name: String,
    pub frame_type_display_name: String,
    pub glass_g_value: f64,
    /// W/M2K
    pub u_value_glass: f64,
    pub frame_left: PhxWindowFrameElement,
    pub frame_right: PhxWindowFrameElement,
    pub frame_bottom: PhxWindowFrameElement,
    pub frame_top: PhxWindowFrameElement,
}

impl PhxConstructionWindow {
    /// Frame sides in PHPP column order
    pub fn frame_elements(&self) -> [&PhxWindowFrameElement; 4] {
        [
            &self.frame_left,
            &self.frame_right,
            &self.frame_bottom,
            &self.frame_top,
        ]
    }
}
