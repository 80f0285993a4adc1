//! Polygons as far as the PHPP needs them: area, orientation and size

use serde::{Deserialize, Serialize};

/// One planar surface of the building
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhxPolygon {
    #[serde(default)]
    pub id_num: u32,
    pub display_name: String,
    /// M2
    pub area: f64,
    /// Degrees clockwise from north
    #[serde(default)]
    pub cardinal_orientation_angle: f64,
    /// Degrees; 0 faces up, 90 is vertical
    #[serde(default = "vertical")]
    pub angle_from_horizontal: f64,
    /// M, apertures only
    #[serde(default)]
    pub width: f64,
    /// M, apertures only
    #[serde(default)]
    pub height: f64,
    /// `id_num` of the opaque polygon an aperture sits in
    #[serde(default)]
    pub host_polygon_id: Option<u32>,
}

fn vertical() -> f64 {
    90.0
}
