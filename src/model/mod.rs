//! The PHX building model, loaded from JSON or YAML project files
//!
//! These types are plain data. Everything PHPP specific lives in the row
//! builders and sheet controllers.

pub mod constructions;
pub mod elec;
pub mod geometry;
pub mod ids;
pub mod mech;
pub mod project;

pub use constructions::{
    PhxConstructionOpaque, PhxConstructionWindow, PhxLayer, PhxMaterial, PhxWindowFrameElement,
};
pub use elec::ElecDevice;
pub use geometry::PhxPolygon;
pub use ids::IdAllocator;
pub use mech::{
    PhxDuct, PhxHotWaterSystem, PhxHotWaterTank, PhxMechanicalCollection, PhxPipeSegment,
    PhxVentilator,
};
pub use project::{
    Exposure, FaceType, PhxAperture, PhxApertureElement, PhxBuilding, PhxComponentOpaque,
    PhxProject, PhxSite, PhxSpace, PhxThermalBridge, PhxVariant, PhxZone, VentilationPattern,
};
