//! PHPP connection: one open workbook, its resolved shape and a controller
//! per worksheet
//!
//! [`PhppConnection`] owns the document for its whole lifetime. Each
//! `write_project_*` step gathers the domain objects of the project's single
//! variant, reads back the ids earlier steps placed in the workbook and hands
//! the rows to the worksheet's controller. [`PhppConnection::write_all`] runs
//! every step in dependency order.

use crate::error::{PhppError, PhppResult};
use crate::locator::{SectionLocation, SectionLocator};
use crate::model::project::{PhxAperture, PhxApertureElement, PhxProject};
use crate::rows::windows::WindowRefs;
use crate::shape::catalog::ShapeCatalog;
use crate::shape::model::PhppShape;
use crate::shape::resolver::ShapeResolver;
use crate::shape::version::PhppVersion;
use crate::sheets::addnl_vent::{DuctInput, SpaceInput, VentUnitInput};
use crate::sheets::areas::SurfaceInput;
use crate::sheets::hot_water::HotWaterReport;
use crate::sheets::variants::VariantId;
use crate::sheets::windows::WindowInput;
use crate::sheets::{
    truncate_to_capacity, AddnlVentSheet, AreasSheet, ClimateSheet, ComponentsSheet, ElectricitySheet,
    HotWaterSheet, ShadingSheet, UValuesSheet, VariantsSheet, VentilationSheet, VerificationSheet,
    WindowsSheet, WriteReport,
};
use crate::xl::connection::DocumentConnection;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Assemblies the Variants worksheet has layer rows for
pub const VARIANT_ASSEMBLY_CAPACITY: usize = 26;

/// Options for [`PhppConnection::write_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Link assemblies, windows and ventilation to the Variants worksheet
    /// once everything is written
    pub activate_variants: bool,
}

/// Rows written by each table step of [`PhppConnection::write_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub tables: Vec<(&'static str, WriteReport)>,
    pub variants_activated: bool,
}

impl WriteSummary {
    fn record(&mut self, table: &'static str, report: WriteReport) {
        self.tables.push((table, report));
    }

    /// Rows dropped because a table was full
    pub fn total_skipped(&self) -> usize {
        self.tables.iter().map(|(_, r)| r.skipped).sum()
    }

    pub fn report(&self, table: &str) -> Option<WriteReport> {
        self.tables.iter().find(|(t, _)| *t == table).map(|(_, r)| *r)
    }
}

/// An open PHPP workbook
pub struct PhppConnection<C: DocumentConnection> {
    conn: C,
    version: PhppVersion,
    shape_key: String,
    shape: Rc<PhppShape>,
    easy_ph: bool,
    verification: VerificationSheet,
    climate: ClimateSheet,
    u_values: UValuesSheet,
    components: ComponentsSheet,
    areas: AreasSheet,
    windows: WindowsSheet,
    shading: ShadingSheet,
    ventilation: VentilationSheet,
    addnl_vent: AddnlVentSheet,
    hot_water: HotWaterSheet,
    electricity: ElectricitySheet,
    variants: VariantsSheet,
}

impl<C: DocumentConnection> PhppConnection<C> {
    /// Resolve the workbook's version and shape and set up every controller.
    ///
    /// Only reads from the document.
    pub fn open(conn: C, catalog: ShapeCatalog) -> PhppResult<Self> {
        let resolved = ShapeResolver::new(catalog).resolve(&conn)?;
        let shape = Rc::new(resolved.shape);

        let easy_ph = conn
            .worksheet_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&shape.easy_ph.name));
        if easy_ph {
            info!(sheet = %shape.easy_ph.name, "easyPH workbook: only envelope data will be written");
        }

        Ok(Self {
            verification: VerificationSheet::new(Rc::clone(&shape)),
            climate: ClimateSheet::new(Rc::clone(&shape)),
            u_values: UValuesSheet::new(Rc::clone(&shape)),
            components: ComponentsSheet::new(Rc::clone(&shape)),
            areas: AreasSheet::new(Rc::clone(&shape)),
            windows: WindowsSheet::new(Rc::clone(&shape)),
            shading: ShadingSheet::new(Rc::clone(&shape)),
            ventilation: VentilationSheet::new(Rc::clone(&shape)),
            addnl_vent: AddnlVentSheet::new(Rc::clone(&shape)),
            hot_water: HotWaterSheet::new(Rc::clone(&shape)),
            electricity: ElectricitySheet::new(Rc::clone(&shape)),
            variants: VariantsSheet::new(Rc::clone(&shape)),
            conn,
            version: resolved.version,
            shape_key: resolved.key,
            shape,
            easy_ph,
        })
    }

    pub fn version(&self) -> &PhppVersion {
        &self.version
    }

    /// Catalog key of the shape in use, e.g. `EN_10_6.json`
    pub fn shape_key(&self) -> &str {
        &self.shape_key
    }

    pub fn shape(&self) -> &PhppShape {
        &self.shape
    }

    pub fn is_easy_ph(&self) -> bool {
        self.easy_ph
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Give the document back, e.g. to save it
    pub fn into_inner(self) -> C {
        self.conn
    }

    pub fn areas(&self) -> &AreasSheet {
        &self.areas
    }

    pub fn components(&self) -> &ComponentsSheet {
        &self.components
    }

    pub fn windows(&self) -> &WindowsSheet {
        &self.windows
    }

    pub fn u_values(&self) -> &UValuesSheet {
        &self.u_values
    }

    pub fn variants(&self) -> &VariantsSheet {
        &self.variants
    }

    pub fn addnl_vent(&self) -> &AddnlVentSheet {
        &self.addnl_vent
    }

    /// Every table section with its rows, or the error locating it hit
    pub fn section_locations(&self) -> Vec<(String, PhppResult<SectionLocation>)> {
        let sections: [(&str, &SectionLocator); 9] = [
            ("surfaces", self.areas.surfaces()),
            ("thermal bridges", self.areas.thermal_bridges()),
            ("glazings", self.components.glazings()),
            ("frames", self.components.frames()),
            ("ventilators", self.components.ventilators()),
            ("windows", self.windows.windows()),
            ("shading", self.shading.rows()),
            ("vent rooms", self.addnl_vent.rooms()),
            ("vent units", self.addnl_vent.units()),
        ];
        let mut found: Vec<(String, PhppResult<SectionLocation>)> = sections
            .iter()
            .map(|(name, locator)| {
                (
                    format!("{} / {}", locator.sheet(), name),
                    locator.location(&self.conn),
                )
            })
            .collect();
        found.push((
            format!("{} / ducts", self.addnl_vent.sheet_name()),
            self.addnl_vent.ducts().location(&self.conn),
        ));
        found
    }

    fn skip_easy_ph(&self, step: &str) -> bool {
        if self.easy_ph {
            debug!(step, "skipped for easyPH");
        }
        self.easy_ph
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CERTIFICATION / CLIMATE
    // ═══════════════════════════════════════════════════════════════════════

    /// Verification settings. Skipped with a warning when the project's
    /// certification version is not the workbook's major version.
    pub fn write_certification_config(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("certification") {
            return Ok(());
        }
        let variant = project.variant()?;
        if self.version.major() != Some(variant.phi_cert.version) {
            warn!(
                "The project's PHI certification version (V{}) does not match the PHPP version (V{}). Ignoring all writes to the '{}' worksheet.",
                variant.phi_cert.version,
                self.version.number_major,
                self.verification.sheet_name()
            );
            return Ok(());
        }
        self.verification.write_certification(
            &mut self.conn,
            &variant.phi_cert.settings,
            variant.ph_building_data.as_ref(),
        )
    }

    pub fn write_climate_data(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("climate") {
            return Ok(());
        }
        let site = &project.variant()?.site;
        self.climate.write_ud_block(&mut self.conn, site)?;
        self.climate.write_active_dataset(&mut self.conn, site)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_project_constructions(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let constructions: Vec<_> = project.assembly_types.iter().collect();
        self.u_values.write_constructions(&mut self.conn, &constructions)
    }

    /// One glazing row and one frame row per window type
    pub fn write_project_window_components(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let window_types: Vec<_> = project.window_types.iter().collect();
        let report = self.components.write_glazings(&mut self.conn, &window_types)?;
        self.components.write_frames(&mut self.conn, &window_types)?;
        Ok(report)
    }

    pub fn write_project_ventilation_components(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let ventilators: Vec<_> = project.variant()?.mech.ventilators.iter().collect();
        self.components.write_ventilators(&mut self.conn, &ventilators)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ENVELOPE
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_project_tfa(&mut self, project: &PhxProject) -> PhppResult<()> {
        let tfa = project.variant()?.building.weighted_floor_area();
        self.areas.write_tfa(&mut self.conn, tfa)
    }

    /// Surface rows sorted by name, each pointing at its U-Values assembly
    pub fn write_project_opaque_surfaces(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let variant = project.variant()?;
        let mut surfaces = Vec::new();
        for component in &variant.building.opaque_components {
            let assembly_id =
                self.u_values
                    .construction_id_by_name(&self.conn, &component.assembly_type_name, true)?;
            if assembly_id.is_none() {
                warn!(assembly = %component.assembly_type_name, "assembly not found on the U-Values worksheet");
            }
            for polygon in &component.polygons {
                surfaces.push(SurfaceInput {
                    polygon,
                    component,
                    assembly_id: assembly_id.clone(),
                });
            }
        }
        surfaces.sort_by_key(|s| s.polygon.display_name.to_lowercase());
        self.areas.write_surfaces(&mut self.conn, &surfaces)
    }

    pub fn write_project_thermal_bridges(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let bridges: Vec<_> = project.variant()?.building.all_thermal_bridges().collect();
        self.areas.write_thermal_bridges(&mut self.conn, &bridges)
    }

    /// Window rows sorted by name. The window types go to the Variants
    /// worksheet first so each row can carry its variant type id.
    pub fn write_project_window_surfaces(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let building = &project.variant()?.building;

        let mut type_names: Vec<&str> = building.all_apertures().map(variant_type_name).collect();
        type_names.sort_unstable();
        type_names.dedup();
        for (i, name) in type_names.iter().enumerate() {
            self.variants.write_window_type(&mut self.conn, name, i as u32)?;
        }
        let type_ids = self.variants.window_type_ids(&self.conn)?;

        let mut windows = Vec::new();
        for aperture in building.all_apertures() {
            let window_type = project.window_type(&aperture.window_type_name).ok_or_else(|| {
                PhppError::ModelLookup(format!(
                    "window type '{}' of the window '{}'",
                    aperture.window_type_name, aperture.display_name
                ))
            })?;
            let frame = self
                .components
                .frame_id_by_name(&self.conn, &window_type.frame_type_display_name, true)?;
            let glazing = self
                .components
                .glazing_id_by_name(&self.conn, &window_type.glazing_type_display_name, true)?;
            let variant_type = type_ids.get(variant_type_name(aperture)).map(VariantId::phpp_id);

            for element in &aperture.elements {
                let host = element
                    .polygon
                    .host_polygon_id
                    .and_then(|id| building.polygon_by_id(id))
                    .ok_or_else(|| {
                        PhppError::ModelLookup(format!("host surface of the window '{}'", element.polygon.display_name))
                    })?;
                let host_surface = self.areas.surface_id_by_name(&self.conn, &host.display_name, true)?;
                windows.push(WindowInput {
                    polygon: &element.polygon,
                    window_type,
                    refs: WindowRefs {
                        variant_type: variant_type.clone(),
                        host_surface,
                        frame: frame.clone(),
                        glazing: glazing.clone(),
                    },
                });
            }
        }
        windows.sort_by_key(|w| w.polygon.display_name.to_lowercase());
        self.windows.write_windows(&mut self.conn, &windows)
    }

    /// Shading rows, in the order the Windows worksheet lists the windows
    pub fn write_project_window_shading(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        let building = &project.variant()?.building;
        let elements: HashMap<&str, &PhxApertureElement> = building
            .all_apertures()
            .flat_map(|a| a.elements.iter())
            .map(|e| (e.polygon.display_name.as_str(), e))
            .collect();

        let names = self.windows.all_window_names(&self.conn)?;
        let ordered = names
            .iter()
            .map(|name| element_for_window(&elements, name))
            .collect::<PhppResult<Vec<_>>>()?;
        self.shading.write_shading(&mut self.conn, &ordered)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VENTILATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_project_ventilators(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        if self.skip_easy_ph("ventilators") {
            return Ok(WriteReport::default());
        }
        let units = project
            .variant()?
            .mech
            .ventilators
            .iter()
            .map(|ventilator| {
                Ok(VentUnitInput {
                    ventilator,
                    ventilator_id: self
                        .components
                        .ventilator_id_by_name(&self.conn, &ventilator.display_name, true)?,
                })
            })
            .collect::<PhppResult<Vec<_>>>()?;
        self.addnl_vent.write_vent_units(&mut self.conn, &units)
    }

    /// Unit number on the Additional Vent worksheet of a ventilator
    fn vent_unit_number(&self, project: &PhxProject, ventilator_id_num: u32) -> PhppResult<Option<u32>> {
        let Some(ventilator) = project.variant()?.mech.ventilator_by_id(ventilator_id_num) else {
            return Ok(None);
        };
        let id = self
            .components
            .ventilator_id_by_name(&self.conn, &ventilator.display_name, true)?;
        self.addnl_vent.vent_unit_number_by_id(&self.conn, &id).map(Some)
    }

    /// Room rows. A space without a known ventilator is written unassigned.
    pub fn write_project_spaces(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        if self.skip_easy_ph("spaces") {
            return Ok(WriteReport::default());
        }
        let mut spaces = Vec::new();
        for space in project.variant()?.building.all_spaces() {
            let unit_number = match space.vent_unit_id_num {
                Some(id) => self.vent_unit_number(project, id)?,
                None => None,
            };
            spaces.push(SpaceInput {
                space,
                pattern: project.ventilation_pattern(space.ventilation.schedule_id_num),
                unit_number,
            });
        }
        self.addnl_vent.write_spaces(&mut self.conn, &spaces)
    }

    pub fn write_project_ducts(&mut self, project: &PhxProject) -> PhppResult<WriteReport> {
        if self.skip_easy_ph("ducts") {
            return Ok(WriteReport::default());
        }
        let mut ducts = Vec::new();
        for duct in &project.variant()?.mech.ducts {
            let unit_number = self.vent_unit_number(project, duct.ventilator_id_num)?.ok_or_else(|| {
                PhppError::ModelLookup(format!("ventilator {} served by a duct", duct.ventilator_id_num))
            })?;
            ducts.push(DuctInput { duct, unit_number });
        }
        self.addnl_vent.write_ducts(&mut self.conn, &ducts)
    }

    pub fn write_project_ventilation_type(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("ventilation type") {
            return Ok(());
        }
        project.variant()?;
        self.ventilation.write_ventilation_type(&mut self.conn)
    }

    pub fn write_project_airtightness(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("airtightness") {
            return Ok(());
        }
        match &project.variant()?.ph_building_data {
            Some(data) => self.ventilation.write_airtightness(&mut self.conn, data),
            None => {
                debug!("no building data, airtightness not written");
                Ok(())
            }
        }
    }

    pub fn write_project_volume(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("volume") {
            return Ok(());
        }
        let variant = project.variant()?;
        if variant.ph_building_data.is_none() {
            debug!("no building data, volume not written");
            return Ok(());
        }
        self.ventilation.write_volume(&mut self.conn, variant.building.net_volume)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EQUIPMENT
    // ═══════════════════════════════════════════════════════════════════════

    pub fn write_project_hot_water(&mut self, project: &PhxProject) -> PhppResult<HotWaterReport> {
        if self.skip_easy_ph("hot water") {
            return Ok(HotWaterReport::default());
        }
        let system = &project.variant()?.mech.hot_water;
        self.hot_water.write_hot_water(&mut self.conn, system)
    }

    pub fn write_project_res_elec_appliances(&mut self, project: &PhxProject) -> PhppResult<()> {
        if self.skip_easy_ph("electricity") {
            return Ok(());
        }
        let devices: Vec<_> = project.variant()?.building.all_elec_equipment().collect();
        self.electricity.write_equipment(&mut self.conn, &devices)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VARIANTS
    // ═══════════════════════════════════════════════════════════════════════

    /// List the used U-Values assemblies on the Variants worksheet and drive
    /// each block's first layer from there
    pub fn activate_variant_assemblies(&mut self) -> PhppResult<()> {
        if self.skip_easy_ph("assembly variants") {
            return Ok(());
        }
        let names = self.u_values.used_constructor_names(&self.conn)?;
        let names = truncate_to_capacity(
            &names,
            "assemblies",
            self.variants.sheet_name(),
            VARIANT_ASSEMBLY_CAPACITY,
        );
        for (i, name) in names.iter().enumerate() {
            self.variants.write_assembly_layer(&mut self.conn, name, i as u32)?;
        }
        let ids = self.variants.assembly_layer_ids(&self.conn)?;
        self.u_values.activate_variants(&mut self.conn, &ids)
    }

    pub fn activate_variant_windows(&mut self) -> PhppResult<()> {
        if self.skip_easy_ph("window variants") {
            return Ok(());
        }
        self.windows.activate_variants(&mut self.conn)
    }

    pub fn activate_variant_ventilation(&mut self) -> PhppResult<()> {
        if self.skip_easy_ph("ventilation variants") {
            return Ok(());
        }
        self.ventilation.activate_variants(&mut self.conn)
    }

    pub fn activate_variant_additional_vent(&mut self) -> PhppResult<()> {
        if self.skip_easy_ph("ventilation unit variants") {
            return Ok(());
        }
        let source = self.variants.ventilator_unit_cell(&self.conn)?;
        self.addnl_vent
            .activate_variants(&mut self.conn, self.variants.sheet_name(), &source)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EVERYTHING
    // ═══════════════════════════════════════════════════════════════════════

    /// Write the whole project. Steps that refer to ids of other sheets run
    /// after the steps that write those ids.
    pub fn write_all(&mut self, project: &PhxProject, options: WriteOptions) -> PhppResult<WriteSummary> {
        let variant = project.variant()?;
        info!(project = %project.name, variant = %variant.name, shape = %self.shape_key, "writing project");

        let mut summary = WriteSummary::default();
        self.write_certification_config(project)?;
        self.write_climate_data(project)?;
        summary.record("assemblies", self.write_project_constructions(project)?);
        summary.record("window types", self.write_project_window_components(project)?);
        summary.record("ventilators", self.write_project_ventilation_components(project)?);
        self.write_project_tfa(project)?;
        summary.record("surfaces", self.write_project_opaque_surfaces(project)?);
        summary.record("thermal bridges", self.write_project_thermal_bridges(project)?);
        summary.record("windows", self.write_project_window_surfaces(project)?);
        summary.record("shading", self.write_project_window_shading(project)?);
        summary.record("vent units", self.write_project_ventilators(project)?);
        summary.record("spaces", self.write_project_spaces(project)?);
        summary.record("ducts", self.write_project_ducts(project)?);
        self.write_project_ventilation_type(project)?;
        self.write_project_airtightness(project)?;
        self.write_project_volume(project)?;
        let hot_water = self.write_project_hot_water(project)?;
        summary.record("hot water tanks", hot_water.tanks);
        summary.record("recirculation piping", hot_water.recirc_groups);
        summary.record("branch piping", hot_water.branch_groups);
        self.write_project_res_elec_appliances(project)?;

        if options.activate_variants && !self.easy_ph {
            self.activate_variant_assemblies()?;
            self.activate_variant_windows()?;
            self.activate_variant_ventilation()?;
            self.activate_variant_additional_vent()?;
            summary.variants_activated = true;
        }

        info!(skipped = summary.total_skipped(), "project written");
        Ok(summary)
    }
}

/// Name of the Variants window type of an aperture; its window type unless set
fn variant_type_name(aperture: &PhxAperture) -> &str {
    if aperture.variant_type_name.is_empty() {
        &aperture.window_type_name
    } else {
        &aperture.variant_type_name
    }
}

/// The element behind a window name read back from the workbook. Numeric
/// names may come back as numbers, so `106` also matches `106.0` and the
/// other way round.
fn element_for_window<'a>(
    elements: &HashMap<&str, &'a PhxApertureElement>,
    name: &str,
) -> PhppResult<&'a PhxApertureElement> {
    if let Some(element) = elements.get(name) {
        return Ok(*element);
    }
    if let Ok(number) = name.trim().parse::<f64>() {
        let candidates = [format!("{:?}", number), format!("{}", number.trunc() as i64)];
        for candidate in &candidates {
            if let Some(element) = elements.get(candidate.as_str()) {
                return Ok(*element);
            }
        }
    }
    Err(PhppError::ModelLookup(format!(
        "window '{}' listed on the Windows worksheet",
        name
    )))
}
