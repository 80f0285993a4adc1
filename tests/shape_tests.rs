//! Version detection, shape catalogs and section discovery against a full
//! synthetic workbook

mod common;

use common::phpp_workbook;
use phx_phpp::facade::PhppConnection;
use phx_phpp::locator::SectionLocation;
use phx_phpp::shape::resolver::ShapeResolver;
use phx_phpp::shape::version::get_phpp_version;
use phx_phpp::shape::ShapeCatalog;
use phx_phpp::xl::memory::MemoryWorkbook;
use phx_phpp::xl::value::CellValue;
use phx_phpp::PhppError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn data_sheet(sheet: &str, version: CellValue, language: &str) -> MemoryWorkbook {
    let mut wb = MemoryWorkbook::new();
    wb.set(sheet, "A2", "PHPP  ").unwrap();
    wb.set(sheet, "B2", version).unwrap();
    wb.set(sheet, "D2", "Version").unwrap();
    wb.set(sheet, "F2", language).unwrap();
    wb
}

// ═══════════════════════════════════════════════════════════════════════════
// VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_version_from_localized_data_sheet() {
    let wb = data_sheet("Daten", CellValue::text("10.4"), "1-PE-Faktoren");
    let version = get_phpp_version(&wb).unwrap();
    assert_eq!(version.number_major, "10");
    assert_eq!(version.number_minor, "4");
    assert_eq!(version.language, "DE");
    assert_eq!(version.file_key(), "DE_10_4.json");
}

#[test]
fn test_numeric_version_token() {
    let wb = data_sheet("Data", CellValue::Number(9.0), "1-PE-Factors");
    let version = get_phpp_version(&wb).unwrap();
    assert_eq!(version.file_key(), "EN_9_0.json");
    assert_eq!(version.major(), Some(9));
}

#[test]
fn test_language_cell_with_extra_text() {
    let wb = data_sheet("Data", CellValue::text("10.6"), "1-PE-Factors (PHPP 10)");
    let version = get_phpp_version(&wb).unwrap();
    assert_eq!(version.language, "EN");
    assert_eq!(version.file_key(), "EN_10_6.json");
}

#[test]
fn test_missing_data_sheet() {
    let mut wb = MemoryWorkbook::new();
    wb.add_sheet("Verification");
    match get_phpp_version(&wb) {
        Err(PhppError::WorksheetNotFound { candidates, found }) => {
            assert_eq!(candidates, vec!["DATA", "DATEN", "DATOS"]);
            assert_eq!(found, vec!["Verification"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_missing_version_marker() {
    let mut wb = MemoryWorkbook::new();
    wb.set("Data", "A12", "PHPP").unwrap();
    assert!(matches!(
        get_phpp_version(&wb),
        Err(PhppError::VersionMarkerNotFound { row_end: 10, .. })
    ));
}

#[test]
fn test_unknown_language() {
    let wb = data_sheet("Data", CellValue::text("10.6"), "1-Facteurs EP");
    assert!(matches!(
        get_phpp_version(&wb),
        Err(PhppError::LanguageNotSupported(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_embedded_catalog_has_no_german_shape() {
    let wb = data_sheet("Daten", CellValue::text("10.6"), "1-PE-Faktoren");
    let result = ShapeResolver::new(ShapeCatalog::Embedded).resolve(&wb);
    match result {
        Err(PhppError::ShapeResourceMissing { key, .. }) => assert_eq!(key, "DE_10_6.json"),
        other => panic!("unexpected {:?}", other.map(|r| r.key)),
    }
}

#[test]
fn test_directory_catalog() {
    let dir = TempDir::new().unwrap();
    let english = include_str!("../shapes/EN_10_6.json");
    std::fs::write(dir.path().join("DE_10_6.json"), english).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a shape").unwrap();

    let catalog = ShapeCatalog::Directory(dir.path().to_path_buf());
    assert_eq!(catalog.keys().unwrap(), vec!["DE_10_6.json"]);

    let wb = data_sheet("Daten", CellValue::text("10.6"), "1-PE-Faktoren");
    let resolved = ShapeResolver::new(catalog).resolve(&wb).unwrap();
    assert_eq!(resolved.key, "DE_10_6.json");
    assert_eq!(resolved.shape.areas.name, "Areas");
}

#[test]
fn test_directory_catalog_rejects_broken_shape() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("EN_10_6.json"), "{\"VERIFICATION\": {}}").unwrap();

    let catalog = ShapeCatalog::Directory(dir.path().to_path_buf());
    assert!(catalog.load("EN_10_6.json").is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_all_sections_located() {
    let phpp = PhppConnection::open(phpp_workbook(), ShapeCatalog::Embedded).unwrap();
    let sections = phpp.section_locations();
    assert_eq!(sections.len(), 10);

    let find = |name: &str| -> SectionLocation {
        let (_, location) = sections.iter().find(|(n, _)| n == name).unwrap();
        *location.as_ref().unwrap()
    };
    assert_eq!(
        find("Areas / surfaces"),
        SectionLocation { header_row: 40, first_entry_row: 41, last_entry_row: 140 }
    );
    assert_eq!(find("Areas / thermal bridges").first_entry_row, 151);
    assert_eq!(find("Windows / windows").first_entry_row, 24);
    assert_eq!(find("Windows / windows").last_entry_row, 173);
    assert_eq!(find("Shading / shading").capacity(), 150);
    assert_eq!(find("Additional Vent / vent units").first_entry_row, 52);
    assert_eq!(find("Additional Vent / ducts").last_entry_row, 98);
}

#[test]
fn test_sections_follow_inserted_rows() {
    let mut wb = phpp_workbook();
    // The user inserted five rows above the surface table
    wb.set("Areas", "M40", CellValue::Empty).unwrap();
    wb.set("Areas", "M45", "Area input").unwrap();
    for i in 1..=100 {
        wb.set("Areas", &format!("C{}", 40 + i), CellValue::Empty).unwrap();
    }
    for i in 1..=100 {
        wb.set("Areas", &format!("C{}", 45 + i), i as f64).unwrap();
    }
    wb.set("Areas", "M150", CellValue::Empty).unwrap();
    wb.set("Areas", "M155", "Thermal bridge inputs").unwrap();
    for i in 1..=100 {
        wb.set("Areas", &format!("C{}", 150 + i), CellValue::Empty).unwrap();
    }
    for i in 1..=100 {
        wb.set("Areas", &format!("C{}", 155 + i), i as f64).unwrap();
    }

    let phpp = PhppConnection::open(wb, ShapeCatalog::Embedded).unwrap();
    let surfaces = phpp.areas().surfaces().location(phpp.connection()).unwrap();
    assert_eq!(surfaces.header_row, 45);
    assert_eq!(surfaces.first_entry_row, 46);
    assert_eq!(surfaces.last_entry_row, 145);
}

#[test]
fn test_locations_are_cached() {
    let phpp = PhppConnection::open(phpp_workbook(), ShapeCatalog::Embedded).unwrap();
    let wb = phpp.connection();

    phpp.windows().windows().location(wb).unwrap();
    let reads = wb.read_count();
    phpp.windows().windows().location(wb).unwrap();
    phpp.windows().windows().first_entry_row(wb).unwrap();
    assert_eq!(wb.read_count(), reads);
}

#[test]
fn test_missing_section_marker_is_reported() {
    let mut wb = phpp_workbook();
    wb.set("Shading", "D10", CellValue::Empty).unwrap();

    let phpp = PhppConnection::open(wb, ShapeCatalog::Embedded).unwrap();
    let sections = phpp.section_locations();
    let (_, shading) = sections.iter().find(|(n, _)| n == "Shading / shading").unwrap();
    match shading {
        Err(PhppError::SectionMarkerNotFound { marker, sheet, column }) => {
            assert_eq!(marker, "Determination of shading");
            assert_eq!(sheet, "Shading");
            assert_eq!(column, "D");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(sections.iter().filter(|(_, l)| l.is_err()).count(), 1);
}
