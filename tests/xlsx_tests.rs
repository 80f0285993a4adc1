//! `.xlsx` save and load through real files

mod common;

use common::{phpp_workbook, project};
use phx_phpp::facade::{PhppConnection, WriteOptions};
use phx_phpp::shape::ShapeCatalog;
use phx_phpp::xl::connection::DocumentConnection;
use phx_phpp::xl::file::{load_workbook, save_workbook};
use phx_phpp::xl::value::CellValue;
use phx_phpp::PhppError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_saved_workbook_keeps_sheets_values_and_formulas() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("phpp.xlsx");

    let mut wb = phpp_workbook();
    wb.set("Climate", "D18", "=D17").unwrap();
    wb.set("Climate", "D17", 250.0).unwrap();
    save_workbook(&wb, &path).unwrap();

    let loaded = load_workbook(&path).unwrap();
    assert_eq!(loaded.worksheet_names(), wb.worksheet_names());
    assert_eq!(loaded.get("Data", "B3").unwrap(), CellValue::text("10.6"));
    assert_eq!(loaded.get("Areas", "C41").unwrap(), CellValue::Number(1.0));
    assert_eq!(loaded.get("Climate", "D17").unwrap(), CellValue::Number(250.0));
    assert_eq!(loaded.get("Climate", "D18").unwrap(), CellValue::text("=D17"));
}

#[test]
fn test_written_project_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("phpp.xlsx");
    let output = dir.path().join("house.xlsx");
    save_workbook(&phpp_workbook(), &source).unwrap();

    let mut phpp = PhppConnection::open(load_workbook(&source).unwrap(), ShapeCatalog::Embedded).unwrap();
    phpp.write_all(&project(), WriteOptions { activate_variants: true })
        .unwrap();
    save_workbook(phpp.connection(), &output).unwrap();

    let reopened = PhppConnection::open(load_workbook(&output).unwrap(), ShapeCatalog::Embedded).unwrap();
    assert_eq!(reopened.shape_key(), "EN_10_6.json");
    let wb = reopened.connection();
    assert_eq!(wb.get("Areas", "D43").unwrap(), CellValue::text("South wall"));
    assert_eq!(wb.get("Windows", "M24").unwrap(), CellValue::text("3-South wall"));
    assert_eq!(wb.get("Windows", "T24").unwrap(), CellValue::text("=E24"));
    assert_eq!(
        reopened.areas().surface_id_by_name(wb, "South wall", false).unwrap(),
        "3-South wall"
    );
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_workbook(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(PhppError::Workbook(_))));
}
