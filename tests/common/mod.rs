//! Shared fixtures: a synthetic English PHPP 10.6 and a small project
#![allow(dead_code)]

use phx_phpp::model::PhxProject;
use phx_phpp::xl::memory::MemoryWorkbook;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn project() -> PhxProject {
    PhxProject::from_path(fixture_path("house.json")).unwrap()
}

fn set(wb: &mut MemoryWorkbook, sheet: &str, address: &str, value: &str) {
    wb.set(sheet, address, value).unwrap();
}

fn number(wb: &mut MemoryWorkbook, sheet: &str, address: &str, value: f64) {
    wb.set(sheet, address, value).unwrap();
}

/// Every worksheet the writer touches, with the markers and numbered entry
/// rows an English PHPP 10.6 carries
pub fn phpp_workbook() -> MemoryWorkbook {
    let mut wb = MemoryWorkbook::new();

    set(&mut wb, "Data", "A3", "PHPP");
    set(&mut wb, "Data", "B3", "10.6");
    set(&mut wb, "Data", "E3", "1-PE-Factors");

    let labels = [
        "Building category:",
        "Building type/use:",
        "Internal heat gains:",
        "Occupancy:",
        "Energy standard:",
        "Class:",
        "Primary energy:",
        "EnerPHit verification:",
        "New construction/retrofit:",
    ];
    for (i, label) in labels.iter().enumerate() {
        set(&mut wb, "Verification", &format!("R{}", 20 + i), label);
    }
    set(&mut wb, "Verification", "E30", "Number of dwelling units");
    set(&mut wb, "Verification", "E31", "Interior temperature winter");
    set(&mut wb, "Verification", "E32", "Interior temp. summer");
    set(&mut wb, "Verification", "E33", "Mechanical cooling");

    set(&mut wb, "Variants", "B5", "Input");
    set(&mut wb, "Variants", "B10", "Building assemblies");
    for (i, prefix) in ["a", "b", "c"].iter().enumerate() {
        set(&mut wb, "Variants", &format!("C{}", 11 + 2 * i), prefix);
    }
    set(&mut wb, "Variants", "B70", "Window types");
    for i in 0..3 {
        number(&mut wb, "Variants", &format!("C{}", 71 + 8 * i), (i + 1) as f64);
    }
    set(&mut wb, "Variants", "B300", "Ventilation");
    set(&mut wb, "Variants", "C301", "Type of ventilation system");
    set(&mut wb, "Variants", "C302", "Air change rate n50");
    set(&mut wb, "Variants", "C305", "Ventilation unit");

    set(&mut wb, "Climate", "B10", "Country");

    for (k, label) in ["Assembly no.", "Assembly no.", "Assembly no."].iter().enumerate() {
        let start = 10 + 21 * k;
        set(&mut wb, "U-Values", &format!("L{}", start), label);
        set(&mut wb, "U-Values", &format!("L{}", start + 2), &format!("{:02}ud", k + 1));
    }

    set(&mut wb, "Areas", "D30", "Treated floor area");
    set(&mut wb, "Areas", "M40", "Area input");
    for i in 1..=100 {
        number(&mut wb, "Areas", &format!("C{}", 40 + i), i as f64);
    }
    set(&mut wb, "Areas", "M150", "Thermal bridge inputs");
    for i in 1..=100 {
        number(&mut wb, "Areas", &format!("C{}", 150 + i), i as f64);
    }

    set(&mut wb, "Components", "IE14", "Glazing");
    set(&mut wb, "Components", "IL14", "Window frames");
    set(&mut wb, "Components", "JN14", "Ventilation units");
    for i in 1..=20 {
        let row = 15 + i;
        for column in ["IE", "IL", "JN"] {
            number(&mut wb, "Components", &format!("{}{}", column, row), i as f64);
        }
    }

    set(&mut wb, "Windows", "L20", "Window input");
    set(&mut wb, "Windows", "L22", "Description");
    set(&mut wb, "Windows", "B176", "Total");

    set(&mut wb, "Shading", "D10", "Determination of shading");
    set(&mut wb, "Shading", "D12", "Description");
    set(&mut wb, "Shading", "B166", "Total");

    set(&mut wb, "Ventilation", "D8", "Multiple ventilation units");
    set(&mut wb, "Ventilation", "D10", "Type of ventilation system");
    set(&mut wb, "Ventilation", "D12", "Wind protection coefficient e");
    set(&mut wb, "Ventilation", "D13", "Wind protection coefficient f");
    set(&mut wb, "Ventilation", "D15", "Air change rate at press. test n50");
    set(&mut wb, "Ventilation", "D16", "Vn50");

    set(&mut wb, "Additional Vent", "B10", "Dimensioning of ventilation systems");
    for i in 1..=30 {
        number(&mut wb, "Additional Vent", &format!("D{}", 11 + i), i as f64);
    }
    set(&mut wb, "Additional Vent", "B50", "Ventilation units / Heat recovery");
    for i in 1..=10 {
        number(&mut wb, "Additional Vent", &format!("D{}", 51 + i), i as f64);
    }
    set(&mut wb, "Additional Vent", "B70", "Duct insulation");
    set(&mut wb, "Additional Vent", "B99", "Total");

    set(&mut wb, "DHW+Distribution", "B140", "Circulation pipes");
    set(&mut wb, "DHW+Distribution", "B160", "Individual pipes");

    wb.add_sheet("Electricity");
    wb
}

/// The same workbook with an easyPH worksheet added
pub fn easy_ph_workbook() -> MemoryWorkbook {
    let mut wb = phpp_workbook();
    set(&mut wb, "easyPH", "A1", "easyPH");
    wb
}

/// Log lines captured from a `tracing` subscriber, as plain text
#[derive(Clone, Default)]
pub struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with warnings and errors logged into the returned capture
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, CapturedLog) {
    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, log)
}
