use crate::error::PhppResult;
use crate::facade::{PhppConnection, WriteOptions};
use crate::model::PhxProject;
use crate::shape::ShapeCatalog;
use crate::xl::file::{load_workbook, save_workbook};
use crate::xl::memory::MemoryWorkbook;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// The embedded catalog, or the shapes in `shapes_dir`
pub fn catalog(shapes_dir: Option<PathBuf>) -> ShapeCatalog {
    match shapes_dir {
        Some(dir) => ShapeCatalog::Directory(dir),
        None => ShapeCatalog::Embedded,
    }
}

fn open(phpp: &Path, shapes_dir: Option<PathBuf>) -> PhppResult<PhppConnection<MemoryWorkbook>> {
    let workbook = load_workbook(phpp)?;
    PhppConnection::open(workbook, catalog(shapes_dir))
}

/// Execute the write command
pub fn write(
    project: PathBuf,
    phpp: PathBuf,
    output: PathBuf,
    activate_variants: bool,
    shapes_dir: Option<PathBuf>,
) -> PhppResult<()> {
    println!("{}", "🏠 PHX → PHPP - Writing project".bold().green());
    println!("   Project: {}", project.display());
    println!("   PHPP:    {}", phpp.display());
    println!();

    let model = PhxProject::from_path(&project)?;
    let mut connection = open(&phpp, shapes_dir)?;
    println!(
        "   Version: {}  Shape: {}",
        connection.version().to_string().bright_blue().bold(),
        connection.shape_key().cyan()
    );
    if connection.is_easy_ph() {
        println!(
            "{}",
            "⚠️  easyPH workbook: only envelope data will be written".yellow()
        );
    }
    println!();

    let summary = connection.write_all(&model, WriteOptions { activate_variants })?;

    println!("{}", "✅ Rows written:".bold().green());
    for (table, report) in &summary.tables {
        if report.skipped > 0 {
            println!(
                "   {:<22} {:>4}  {}",
                table,
                report.written,
                format!("({} did not fit)", report.skipped).yellow()
            );
        } else {
            println!("   {:<22} {:>4}", table, report.written);
        }
    }
    if summary.variants_activated {
        println!("   {}", "🔗 Variants linked".cyan());
    }
    println!();

    save_workbook(connection.connection(), &output)?;
    println!("{} {}", "💾 Saved".bold().green(), output.display());
    Ok(())
}

/// Execute the inspect command - show what the workbook resolves to
pub fn inspect(phpp: PathBuf, shapes_dir: Option<PathBuf>) -> PhppResult<()> {
    println!("{}", "🔍 PHX → PHPP - Inspect".bold().green());
    println!("   PHPP: {}\n", phpp.display());

    let connection = open(&phpp, shapes_dir)?;
    let version = connection.version();
    println!(
        "   Version:  {}.{}",
        version.number_major.bright_blue().bold(),
        version.number_minor.bright_blue().bold()
    );
    println!("   Language: {}", version.language.bright_blue().bold());
    println!("   Shape:    {}", connection.shape_key().cyan());
    println!(
        "   easyPH:   {}",
        if connection.is_easy_ph() {
            "yes".yellow()
        } else {
            "no".normal()
        }
    );
    Ok(())
}

/// Execute the locate command - show where every table section sits
pub fn locate(phpp: PathBuf, shapes_dir: Option<PathBuf>) -> PhppResult<()> {
    println!("{}", "📍 PHX → PHPP - Locate sections".bold().green());
    println!("   PHPP: {}\n", phpp.display());

    let connection = open(&phpp, shapes_dir)?;
    println!(
        "   {:<40} {:>7} {:>7} {:>7}",
        "Section".bold(),
        "Header".bold(),
        "First".bold(),
        "Last".bold()
    );
    let mut missing = 0;
    for (section, location) in connection.section_locations() {
        match location {
            Ok(loc) => println!(
                "   {:<40} {:>7} {:>7} {:>7}",
                section, loc.header_row, loc.first_entry_row, loc.last_entry_row
            ),
            Err(e) => {
                missing += 1;
                println!("   {:<40} {}", section, format!("❌ {}", e).red());
            }
        }
    }
    println!();

    if missing > 0 {
        println!(
            "{}",
            format!("⚠️  {} section(s) could not be located", missing).yellow()
        );
    } else {
        println!("{}", "✅ All sections located".bold().green());
    }
    Ok(())
}
