//! PHX → PHPP - write building-energy models into localized PHPP workbooks
//!
//! A PHPP workbook changes layout between versions and languages, and users
//! insert rows of their own. This library never assumes a fixed layout:
//! it reads the workbook's version marker, loads the matching *shape* (a
//! JSON description of every worksheet's markers, columns and units),
//! locates each table by scanning for its markers and only then writes.
//!
//! # Features
//!
//! - Version and language detection from the `Data` worksheet
//! - Shape catalog compiled in or read from a directory
//! - Section discovery with cached header, first and last entry rows
//! - Unit conversion between the model's and the shape's units
//! - Same-row write merging into contiguous batches
//! - Cross-sheet id lookups (assemblies, surfaces, frames, glazings, ventilators)
//! - `.xlsx` load and save
//!
//! # Example
//!
//! ```no_run
//! use phx_phpp::facade::{PhppConnection, WriteOptions};
//! use phx_phpp::model::PhxProject;
//! use phx_phpp::shape::ShapeCatalog;
//! use phx_phpp::xl::file::{load_workbook, save_workbook};
//!
//! let project = PhxProject::from_path("house.json")?;
//! let workbook = load_workbook("phpp.xlsx")?;
//!
//! let mut phpp = PhppConnection::open(workbook, ShapeCatalog::Embedded)?;
//! let summary = phpp.write_all(&project, WriteOptions::default())?;
//! println!("rows skipped: {}", summary.total_skipped());
//!
//! save_workbook(phpp.connection(), "phpp-out.xlsx")?;
//! # Ok::<(), phx_phpp::error::PhppError>(())
//! ```

pub mod cli;
pub mod error;
pub mod facade;
pub mod locator;
pub mod model;
pub mod rows;
pub mod shape;
pub mod sheets;
pub mod units;
pub mod xl;

// Re-export commonly used types
pub use error::{PhppError, PhppResult};
pub use facade::{PhppConnection, WriteOptions, WriteSummary};
pub use model::PhxProject;
pub use shape::{PhppShape, ShapeCatalog};
pub use xl::memory::MemoryWorkbook;
