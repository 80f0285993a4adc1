//! Workbook access: addressing, values, write items and the document
//! connection, plus the in-memory and `.xlsx` backed implementations

pub mod address;
pub mod connection;
pub mod file;
pub mod item;
pub mod memory;
pub mod value;

pub use address::{col_offset, index_to_letters, letters_to_index, CellAddress, RangeAddress};
pub use connection::DocumentConnection;
pub use file::{load_workbook, save_workbook};
pub use item::{merge_same_row, AddressedWriteItem, WriteBatch, WriteOp};
pub use memory::MemoryWorkbook;
pub use value::{CellValue, WriteValue};
