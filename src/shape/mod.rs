//! PHPP shapes: the version/language specific layout of every worksheet

pub mod catalog;
pub mod model;
pub mod resolver;
pub mod version;

pub use catalog::ShapeCatalog;
pub use model::{InputItem, MatchMode, PhppShape, SectionShape, TableShape};
pub use resolver::{ResolvedShape, ShapeResolver};
pub use version::PhppVersion;
