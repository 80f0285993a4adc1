//! Pick the shape matching an open workbook

use crate::error::PhppResult;
use crate::shape::catalog::ShapeCatalog;
use crate::shape::model::PhppShape;
use crate::shape::version::{get_phpp_version, PhppVersion};
use crate::xl::connection::DocumentConnection;
use tracing::info;

/// A shape together with the version it was resolved for
#[derive(Debug, Clone)]
pub struct ResolvedShape {
    pub version: PhppVersion,
    pub key: String,
    pub shape: PhppShape,
}

/// Resolves `(version, language)` of a workbook and loads its shape
#[derive(Debug, Clone, Default)]
pub struct ShapeResolver {
    catalog: ShapeCatalog,
}

impl ShapeResolver {
    pub fn new(catalog: ShapeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Read the version marker and load the matching shape.
    ///
    /// Only reads from the document.
    pub fn resolve(&self, conn: &dyn DocumentConnection) -> PhppResult<ResolvedShape> {
        let version = get_phpp_version(conn)?;
        let key = version.file_key();
        let shape = self.catalog.load(&key)?;
        info!(version = %version, key = %key, "resolved PHPP shape");
        Ok(ResolvedShape {
            version,
            key,
            shape,
        })
    }
}
