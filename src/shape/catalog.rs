//! Where shape documents come from

use crate::error::{PhppError, PhppResult};
use crate::shape::model::PhppShape;
use std::path::PathBuf;
use tracing::debug;

/// Shapes compiled into the binary, keyed like the files on disk
const EMBEDDED_SHAPES: &[(&str, &str)] = &[("EN_10_6.json", include_str!("../../shapes/EN_10_6.json"))];

fn embedded_keys() -> Vec<&'static str> {
    EMBEDDED_SHAPES.iter().map(|(k, _)| *k).collect()
}

/// A store of shape documents keyed by `"{LANG}_{MAJOR}_{MINOR}.json"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShapeCatalog {
    /// The shapes shipped inside the crate
    #[default]
    Embedded,
    /// A directory of `*.json` shape files
    Directory(PathBuf),
}

impl ShapeCatalog {
    /// Every key this catalog can serve
    pub fn keys(&self) -> PhppResult<Vec<String>> {
        match self {
            ShapeCatalog::Embedded => Ok(embedded_keys().into_iter().map(str::to_string).collect()),
            ShapeCatalog::Directory(dir) => {
                let mut keys = Vec::new();
                for entry in std::fs::read_dir(dir)? {
                    let path = entry?.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                            keys.push(name.to_string());
                        }
                    }
                }
                keys.sort();
                Ok(keys)
            }
        }
    }

    /// Load and parse the shape stored under `key`
    pub fn load(&self, key: &str) -> PhppResult<PhppShape> {
        let text = match self {
            ShapeCatalog::Embedded => EMBEDDED_SHAPES
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| PhppError::ShapeResourceMissing {
                    key: key.to_string(),
                    path: format!(
                        "<embedded>/shapes/{}; built in: {}; set PHX_SHAPES_DIR to a directory of shapes for other PHPPs",
                        key,
                        embedded_keys().join(", ")
                    ),
                })?,
            ShapeCatalog::Directory(dir) => {
                let path = dir.join(key);
                if !path.is_file() {
                    return Err(PhppError::ShapeResourceMissing {
                        key: key.to_string(),
                        path: path.display().to_string(),
                    });
                }
                std::fs::read_to_string(&path)?
            }
        };
        debug!(key, "loading shape");
        PhppShape::from_json(key, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_shape_parses() {
        let shape = ShapeCatalog::Embedded.load("EN_10_6.json").unwrap();
        assert_eq!(shape.areas.name, "Areas");
        assert_eq!(shape.windows.window_rows.locator.entry_row_offset, 2);
    }

    #[test]
    fn test_missing_key_names_expected_path() {
        let err = ShapeCatalog::Embedded.load("FR_10_6.json").unwrap_err().to_string();
        assert!(err.contains("FR_10_6.json"));
        assert!(err.contains("built in: EN_10_6.json"));
        assert!(err.contains("PHX_SHAPES_DIR"));
    }

    #[test]
    fn test_directory_missing_file() {
        let catalog = ShapeCatalog::Directory(PathBuf::from("/nonexistent/shapes"));
        match catalog.load("EN_10_6.json") {
            Err(PhppError::ShapeResourceMissing { path, .. }) => {
                assert!(path.ends_with("EN_10_6.json"))
            }
            other => panic!("expected ShapeResourceMissing, got {:?}", other),
        }
    }
}
