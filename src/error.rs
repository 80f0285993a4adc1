use thiserror::Error;

pub type PhppResult<T> = Result<T, PhppError>;

#[derive(Error, Debug)]
pub enum PhppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Cannot find a {candidates:?} worksheet in the workbook (found: {found:?})")]
    WorksheetNotFound {
        candidates: Vec<String>,
        found: Vec<String>,
    },

    #[error("Cannot determine the PHPP version: expected a 'PHPP' marker in column {column}, rows {row_start}-{row_end} of the '{sheet}' worksheet")]
    VersionMarkerNotFound {
        sheet: String,
        column: String,
        row_start: u32,
        row_end: u32,
    },

    #[error("Cannot read a 'major.minor' PHPP version from '{0}'")]
    VersionMalformed(String),

    #[error("Cannot determine the PHPP language from '{0}'. Only English, German and Spanish are supported")]
    LanguageNotSupported(String),

    #[error("No PHPP shape '{key}' found (expected at: {path})")]
    ShapeResourceMissing { key: String, path: String },

    #[error("Shape '{key}' is invalid: {message}")]
    ShapeParse { key: String, message: String },

    #[error("Cannot find the marker '{marker}' in the worksheet '{sheet}' column '{column}'")]
    SectionMarkerNotFound {
        marker: String,
        sheet: String,
        column: String,
    },

    #[error("Shape field '{field}' on the '{sheet}' worksheet (section '{marker}') has no {part} defined")]
    MissingShapeField {
        field: String,
        sheet: String,
        marker: String,
        part: &'static str,
    },

    #[error("Cannot find the {kind} named '{name}' on the '{sheet}' worksheet, column {column}")]
    ReferenceNotFound {
        kind: &'static str,
        name: String,
        sheet: String,
        column: String,
    },

    #[error("No PHPP selection found for equipment type '{device}' (option '{option}')")]
    UnsupportedDeviceType { device: String, option: String },

    #[error("Option '{option}' is not defined for '{field}' on the '{sheet}' worksheet")]
    MissingOption {
        field: String,
        sheet: String,
        option: String,
    },

    #[error("Cannot convert {value} from '{from}' to '{to}'")]
    UnitConversion { value: f64, from: String, to: String },

    #[error("Invalid cell address: '{0}'")]
    InvalidAddress(String),

    #[error("Too many {kind}: {count} given but the '{sheet}' worksheet only has room for {capacity}")]
    CapacityExceeded {
        kind: &'static str,
        sheet: String,
        count: usize,
        capacity: usize,
    },

    #[error("The project has {0} variants. Only single-variant projects can be written to a PHPP")]
    MultipleVariants(usize),

    #[error("The project has no variants to write")]
    NoVariant,

    #[error("Cannot find the domain object: {0}")]
    ModelLookup(String),
}
