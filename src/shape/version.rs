//! PHPP version and language detection

use crate::error::{PhppError, PhppResult};
use crate::xl::connection::DocumentConnection;
use crate::xl::value::CellValue;
use std::fmt;

/// Localized names of the worksheet carrying the version marker
pub const DATA_SHEET_NAMES: [&str; 3] = ["DATA", "DATEN", "DATOS"];

/// Column and rows scanned for the "PHPP" marker
pub const VERSION_MARKER_COLUMN: &str = "A";
pub const VERSION_MARKER_ROWS: (u32, u32) = (1, 10);

/// Language tokens found at the end of the version row
const LANGUAGES: [(&str, &str); 3] = [
    ("1-PE-FAKTOREN", "DE"),
    ("1-FACTORES EP", "ES"),
    ("1-PE-FACTORS", "EN"),
];

/// The version and language of an open PHPP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhppVersion {
    pub number_major: String,
    pub number_minor: String,
    pub language: String,
}

impl PhppVersion {
    /// Catalog key of the matching shape, e.g. `EN_10_6.json`
    pub fn file_key(&self) -> String {
        format!(
            "{}_{}_{}.json",
            clean_token(&self.language),
            clean_token(&self.number_major),
            clean_token(&self.number_minor)
        )
    }

    pub fn major(&self) -> Option<u32> {
        self.number_major.trim().parse().ok()
    }
}

impl fmt::Display for PhppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.number_major, self.number_minor, self.language)
    }
}

/// Upper-case, trim, drop spaces and turn `.` into `_`
pub fn clean_token(token: &str) -> String {
    token
        .trim()
        .to_uppercase()
        .replace(' ', "")
        .replace('.', "_")
}

fn normalized(value: &CellValue) -> String {
    value.to_string().to_uppercase().trim().replace(' ', "")
}

/// Find the localized "Data" worksheet
pub fn find_data_sheet(conn: &dyn DocumentConnection) -> PhppResult<String> {
    let names = conn.worksheet_names();
    for candidate in DATA_SHEET_NAMES {
        if let Some(name) = names.iter().find(|n| n.trim().to_uppercase() == candidate) {
            return Ok(name.clone());
        }
    }
    Err(PhppError::WorksheetNotFound {
        candidates: DATA_SHEET_NAMES.iter().map(|s| s.to_string()).collect(),
        found: names,
    })
}

/// Row of the "PHPP" version marker on the data sheet
pub fn find_version_row(conn: &dyn DocumentConnection, sheet: &str) -> PhppResult<u32> {
    let (row_start, row_end) = VERSION_MARKER_ROWS;
    let data = conn.get_single_column_data(sheet, VERSION_MARKER_COLUMN, row_start, row_end)?;
    data.iter()
        .position(|value| normalized(value).starts_with("PHPP"))
        .map(|i| row_start + i as u32)
        .ok_or_else(|| PhppError::VersionMarkerNotFound {
            sheet: sheet.to_string(),
            column: VERSION_MARKER_COLUMN.to_string(),
            row_start,
            row_end,
        })
}

/// Split a version token ("10.6", 10.6) into major and minor parts
pub fn parse_version_number(value: &CellValue) -> PhppResult<(String, String)> {
    let text = match value {
        CellValue::Number(n) if n.fract() == 0.0 => format!("{}.0", n),
        other => other.to_string(),
    };
    let text = text.trim().to_string();
    match text.split_once('.') {
        Some((major, minor))
            if !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok((major.to_string(), minor.to_string()))
        }
        _ => Err(PhppError::VersionMalformed(text)),
    }
}

/// Match the language token at the end of the version row.
///
/// The cell only has to contain a known token, so `"1-PE-Factors (PHPP 10)"`
/// reads as English.
pub fn parse_language(token: &CellValue) -> PhppResult<String> {
    let text = token.to_string().trim().to_uppercase();
    LANGUAGES
        .iter()
        .find(|(marker, _)| text.contains(*marker))
        .map(|(_, lang)| lang.to_string())
        .ok_or(PhppError::LanguageNotSupported(text))
}

/// Read the version and language of the open workbook
pub fn get_phpp_version(conn: &dyn DocumentConnection) -> PhppResult<PhppVersion> {
    let sheet = find_data_sheet(conn)?;
    let row = find_version_row(conn, &sheet)?;

    let values: Vec<CellValue> = conn
        .get_single_row_data(&sheet, row)?
        .into_iter()
        .filter(|v| !v.is_blank())
        .collect();

    let version_token = values
        .get(1)
        .ok_or_else(|| PhppError::VersionMalformed(format!("row {} of '{}' has no version", row, sheet)))?;
    let (number_major, number_minor) = parse_version_number(version_token)?;

    let language_token = values
        .last()
        .ok_or_else(|| PhppError::LanguageNotSupported(String::new()))?;
    let language = parse_language(language_token)?;

    Ok(PhppVersion {
        number_major,
        number_minor,
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_key() {
        let version = PhppVersion {
            number_major: "10".to_string(),
            number_minor: "6".to_string(),
            language: "en".to_string(),
        };
        assert_eq!(version.file_key(), "EN_10_6.json");
        assert_eq!(version.major(), Some(10));
    }

    #[test]
    fn test_parse_version_number() {
        assert_eq!(
            parse_version_number(&CellValue::text("10.6")).unwrap(),
            ("10".to_string(), "6".to_string())
        );
        assert_eq!(
            parse_version_number(&CellValue::Number(9.7)).unwrap(),
            ("9".to_string(), "7".to_string())
        );
        assert!(parse_version_number(&CellValue::text("ten")).is_err());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language(&CellValue::text("1-PE-Factors")).unwrap(), "EN");
        assert_eq!(parse_language(&CellValue::text("1-PE-Faktoren")).unwrap(), "DE");
        assert_eq!(parse_language(&CellValue::text("1-Factores EP")).unwrap(), "ES");
        assert!(matches!(
            parse_language(&CellValue::text("1-FACTEURS EP")),
            Err(PhppError::LanguageNotSupported(_))
        ));
    }

    #[test]
    fn test_parse_language_with_surrounding_text() {
        assert_eq!(
            parse_language(&CellValue::text("1-PE-Factors (PHPP 10)")).unwrap(),
            "EN"
        );
        assert_eq!(parse_language(&CellValue::text("  siehe 1-PE-Faktoren ")).unwrap(), "DE");
        assert!(matches!(
            parse_language(&CellValue::text("PE-Factors")),
            Err(PhppError::LanguageNotSupported(_))
        ));
    }
}
