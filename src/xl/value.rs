//! Cell values read from and written to a workbook

use std::fmt;

/// The value of one worksheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) | CellValue::Empty => None,
        }
    }

    /// Entry-number coercion: `"3"`, `"3.0"` and `3.0` all give `"3"`.
    ///
    /// Anything that does not read as a finite number gives `None`.
    pub fn entry_number(&self) -> Option<String> {
        let n = self.as_f64()?;
        if !n.is_finite() {
            return None;
        }
        Some(format!("{}", n.trunc() as i64))
    }

    /// True when the cell holds an integral number (or integral numeric text)
    pub fn is_integer(&self) -> bool {
        match self.as_f64() {
            Some(n) => n.is_finite() && n.fract() == 0.0,
            None => false,
        }
    }

    /// Id text: integral numbers drop their decimal point (`1.0` → `"1"`)
    pub fn to_id_string(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                format!("{}", *n as i64)
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// What a write puts into the document: one value, or a row of values
/// laid out rightward from the start cell
#[derive(Debug, Clone, PartialEq)]
pub enum WriteValue {
    Scalar(CellValue),
    Sequence(Vec<CellValue>),
}

impl WriteValue {
    pub fn is_sequence(&self) -> bool {
        matches!(self, WriteValue::Sequence(_))
    }

    /// Number of cells the value spans horizontally
    pub fn width(&self) -> usize {
        match self {
            WriteValue::Scalar(_) => 1,
            WriteValue::Sequence(values) => values.len(),
        }
    }
}

impl From<CellValue> for WriteValue {
    fn from(value: CellValue) -> Self {
        WriteValue::Scalar(value)
    }
}

impl From<f64> for WriteValue {
    fn from(value: f64) -> Self {
        WriteValue::Scalar(CellValue::Number(value))
    }
}

impl From<&str> for WriteValue {
    fn from(value: &str) -> Self {
        WriteValue::Scalar(CellValue::text(value))
    }
}

impl From<String> for WriteValue {
    fn from(value: String) -> Self {
        WriteValue::Scalar(CellValue::Text(value))
    }
}

impl From<Vec<CellValue>> for WriteValue {
    fn from(values: Vec<CellValue>) -> Self {
        WriteValue::Sequence(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_number_coercion() {
        assert_eq!(CellValue::Number(3.0).entry_number().as_deref(), Some("3"));
        assert_eq!(CellValue::text("3.0").entry_number().as_deref(), Some("3"));
        assert_eq!(CellValue::text(" 12 ").entry_number().as_deref(), Some("12"));
        assert_eq!(CellValue::text("Area input").entry_number(), None);
        assert_eq!(CellValue::Empty.entry_number(), None);
    }

    #[test]
    fn test_id_string() {
        assert_eq!(CellValue::Number(7.0).to_id_string(), "7");
        assert_eq!(CellValue::Number(7.5).to_id_string(), "7.5");
        assert_eq!(CellValue::text("12ud").to_id_string(), "12ud");
    }

    #[test]
    fn test_blank_and_integer() {
        assert!(CellValue::text("   ").is_blank());
        assert!(CellValue::Empty.is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(CellValue::Number(4.0).is_integer());
        assert!(!CellValue::Number(4.2).is_integer());
        assert!(!CellValue::text("total").is_integer());
    }
}
