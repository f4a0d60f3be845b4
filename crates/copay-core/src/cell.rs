//! Raw spreadsheet cells and their coercion into typed field values.
//!
//! Coercion never fails: malformed input degrades to the field's zero value
//! so one dirty row cannot break a whole response.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;

/// Lowercased tokens that mark a procedure as carrying a copay.
pub const AFFIRMATIVE_TOKENS: &[&str] = &["sim", "true"];

/// A grid of raw cells as returned by the spreadsheet source, header row first.
pub type Grid = Vec<Vec<CellValue>>;

/// An untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            Value::String(s) => CellValue::Text(s),
            // Sheets never nests values; keep the JSON text rather than dropping it.
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl CellValue {
    /// Stringified cell; `Empty` becomes `""`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
        }
    }
}

/// Coerce a string field. Absent cells become `""`.
pub fn coerce_text(cell: Option<&CellValue>) -> String {
    cell.map(|c| c.to_text().trim().to_string()).unwrap_or_default()
}

/// Coerce the copay flag against [`AFFIRMATIVE_TOKENS`].
pub fn coerce_flag(cell: Option<&CellValue>) -> bool {
    match cell {
        Some(CellValue::Bool(b)) => *b,
        Some(cell) => {
            let token = cell.to_text().trim().to_lowercase();
            AFFIRMATIVE_TOKENS.contains(&token.as_str())
        }
        None => false,
    }
}

/// Coerce a percent-formatted cell (`"25%"`, `"12,5 %"`, `30`) into a
/// non-negative number. Anything unparseable becomes `0`.
pub fn coerce_percent(cell: Option<&CellValue>) -> f64 {
    let value = match cell {
        Some(CellValue::Number(n)) => *n,
        Some(cell) => parse_percent(&cell.to_text()),
        None => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_percent(text: &str) -> f64 {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    // pt-BR sheets write the decimal separator as a comma.
    let number = if !number.contains('.') && number.matches(',').count() == 1 {
        Cow::Owned(number.replace(',', "."))
    } else {
        Cow::Borrowed(number)
    };
    number.parse::<f64>().unwrap_or(0.0)
}
