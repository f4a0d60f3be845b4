//! Spreadsheet source settings read from the environment.
//!
//! There are no defaults for the credential, sheet identifier or ranges. Each
//! endpoint asks only for what it needs, so a missing partners range does not
//! take the procedure table down with it.

use std::fmt;

use thiserror::Error;

pub const API_KEY_VAR: &str = "GOOGLE_SHEETS_API_KEY";
pub const SPREADSHEET_ID_VAR: &str = "SPREADSHEET_ID";
pub const PROCEDURES_RANGE_VAR: &str = "SPREADSHEET_RANGE";
pub const PARTNERS_RANGE_VAR: &str = "SPREADSHEET_RANGE_PARTNERS";
pub const API_BASE_VAR: &str = "SHEETS_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// The two ranges the catalog reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Procedures,
    Partners,
}

impl Sheet {
    pub fn range_var(self) -> &'static str {
        match self {
            Sheet::Procedures => PROCEDURES_RANGE_VAR,
            Sheet::Partners => PARTNERS_RANGE_VAR,
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sheet::Procedures => f.write_str("procedures"),
            Sheet::Partners => f.write_str("partners"),
        }
    }
}

/// Settings as found; any of them may be absent until an endpoint needs it.
#[derive(Clone, Default)]
pub struct SheetsConfig {
    pub api_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub procedures_range: Option<String>,
    pub partners_range: Option<String>,
    pub api_base: String,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("procedures_range", &self.procedures_range)
            .field("partners_range", &self.partners_range)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            api_key: get(API_KEY_VAR),
            spreadsheet_id: get(SPREADSHEET_ID_VAR),
            procedures_range: get(PROCEDURES_RANGE_VAR),
            partners_range: get(PARTNERS_RANGE_VAR),
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }

    /// Everything needed to fetch `sheet`, or the names of the missing variables.
    pub fn request(&self, sheet: Sheet) -> Result<SheetRequest, ConfigError> {
        let range = match sheet {
            Sheet::Procedures => &self.procedures_range,
            Sheet::Partners => &self.partners_range,
        };
        match (&self.api_key, &self.spreadsheet_id, range) {
            (Some(api_key), Some(spreadsheet_id), Some(range)) => Ok(SheetRequest {
                spreadsheet_id: spreadsheet_id.clone(),
                range: range.clone(),
                api_key: api_key.clone(),
            }),
            _ => {
                let mut missing = Vec::new();
                if self.api_key.is_none() {
                    missing.push(API_KEY_VAR);
                }
                if self.spreadsheet_id.is_none() {
                    missing.push(SPREADSHEET_ID_VAR);
                }
                if range.is_none() {
                    missing.push(sheet.range_var());
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }
}

/// One outbound range read.
#[derive(Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub spreadsheet_id: String,
    pub range: String,
    pub api_key: String,
}

impl fmt::Debug for SheetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetRequest")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
