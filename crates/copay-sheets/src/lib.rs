//! Spreadsheet access: environment configuration, the Sheets values client
//! behind [`GridSource`], and the client for the catalog's own API.

pub mod catalog;
pub mod config;
pub mod http;

pub use catalog::{CatalogClient, CatalogError, FetchSequence, FetchTicket};
pub use config::{ConfigError, Sheet, SheetRequest, SheetsConfig};
pub use http::{GridSource, SheetsClient, SheetsError};
