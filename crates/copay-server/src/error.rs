//! Request failures and their JSON bodies.
//!
//! The two endpoints answer errors in different shapes: procedures with
//! `{message, details}`, partners with `{error}`. Front ends already depend
//! on both.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use copay_sheets::{ConfigError, SheetsError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upstream(#[from] SheetsError),
    #[error("no data in the configured range")]
    NotFound,
}

macro_rules! endpoint_error_from {
    ($name:ident) => {
        impl From<ApiError> for $name {
            fn from(err: ApiError) -> Self {
                Self(err)
            }
        }

        impl From<ConfigError> for $name {
            fn from(err: ConfigError) -> Self {
                Self(err.into())
            }
        }

        impl From<SheetsError> for $name {
            fn from(err: SheetsError) -> Self {
                Self(err.into())
            }
        }
    };
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
    details: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Failure of `/api/getProcedures`.
#[derive(Debug)]
pub struct ProceduresError(pub ApiError);

endpoint_error_from!(ProceduresError);

impl IntoResponse for ProceduresError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Missing Google Sheets API configuration in environment variables.",
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "No data found in spreadsheet or range is invalid.",
            ),
            ApiError::Upstream(err) => (
                passthrough_status(err),
                "Failed to fetch data from Google Sheets.",
            ),
        };
        let details = match &self.0 {
            ApiError::Upstream(err) => err.detail(),
            other => other.to_string(),
        };
        error!(status = status.as_u16(), error = %self.0, "procedures request failed");
        (status, Json(MessageBody { message, details })).into_response()
    }
}

/// Failure of `/api/getPartners`.
#[derive(Debug)]
pub struct PartnersError(pub ApiError);

endpoint_error_from!(PartnersError);

impl IntoResponse for PartnersError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API configuration is incomplete.".to_string(),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "No data found in partner spreadsheet or range is invalid.".to_string(),
            ),
            ApiError::Upstream(SheetsError::Upstream {
                message: Some(message),
                ..
            }) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            ApiError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch data.".to_string(),
            ),
        };
        error!(status = status.as_u16(), error = %self.0, "partners request failed");
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// The spreadsheet API's own error status when it answered with one, else 500.
fn passthrough_status(err: &SheetsError) -> StatusCode {
    err.upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
