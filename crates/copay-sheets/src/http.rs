//! Sheets values client: reads one range as a grid of raw cells.

use async_trait::async_trait;
use copay_core::Grid;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SheetRequest;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(
        "spreadsheet API returned {status}{}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Upstream {
        status: u16,
        /// Google's own error text; `None` when the body was not a Google error.
        message: Option<String>,
    },
    #[error("invalid spreadsheet API base URL '{0}'")]
    BaseUrl(String),
}

impl SheetsError {
    /// Status code of the spreadsheet API response, when it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SheetsError::Upstream { status, .. } => Some(*status),
            SheetsError::Http(err) => err.status().map(|s| s.as_u16()),
            SheetsError::BaseUrl(_) => None,
        }
    }

    /// Human-readable detail suitable for an API error body.
    pub fn detail(&self) -> String {
        match self {
            SheetsError::Upstream {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Where raw grids come from.
#[async_trait]
pub trait GridSource: Send + Sync {
    /// Fetch the cells of one range. `Ok(None)` means the range holds no values.
    async fn fetch_grid(&self, request: &SheetRequest) -> Result<Option<Grid>, SheetsError>;
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Grid>,
}

/// HTTP client for `GET {base}/{spreadsheetId}/values/{range}?key=...`.
pub struct SheetsClient {
    client: reqwest::Client,
    api_base: String,
}

impl SheetsClient {
    /// `api_base` is the spreadsheets collection URL, e.g.
    /// `https://sheets.googleapis.com/v4/spreadsheets`.
    pub fn new(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn values_url(&self, request: &SheetRequest) -> Result<Url, SheetsError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|_| SheetsError::BaseUrl(self.api_base.clone()))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::BaseUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend([request.spreadsheet_id.as_str(), "values", request.range.as_str()]);
        url.query_pairs_mut().append_pair("key", &request.api_key);
        Ok(url)
    }
}

#[async_trait]
impl GridSource for SheetsClient {
    async fn fetch_grid(&self, request: &SheetRequest) -> Result<Option<Grid>, SheetsError> {
        let url = self.values_url(request)?;

        // The URL carries the API key; log the parts instead.
        info!(
            spreadsheet = %request.spreadsheet_id,
            range = %request.range,
            "fetching sheet range"
        );
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = upstream_message(&body);
            warn!(status = status.as_u16(), message = ?message, "spreadsheet API error");
            if message.is_none() {
                debug!(body = %body.trim(), "unrecognised spreadsheet API error body");
            }
            return Err(SheetsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = resp.json().await?;
        info!(
            rows = range.values.as_ref().map_or(0, Vec::len),
            "fetched sheet range"
        );
        Ok(range.values)
    }
}

/// `error.message` from a Google API error body.
///
/// Anything else (a proxy's HTML page, an empty body) yields `None`.
fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .pointer("/error/message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use copay_core::CellValue;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request(range: &str) -> SheetRequest {
        SheetRequest {
            spreadsheet_id: "sheet-123".into(),
            range: range.into(),
            api_key: "secret".into(),
        }
    }

    #[test]
    fn values_url_encodes_range() {
        let client = SheetsClient::new("https://sheets.googleapis.com/v4/spreadsheets/".into());
        let url = client.values_url(&request("Página 2!A1:D")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/P%C3%A1gina%202!A1:D?key=secret"
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let client = SheetsClient::new("not a url".into());
        assert!(matches!(
            client.values_url(&request("A1:D")),
            Err(SheetsError::BaseUrl(_))
        ));
    }

    #[test]
    fn upstream_message_prefers_google_error() {
        let body = r#"{"error": {"code": 400, "message": "Unable to parse range: Foo!A1", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            upstream_message(body).as_deref(),
            Some("Unable to parse range: Foo!A1")
        );
        assert_eq!(upstream_message("  gateway timeout \n"), None);
        assert_eq!(upstream_message("<html><body>502</body></html>"), None);
        assert_eq!(upstream_message(r#"{"error": "plain"}"#), None);
    }

    #[tokio::test]
    async fn fetches_values_grid() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/sheet-123/values/Procedimentos!A1:I")
                    .query_param("key", "secret");
                then.status(200).json_body(json!({
                    "range": "Procedimentos!A1:I3",
                    "majorDimension": "ROWS",
                    "values": [["Código", "Nome do Plano"], ["P1", "Plano A"], ["P2"]]
                }));
            })
            .await;

        let client = SheetsClient::new(server.base_url());
        let grid = client
            .fetch_grid(&request("Procedimentos!A1:I"))
            .await
            .unwrap()
            .unwrap();
        mock.assert_async().await;
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][0], CellValue::from("P1"));
        assert_eq!(grid[2].len(), 1);
    }

    #[tokio::test]
    async fn missing_values_key_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sheet-123/values/Vazio!A1:D");
                then.status(200)
                    .json_body(json!({"range": "Vazio!A1:D1000", "majorDimension": "ROWS"}));
            })
            .await;

        let client = SheetsClient::new(server.base_url());
        let grid = client.fetch_grid(&request("Vazio!A1:D")).await.unwrap();
        assert!(grid.is_none());
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sheet-123/values/A1:D");
                then.status(403).json_body(json!({
                    "error": {"code": 403, "message": "The caller does not have permission"}
                }));
            })
            .await;

        let client = SheetsClient::new(server.base_url());
        let err = client.fetch_grid(&request("A1:D")).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(403));
        assert_eq!(err.detail(), "The caller does not have permission");
    }

    #[tokio::test]
    async fn non_google_error_body_has_no_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sheet-123/values/A1:D");
                then.status(502)
                    .header("content-type", "text/html")
                    .body("<html><body>Bad Gateway</body></html>");
            })
            .await;

        let client = SheetsClient::new(server.base_url());
        let err = client.fetch_grid(&request("A1:D")).await.unwrap_err();
        assert!(matches!(
            err,
            SheetsError::Upstream {
                status: 502,
                message: None
            }
        ));
        assert_eq!(err.to_string(), "spreadsheet API returned 502");
        assert!(!err.detail().contains("html"));
    }
}
