//! Client for the catalog's own HTTP API.
//!
//! Overlapping fetches of the same endpoint resolve last-request-wins: each
//! fetch takes a ticket from a [`FetchSequence`], and a response that arrives
//! after a newer fetch began is reported as [`CatalogError::Superseded`]
//! instead of being handed to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

use copay_core::{PartnerRecord, ProcedureRecord};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

pub const PROCEDURES_PATH: &str = "/api/getProcedures";
pub const PARTNERS_PATH: &str = "/api/getPartners";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("superseded by a newer request")]
    Superseded,
}

/// Monotonic ticket issued when a fetch begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Last-request-wins guard for one kind of fetch.
#[derive(Debug, Default)]
pub struct FetchSequence {
    issued: AtomicU64,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer fetch has begun.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the latest.
    pub fn settle<T>(&self, ticket: FetchTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

/// HTTP client for `/api/getProcedures` and `/api/getPartners`.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    procedures: FetchSequence,
    partners: FetchSequence,
}

impl CatalogClient {
    /// `base_url` should be like `http://localhost:3000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            procedures: FetchSequence::new(),
            partners: FetchSequence::new(),
        }
    }

    pub async fn fetch_procedures(&self) -> Result<Vec<ProcedureRecord>, CatalogError> {
        self.fetch_latest(&self.procedures, PROCEDURES_PATH).await
    }

    pub async fn fetch_partners(&self) -> Result<Vec<PartnerRecord>, CatalogError> {
        self.fetch_latest(&self.partners, PARTNERS_PATH).await
    }

    async fn fetch_latest<T: DeserializeOwned>(
        &self,
        sequence: &FetchSequence,
        path: &str,
    ) -> Result<T, CatalogError> {
        let ticket = sequence.begin();
        let result = self.fetch(path).await;
        match sequence.settle(ticket, result) {
            Some(result) => result,
            None => {
                debug!(path, ?ticket, "discarding superseded response");
                Err(CatalogError::Superseded)
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        info!(url = %url, "fetching catalog data");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = api_message(&body)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json().await?)
    }
}

/// The `message` (procedures) or `error` (partners) field of an error body.
fn api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
}
