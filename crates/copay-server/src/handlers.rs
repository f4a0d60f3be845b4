use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use copay_core::{PartnerRecord, ProcedureRecord, to_records};
use copay_sheets::Sheet;
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, PartnersError, ProceduresError};

pub const PROCEDURES_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=600, public";
pub const PARTNERS_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate";

pub async fn get_procedures(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ProceduresError> {
    let request = state.config.request(Sheet::Procedures)?;
    let grid = state
        .source
        .fetch_grid(&request)
        .await?
        .ok_or(ApiError::NotFound)?;

    let records: Vec<ProcedureRecord> = to_records(&grid);
    info!(rows = grid.len(), records = records.len(), "serving procedures");
    Ok((
        [(header::CACHE_CONTROL, PROCEDURES_CACHE_CONTROL)],
        Json(records),
    )
        .into_response())
}

pub async fn get_partners(State(state): State<Arc<AppState>>) -> Result<Response, PartnersError> {
    let request = state.config.request(Sheet::Partners)?;
    let grid = state
        .source
        .fetch_grid(&request)
        .await?
        .filter(|grid| !grid.is_empty())
        .ok_or(ApiError::NotFound)?;

    let records: Vec<PartnerRecord> = to_records(&grid);
    info!(rows = grid.len(), records = records.len(), "serving partners");
    Ok((
        [(header::CACHE_CONTROL, PARTNERS_CACHE_CONTROL)],
        Json(records),
    )
        .into_response())
}
