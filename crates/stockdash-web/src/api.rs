use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use stockdash_core::{CompanyDirectoryEntry, StoredRow, Symbol, Warehouse, COMPANIES};
use tracing::instrument;

use crate::error::ApiError;
use crate::service::{self, StockSummary};
use crate::state::AppState;

/// Default row cap for `GET /stored`.
pub const DEFAULT_STORED_LIMIT: usize = 200;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StoredQuery {
    pub limit: Option<usize>,
}

#[instrument]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Stock Dashboard API running",
    })
}

#[instrument]
pub async fn companies_handler() -> Json<[CompanyDirectoryEntry; 10]> {
    Json(COMPANIES)
}

#[instrument(skip(app_state))]
pub async fn stock_handler(
    State(app_state): State<AppState>,
    raw_symbol: Result<Path<String>, PathRejection>,
) -> Result<Json<StockSummary>, ApiError> {
    let Path(raw_symbol) = raw_symbol?;
    let symbol = Symbol::parse(&raw_symbol)?;
    let summary = service::stock_summary(&app_state, symbol).await?;
    Ok(Json(summary))
}

#[instrument(skip(app_state))]
pub async fn refresh_handler(
    State(app_state): State<AppState>,
    raw_symbol: Result<Path<String>, PathRejection>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let Path(raw_symbol) = raw_symbol?;
    let symbol = Symbol::parse(&raw_symbol)?;
    service::refresh(&app_state, &symbol).await?;
    Ok(Json(RefreshResponse {
        status: "ok",
        message: format!("Refreshed and saved data for {symbol}"),
    }))
}

#[instrument(skip(warehouse))]
pub async fn stored_handler(
    State(warehouse): State<Warehouse>,
    query: Result<Query<StoredQuery>, QueryRejection>,
) -> Result<Json<Vec<StoredRow>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_STORED_LIMIT);
    let rows = tokio::task::spawn_blocking(move || warehouse.stored_rows(limit)).await??;
    Ok(Json(rows))
}
