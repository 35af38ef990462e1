//! JSON endpoints

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{RawQuery, State},
};
use chrono::{DateTime, Utc};
use fundex_core::{CatalogView, FilterSelection, ListQuery, RowOrder, SnapshotInfo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` once a snapshot is published, `loading` before that
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub snapshot: Option<SnapshotInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub name: String,
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetsResponse {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub categories: Vec<CategoryFacet>,
    pub risks: Vec<String>,
}

/// Body of `POST /api/funds/query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FundsQuery {
    pub selection: FilterSelection,
    pub sort: RowOrder,
    pub limit: Option<usize>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.catalog.current().map(|s| s.info());
    Json(HealthResponse {
        status: if snapshot.is_some() { "healthy" } else { "loading" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        snapshot,
    })
}

pub async fn facets(State(state): State<Arc<AppState>>) -> ApiResult<Json<FacetsResponse>> {
    let snapshot = state.catalog.current().ok_or_else(ApiError::not_loaded)?;
    let categories = snapshot
        .facets
        .iter()
        .map(|(name, subs)| CategoryFacet {
            name: name.to_string(),
            subcategories: subs.iter().cloned().collect(),
        })
        .collect();

    Ok(Json(FacetsResponse {
        generation: snapshot.generation,
        loaded_at: snapshot.loaded_at,
        categories,
        risks: snapshot.risks.iter().cloned().collect(),
    }))
}

pub async fn list_funds(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<CatalogView>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::validation(format!("malformed query string: {e}"), None))?;
    let query = ListQuery::from_pairs(pairs)
        .map_err(|e| ApiError::validation(e.to_string(), Some(e.field.as_str())))?;

    filtered_view(&state, &query.selection, query.order, query.limit).map(Json)
}

pub async fn query_funds(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FundsQuery>,
) -> ApiResult<Json<CatalogView>> {
    filtered_view(&state, &request.selection, request.sort, request.limit).map(Json)
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<SnapshotInfo>> {
    let snapshot = state.catalog.refresh().await?;
    info!(generation = snapshot.generation, "Catalog refreshed on request");
    Ok(Json(snapshot.info()))
}

fn filtered_view(
    state: &AppState,
    selection: &FilterSelection,
    order: RowOrder,
    limit: Option<usize>,
) -> ApiResult<CatalogView> {
    let mut view = state.catalog.view(selection, order).ok_or_else(ApiError::not_loaded)?;
    if let Some(limit) = limit {
        view.rows.truncate(limit);
    }
    debug!(
        generation = view.generation,
        matched = view.matched,
        returned = view.rows.len(),
        "Served filtered view"
    );
    Ok(view)
}
