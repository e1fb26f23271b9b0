use axum::{
    extract::{Query, State},
    response::Json,
};
use common::models::{DirectoryEntry, DirectoryStats, LookupResponse, SearchResponse, Timezone};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;

use crate::service::{CityService, DEFAULT_LIMIT};

const MAX_LIMIT: usize = 100;

pub type AppState = Arc<CityService>;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "city-service" }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring of the city name
    #[serde(default)]
    pub q: String,
    /// Country name to restrict results to
    pub region: Option<String>,
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/cities/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Population-ranked matches", body = SearchResponse)
    ),
    tag = "cities"
)]
pub async fn search(
    State(service): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    info!(query = %params.q, region = ?params.region, limit, "Search request received");

    let results = service
        .search_cities(&params.q, params.region.as_deref(), limit)
        .await;

    Json(SearchResponse {
        query: params.q,
        region: params.region,
        results,
    })
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LookupParams {
    #[serde(default)]
    pub q: String,
    /// Caller identity used to discard superseded responses
    pub client: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/cities/lookup",
    params(LookupParams),
    responses(
        (status = 200, description = "Cities found by the external provider", body = LookupResponse)
    ),
    tag = "cities"
)]
pub async fn lookup(
    State(service): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Json<LookupResponse> {
    let client = params.client.as_deref().unwrap_or("anonymous");
    info!(query = %params.q, client = %client, "Lookup request received");

    Json(service.live_lookup(client, &params.q).await)
}

#[utoipa::path(
    get,
    path = "/api/cities/static",
    responses(
        (status = 200, description = "Bundled cities", body = Vec<Timezone>)
    ),
    tag = "cities"
)]
pub async fn static_cities(State(service): State<AppState>) -> Json<Vec<Timezone>> {
    Json(service.get_static_cities().await.into_values().collect())
}

#[utoipa::path(
    get,
    path = "/api/cities/dynamic",
    responses(
        (status = 200, description = "Cities learned from live lookups", body = Vec<DirectoryEntry>)
    ),
    tag = "cities"
)]
pub async fn dynamic_cities(State(service): State<AppState>) -> Json<Vec<DirectoryEntry>> {
    Json(service.get_dynamic_cities().await)
}

#[utoipa::path(
    get,
    path = "/api/cities/stats",
    responses(
        (status = 200, description = "Directory and cache counters", body = DirectoryStats)
    ),
    tag = "cities"
)]
pub async fn stats(State(service): State<AppState>) -> Json<DirectoryStats> {
    Json(service.stats().await)
}
