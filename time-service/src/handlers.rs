use axum::{
    extract::{Path, Query},
    response::Json,
};
use chrono::{DateTime, Utc};
use common::errors::AppError;
use common::models::{SlotsResponse, TimeData};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::projector::{self, Projection};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "time-service" }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotsParams {
    /// IANA timezone id
    pub tz: String,
    /// Reference instant (RFC 3339); defaults to now
    #[param(value_type = Option<String>)]
    pub at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/slots",
    params(SlotsParams),
    responses(
        (status = 200, description = "Time slots, or a placeholder for an unknown zone", body = SlotsResponse),
        (status = 400, description = "Malformed reference instant")
    ),
    tag = "time"
)]
pub async fn get_slots(Query(params): Query<SlotsParams>) -> Json<SlotsResponse> {
    let reference = params.at.unwrap_or_else(Utc::now);
    info!(zone = %params.tz, reference = %reference, "Slots request received");

    let projection = projector::project(reference, &params.tz);
    let valid = projection.is_valid();
    info!(zone = %params.tz, valid, slots = projection.slots().len(), "Slots projected");

    Json(SlotsResponse {
        timezone: params.tz,
        reference,
        valid,
        placeholder: (!valid).then(|| Projection::PLACEHOLDER.to_string()),
        slots: projection.into_slots(),
    })
}

#[utoipa::path(
    get,
    path = "/api/time/{zone}",
    params(
        ("zone" = String, Path, description = "IANA timezone id, e.g. Europe/London")
    ),
    responses(
        (status = 200, description = "Current time in the zone", body = TimeData),
        (status = 400, description = "Unknown timezone")
    ),
    tag = "time"
)]
pub async fn get_time(Path(zone): Path<String>) -> Result<Json<TimeData>, AppError> {
    info!(zone = %zone, "Time request received");

    let time = projector::current_time(&zone, Utc::now())?;

    Ok(Json(time))
}
