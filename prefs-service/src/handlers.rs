use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use common::errors::AppError;
use common::models::{ActiveTimezonesResponse, CityKey, ReorderRequest, ThemeBody, Timezone};
use common::timezone::is_well_formed_id;
use tracing::info;
use uuid::Uuid;

use crate::active_list::ActiveTimezones;
use crate::locks::ClientLocks;
use crate::persisted::{self, Loaded};
use crate::store::PreferenceStore;

#[derive(Clone)]
pub struct AppState {
    pub store: PreferenceStore,
    /// Seed entry used when a client has no usable stored list
    pub fallback: Timezone,
    pub locks: ClientLocks,
}

impl AppState {
    pub fn new(store: PreferenceStore, fallback: Timezone) -> Self {
        Self {
            store,
            fallback,
            locks: ClientLocks::new(),
        }
    }
}

fn to_response(list: ActiveTimezones, reset: bool) -> ActiveTimezonesResponse {
    let home = list.home().clone();
    ActiveTimezonesResponse {
        home,
        timezones: list.into_vec(),
        reset,
    }
}

fn validate_record(record: &Timezone) -> Result<(), AppError> {
    if !is_well_formed_id(&record.id) {
        return Err(AppError::validation(format!(
            "'{}' is not a valid timezone id",
            record.id
        )));
    }
    if record.city_name.trim().is_empty() {
        return Err(AppError::validation("City name is required"));
    }
    Ok(())
}

/// Load, apply `change`, persist; serialized per client
async fn update_list<F>(
    state: &AppState,
    client_id: Uuid,
    change: F,
) -> Result<ActiveTimezonesResponse, AppError>
where
    F: FnOnce(&mut ActiveTimezones) -> Result<(), AppError>,
{
    let _guard = state.locks.lock(client_id).await;
    let Loaded { mut list, reset } =
        persisted::load_timezones(&state.store, client_id, &state.fallback).await?;
    change(&mut list)?;
    persisted::save_timezones(&state.store, client_id, &list).await?;
    Ok(to_response(list, reset))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "prefs-service" }))
}

#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/timezones",
    params(("client_id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Ordered timezone list, home first", body = ActiveTimezonesResponse)
    ),
    tag = "timezones"
)]
pub async fn get_timezones(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ActiveTimezonesResponse>, AppError> {
    // Loading may clear corrupted state
    let _guard = state.locks.lock(client_id).await;
    let Loaded { list, reset } =
        persisted::load_timezones(&state.store, client_id, &state.fallback).await?;
    Ok(Json(to_response(list, reset)))
}

#[utoipa::path(
    post,
    path = "/api/clients/{client_id}/timezones",
    params(("client_id" = Uuid, Path, description = "Client id")),
    request_body = Timezone,
    responses(
        (status = 200, description = "Updated list; unchanged if the city was already present", body = ActiveTimezonesResponse),
        (status = 400, description = "Malformed timezone record")
    ),
    tag = "timezones"
)]
pub async fn add_timezone(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(record): Json<Timezone>,
) -> Result<Json<ActiveTimezonesResponse>, AppError> {
    validate_record(&record)?;
    info!(client_id = %client_id, zone = %record.id, city = %record.city_name, "Adding timezone");

    let response = update_list(&state, client_id, |list| {
        if !list.add(record) {
            info!(client_id = %client_id, "Timezone already present");
        }
        Ok(())
    })
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{client_id}/timezones",
    params(
        ("client_id" = Uuid, Path, description = "Client id"),
        ("id" = String, Query, description = "IANA timezone id"),
        ("city" = String, Query, description = "City name")
    ),
    responses(
        (status = 200, description = "Updated list", body = ActiveTimezonesResponse),
        (status = 400, description = "Cannot remove the last timezone"),
        (status = 404, description = "City not in the list")
    ),
    tag = "timezones"
)]
pub async fn remove_timezone(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(key): Query<CityKey>,
) -> Result<Json<ActiveTimezonesResponse>, AppError> {
    info!(client_id = %client_id, zone = %key.id, city = %key.city_name, "Removing timezone");

    let response = update_list(&state, client_id, |list| {
        list.remove(&key.id, &key.city_name).map(|_| ())
    })
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/clients/{client_id}/timezones/home",
    params(("client_id" = Uuid, Path, description = "Client id")),
    request_body = Timezone,
    responses(
        (status = 200, description = "Updated list with the new home first", body = ActiveTimezonesResponse),
        (status = 400, description = "Malformed timezone record")
    ),
    tag = "timezones"
)]
pub async fn set_home(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(record): Json<Timezone>,
) -> Result<Json<ActiveTimezonesResponse>, AppError> {
    validate_record(&record)?;
    info!(client_id = %client_id, zone = %record.id, city = %record.city_name, "Setting home timezone");

    let response = update_list(&state, client_id, |list| {
        list.set_home(record);
        Ok(())
    })
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/clients/{client_id}/timezones/order",
    params(("client_id" = Uuid, Path, description = "Client id")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Reordered list", body = ActiveTimezonesResponse),
        (status = 400, description = "Position out of range")
    ),
    tag = "timezones"
)]
pub async fn reorder(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ActiveTimezonesResponse>, AppError> {
    info!(client_id = %client_id, from = request.from, to = request.to, "Reordering timezones");

    let response =
        update_list(&state, client_id, |list| list.reorder(request.from, request.to)).await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/clients/{client_id}/theme",
    params(("client_id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Theme preference", body = ThemeBody)
    ),
    tag = "theme"
)]
pub async fn get_theme(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = persisted::load_theme(&state.store, client_id).await?;
    Ok(Json(ThemeBody { theme }))
}

#[utoipa::path(
    put,
    path = "/api/clients/{client_id}/theme",
    params(("client_id" = Uuid, Path, description = "Client id")),
    request_body = ThemeBody,
    responses(
        (status = 200, description = "Theme saved", body = ThemeBody)
    ),
    tag = "theme"
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, AppError> {
    persisted::save_theme(&state.store, client_id, body.theme).await?;
    info!(client_id = %client_id, theme = ?body.theme, "Theme saved");
    Ok(Json(body))
}
