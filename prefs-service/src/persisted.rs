use chrono::Utc;
use common::errors::AppError;
use common::models::{Theme, Timezone};
use common::timezone::{city_from_zone_id, is_well_formed_id, offset_for_id, parse_zone};
use tracing::{info, warn};
use uuid::Uuid;

use crate::active_list::ActiveTimezones;
use crate::store::PreferenceStore;

pub const TIMEZONES_KEY: &str = "timezones";
pub const THEME_KEY: &str = "theme";

const DEFAULT_ZONE: &str = "Etc/UTC";

/// The runtime's zone, if it is a well-formed id the database knows
pub fn detect_local_zone() -> String {
    match iana_time_zone::get_timezone() {
        Ok(zone) if is_well_formed_id(&zone) && parse_zone(&zone).is_ok() => zone,
        Ok(zone) => {
            warn!(zone = %zone, "Detected local zone is unusable, using {}", DEFAULT_ZONE);
            DEFAULT_ZONE.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Could not detect local zone, using {}", DEFAULT_ZONE);
            DEFAULT_ZONE.to_string()
        }
    }
}

/// Single-entry list seed for a zone id
pub fn timezone_for_zone(zone: &str) -> Timezone {
    Timezone::new(zone, city_from_zone_id(zone), "")
}

pub struct Loaded {
    pub list: ActiveTimezones,
    /// Persisted state was discarded
    pub reset: bool,
}

fn refresh_offsets(records: Vec<Timezone>) -> Vec<Timezone> {
    let now = Utc::now();
    records
        .into_iter()
        .map(|mut record| {
            record.utc_offset_minutes = offset_for_id(&record.id, now);
            record
        })
        .collect()
}

fn fallback_list(fallback: &Timezone, reset: bool) -> Loaded {
    let mut home = fallback.clone();
    home.utc_offset_minutes = offset_for_id(&home.id, Utc::now());
    Loaded {
        list: ActiveTimezones::new(home),
        reset,
    }
}

/// Load a client's list.
///
/// If any stored record has a malformed zone id, or the value cannot be
/// decoded, the whole stored list is cleared and `fallback` is used. A failed
/// read degrades to `fallback` without touching storage.
pub async fn load_timezones(
    store: &PreferenceStore,
    client_id: Uuid,
    fallback: &Timezone,
) -> Result<Loaded, AppError> {
    let raw = match store.get(client_id, TIMEZONES_KEY).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(client_id = %client_id, error = %e, "Failed to read stored timezones");
            return Ok(fallback_list(fallback, false));
        }
    };

    let Some(raw) = raw else {
        return Ok(fallback_list(fallback, false));
    };

    let records = match serde_json::from_str::<Vec<Timezone>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(client_id = %client_id, error = %e, "Stored timezones are not valid JSON");
            store.remove(client_id, TIMEZONES_KEY).await?;
            return Ok(fallback_list(fallback, true));
        }
    };

    if let Some(bad) = records.iter().find(|r| !is_well_formed_id(&r.id)) {
        warn!(
            client_id = %client_id,
            zone = %bad.id,
            "Stored timezone id is malformed, discarding stored list"
        );
        store.remove(client_id, TIMEZONES_KEY).await?;
        return Ok(fallback_list(fallback, true));
    }

    match ActiveTimezones::from_records(refresh_offsets(records)) {
        Some(list) => Ok(Loaded { list, reset: false }),
        None => Ok(fallback_list(fallback, false)),
    }
}

pub async fn save_timezones(
    store: &PreferenceStore,
    client_id: Uuid,
    list: &ActiveTimezones,
) -> Result<(), AppError> {
    let value = serde_json::to_string(list.as_slice())?;
    store.set(client_id, TIMEZONES_KEY, value).await?;
    info!(client_id = %client_id, count = list.len(), "Saved timezone list");
    Ok(())
}

/// Stored theme, or the default when absent or unreadable
pub async fn load_theme(store: &PreferenceStore, client_id: Uuid) -> Result<Theme, AppError> {
    let Some(raw) = store.get(client_id, THEME_KEY).await? else {
        return Ok(Theme::default());
    };

    match serde_json::from_str::<Theme>(&raw) {
        Ok(theme) => Ok(theme),
        Err(e) => {
            warn!(client_id = %client_id, error = %e, "Stored theme is invalid, clearing");
            store.remove(client_id, THEME_KEY).await?;
            Ok(Theme::default())
        }
    }
}

pub async fn save_theme(
    store: &PreferenceStore,
    client_id: Uuid,
    theme: Theme,
) -> Result<(), AppError> {
    store
        .set(client_id, THEME_KEY, serde_json::to_string(&theme)?)
        .await
}
