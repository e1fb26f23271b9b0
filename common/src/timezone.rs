//! IANA timezone helpers shared by the services.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::AppError;

/// Stand-in zone for lookup results that arrive without one
pub const UNKNOWN_ZONE: &str = "Etc/Unknown";

/// Resolve an IANA id against the bundled timezone database
pub fn parse_zone(id: &str) -> Result<Tz, AppError> {
    id.parse::<Tz>()
        .map_err(|_| AppError::invalid_timezone(id.to_string()))
}

/// Signed minutes east of UTC for `zone` at `at`
pub fn utc_offset_minutes(zone: &Tz, at: DateTime<Utc>) -> i32 {
    zone.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
        / 60
}

/// Offset for a zone id, or 0 when the id does not resolve
pub fn offset_for_id(id: &str, at: DateTime<Utc>) -> i32 {
    parse_zone(id)
        .map(|zone| utc_offset_minutes(&zone, at))
        .unwrap_or(0)
}

/// Structural check for `segment/segment(/segment)*` ids.
///
/// Segments may contain ASCII letters, digits, `_`, `+` and `-`. This is a
/// shape check only; `parse_zone` decides whether the zone exists.
pub fn is_well_formed_id(id: &str) -> bool {
    let mut segments = 0;
    for segment in id.split('/') {
        if segment.is_empty()
            || !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}

/// Human city name from the last segment of a zone id
pub fn city_from_zone_id(id: &str) -> String {
    id.rsplit('/').next().unwrap_or(id).replace('_', " ")
}
