use chrono::{DateTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use common::errors::AppError;
use common::models::{Period, TimeData, TimeSlot};
use common::timezone::{parse_zone, utc_offset_minutes};
use tracing::{debug, warn};

/// Hour offsets around the reference instant, inclusive start, exclusive end
const FIRST_OFFSET: i64 = -12;
const LAST_OFFSET: i64 = 12;
const SLOT_MINUTES: [u32; 2] = [0, 30];

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Valid(Vec<TimeSlot>),
    /// The zone id did not resolve; render `PLACEHOLDER` instead of slots
    Invalid,
}

impl Projection {
    pub const PLACEHOLDER: &'static str = "--:--";

    pub fn is_valid(&self) -> bool {
        matches!(self, Projection::Valid(_))
    }

    pub fn slots(&self) -> &[TimeSlot] {
        match self {
            Projection::Valid(slots) => slots,
            Projection::Invalid => &[],
        }
    }

    pub fn into_slots(self) -> Vec<TimeSlot> {
        match self {
            Projection::Valid(slots) => slots,
            Projection::Invalid => Vec::new(),
        }
    }
}

fn slot_instant(reference: DateTime<Utc>, hour_offset: i64, minute: u32) -> Option<DateTime<Utc>> {
    reference
        .checked_add_signed(TimeDelta::hours(hour_offset))?
        .with_minute(minute)?
        .with_second(0)?
        .with_nanosecond(0)
}

fn build_slot(instant: DateTime<Utc>, zone: &Tz, selected: (u32, u32)) -> TimeSlot {
    let local = instant.with_timezone(zone);
    let hour = local.hour();

    TimeSlot {
        hour,
        minute: local.minute(),
        period: Period::from_hour(hour),
        label: local.format("%-I:%M %p").to_string(),
        local: local.fixed_offset(),
        is_selected: (instant.hour(), instant.minute()) == selected,
    }
}

/// Half-hour slots for `timezone_id` from twelve hours before to eleven and a
/// half hours after `reference`, in chronological order.
///
/// A slot is selected when its UTC time of day matches the reference's, so
/// the highlight follows the clock time regardless of date.
pub fn project(reference: DateTime<Utc>, timezone_id: &str) -> Projection {
    let zone = match parse_zone(timezone_id) {
        Ok(zone) => zone,
        Err(e) => {
            debug!(zone = %timezone_id, error = %e, "Cannot project slots");
            return Projection::Invalid;
        }
    };

    let selected = (reference.hour(), reference.minute());
    let mut slots = Vec::with_capacity(SLOT_MINUTES.len() * (LAST_OFFSET - FIRST_OFFSET) as usize);

    for hour_offset in FIRST_OFFSET..LAST_OFFSET {
        for minute in SLOT_MINUTES {
            match slot_instant(reference, hour_offset, minute) {
                Some(instant) => slots.push(build_slot(instant, &zone, selected)),
                None => warn!(
                    zone = %timezone_id,
                    hour_offset,
                    minute,
                    "Skipping slot outside the representable range"
                ),
            }
        }
    }

    Projection::Valid(slots)
}

/// Current local time and offset for a zone
pub fn current_time(timezone_id: &str, now: DateTime<Utc>) -> Result<TimeData, AppError> {
    let zone = parse_zone(timezone_id)?;
    let local = now.with_timezone(&zone);

    Ok(TimeData {
        datetime: local.to_rfc3339(),
        timezone: zone.name().to_string(),
        unix_time: now.timestamp(),
        utc_offset_minutes: utc_offset_minutes(&zone, now),
    })
}
