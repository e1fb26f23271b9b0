use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A city bound to an IANA timezone
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Timezone {
    /// IANA timezone identifier, e.g. `Europe/London`
    pub id: String,
    pub display_name: String,
    pub city_name: String,
    pub country_name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub population: u64,
    /// Offset at the time the record was served; recomputed on every lookup
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Timezone {
    pub fn new(
        id: impl Into<String>,
        city_name: impl Into<String>,
        country_name: impl Into<String>,
    ) -> Self {
        let city_name = city_name.into();
        Self {
            id: id.into(),
            display_name: city_name.clone(),
            city_name,
            country_name: country_name.into(),
            latitude: 0.0,
            longitude: 0.0,
            population: 0,
            utc_offset_minutes: 0,
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Identity of a record within the active list
    pub fn key(&self) -> (&str, &str) {
        (&self.id, &self.city_name)
    }

    pub fn same_city(&self, other: &Timezone) -> bool {
        self.key() == other.key()
    }
}

/// Where a directory entry came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CitySource {
    /// Bundled reference data
    Static,
    /// Learned from an external lookup
    #[serde(alias = "api")]
    Dynamic,
}

/// A directory record with its provenance
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub record: Timezone,
    pub source: CitySource,
    /// Set for dynamic entries only
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Ranked search results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub region: Option<String>,
    pub results: Vec<Timezone>,
}

/// Outcome of a live lookup against the external provider
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LookupResponse {
    pub query: String,
    pub sequence: u64,
    /// A newer lookup from the same client finished the race; results were discarded
    pub superseded: bool,
    pub results: Vec<Timezone>,
    pub error: Option<String>,
}

/// Directory and cache counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DirectoryStats {
    pub total_cities: usize,
    pub static_cities: usize,
    pub dynamic_cities: usize,
    pub cached_queries: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 { Period::Am } else { Period::Pm }
    }
}

/// One selectable half-hour-aligned local time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
    pub period: Period,
    /// 12-hour label, e.g. `9:30 PM`
    pub label: String,
    #[schema(value_type = String, format = DateTime)]
    pub local: DateTime<FixedOffset>,
    pub is_selected: bool,
}

/// Projected time slots for one timezone
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotsResponse {
    pub timezone: String,
    #[schema(value_type = String, format = DateTime)]
    pub reference: DateTime<Utc>,
    pub valid: bool,
    /// Fixed text to render instead of slots when the timezone is invalid
    pub placeholder: Option<String>,
    pub slots: Vec<TimeSlot>,
}

/// Current time in a timezone
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct TimeData {
    pub datetime: String,
    pub timezone: String,
    pub unix_time: i64,
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// A client's ordered timezone list; the first entry is home
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveTimezonesResponse {
    pub home: Timezone,
    pub timezones: Vec<Timezone>,
    /// Persisted state was unusable and has been replaced with the local zone
    pub reset: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CityKey {
    pub id: String,
    #[serde(rename = "city")]
    pub city_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThemeBody {
    pub theme: Theme,
}
