use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::Timezone;
use common::timezone::UNKNOWN_ZONE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Serialize, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeocodingResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    population: Option<u64>,
}

impl From<GeocodingResult> for Timezone {
    fn from(result: GeocodingResult) -> Self {
        let zone = result
            .timezone
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ZONE.to_string());

        Timezone::new(zone, result.name, result.country.unwrap_or_default())
            .with_coordinates(result.latitude, result.longitude)
            .with_population(result.population.unwrap_or(0))
    }
}

/// Live city lookup against an Open-Meteo compatible geocoding API.
///
/// Single attempt per call: a failure surfaces to the caller immediately.
pub struct GeocodingClient {
    http_client: HttpClient,
    base_url: String,
    max_results: u32,
}

impl GeocodingClient {
    pub fn new(base_url: String, timeout: Duration, max_results: u32) -> Result<Self, AppError> {
        Ok(Self {
            http_client: HttpClient::without_retries(timeout)?,
            base_url,
            max_results,
        })
    }

    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<Timezone>, AppError> {
        let url = format!(
            "{}?name={}&count={}&language=en&format=json",
            self.base_url,
            urlencoding::encode(query),
            self.max_results
        );

        info!(
            query = %query,
            retries = self.http_client.max_retries(),
            "Looking up cities from geocoding API"
        );

        let response: GeocodingResponse = self.http_client.get_json(&url).await?;
        let cities: Vec<Timezone> = response.results.into_iter().map(Timezone::from).collect();

        info!(query = %query, found = cities.len(), "Geocoding lookup finished");
        Ok(cities)
    }
}
