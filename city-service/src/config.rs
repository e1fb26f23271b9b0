use common::tracing::LogFormat;
use std::env;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub geocoding_api_url: String,
    pub search_cache_size: usize,
    pub lookup_timeout: Duration,
    pub lookup_max_results: u32,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            geocoding_api_url: env::var("GEOCODING_API_URL")
                .unwrap_or_else(|_| "https://geocoding-api.open-meteo.com/v1/search".to_string()),
            search_cache_size: env::var("SEARCH_CACHE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            lookup_timeout: Duration::from_secs(
                env::var("LOOKUP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            lookup_max_results: env::var("LOOKUP_MAX_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            log_format: LogFormat::from_env(),
        }
    }
}
