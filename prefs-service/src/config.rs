use common::errors::AppError;
use common::tracing::LogFormat;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

pub struct Config {
    pub database_url: Option<String>,
    pub storage: StorageBackend,
    pub port: u16,
    /// Overrides the detected local zone for clients without a stored list
    pub default_zone: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL").ok();
        let storage = match env::var("STORAGE").ok().as_deref() {
            Some("memory") => StorageBackend::Memory,
            Some("postgres") => StorageBackend::Postgres,
            Some(other) => {
                return Err(AppError::validation(format!(
                    "STORAGE must be 'postgres' or 'memory', got '{}'",
                    other
                )));
            }
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };

        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::validation(
                "DATABASE_URL must be set for postgres storage",
            ));
        }

        Ok(Self {
            database_url,
            storage,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            default_zone: env::var("DEFAULT_TIMEZONE").ok(),
            log_format: LogFormat::from_env(),
        })
    }
}
