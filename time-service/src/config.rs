use common::tracing::LogFormat;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3003),
            log_format: LogFormat::from_env(),
        }
    }
}
