mod active_list;
mod config;
mod db;
mod handlers;
mod locks;
mod openapi;
mod persisted;
mod store;

use axum::{
    Router,
    routing::{get, put},
};
use common::timezone::{is_well_formed_id, parse_zone};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::StorageBackend;
use crate::store::PreferenceStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::from_env()?;
    common::tracing::init(config.log_format);

    let store = match (config.storage, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(url)) => PreferenceStore::Postgres(db::create_pool(url).await?),
        _ => {
            warn!("Using in-memory storage; preferences are lost on restart");
            PreferenceStore::memory()
        }
    };

    let zone = match config.default_zone {
        Some(zone) if is_well_formed_id(&zone) && parse_zone(&zone).is_ok() => zone,
        Some(zone) => {
            warn!(zone = %zone, "DEFAULT_TIMEZONE is not usable, detecting local zone");
            persisted::detect_local_zone()
        }
        None => persisted::detect_local_zone(),
    };
    info!(zone = %zone, "Fallback timezone selected");

    let state = handlers::AppState::new(store, persisted::timezone_for_zone(&zone));

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Prefs service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Prefs service stopped");
    Ok(())
}

fn create_router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/clients/{client_id}/timezones",
            get(handlers::get_timezones)
                .post(handlers::add_timezone)
                .delete(handlers::remove_timezone),
        )
        .route(
            "/api/clients/{client_id}/timezones/home",
            put(handlers::set_home),
        )
        .route(
            "/api/clients/{client_id}/timezones/order",
            put(handlers::reorder),
        )
        .route(
            "/api/clients/{client_id}/theme",
            get(handlers::get_theme).put(handlers::set_theme),
        )
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    warn!("Shutting down gracefully...");
}
