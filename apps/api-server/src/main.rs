//! # Scribe API Server
//!
//! Actix-web entry point: owner-scoped posts, bearer authentication and the
//! public file disk.

use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Starting Scribe API server");

    let state = AppState::new(&config).await;

    // Covers are served straight from the public disk.
    let storage_root = config.storage.root.clone();
    std::fs::create_dir_all(&storage_root)?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(Files::new("/storage", &storage_root))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
