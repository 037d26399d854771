pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
pub mod models;
pub mod seed;
pub mod service;
pub mod telemetry;

use crate::config::ServerConfig;
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::http::{router, AppState};
use crate::service::ProfileService;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Opens the database once for the whole process and wraps it in the service.
pub fn open_service(config: &ServerConfig) -> AppResult<ProfileService<Database>> {
    let db = Database::new(&config.database_path)?;
    tracing::info!(path = %db.path().display(), "database opened");
    Ok(ProfileService::new(Arc::new(db)))
}

/// Binds the configured address and serves until ctrl-c.
pub async fn serve(config: &ServerConfig) -> AppResult<()> {
    let service = open_service(config)?;
    let listener = TcpListener::bind(config.bind_addr()?).await?;
    serve_on(listener, service, shutdown_signal()).await
}

pub async fn serve_on(
    listener: TcpListener,
    service: ProfileService<Database>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "profile api listening");

    axum::serve(listener, router(AppState { service }))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|error| AppError::Io(error.to_string()))?;

    tracing::info!("profile api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
