// In crates/web-server/src/lib.rs

use std::sync::{Arc, PoisonError};

use app_config::ServerSettings;
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
};
use core_types::{Column, Snapshot};
use engine::{Dashboard, RankedView, SharedDashboard};
use store::SnapshotLog;
use tokio::net::TcpListener;
use tokio::task;
use tower_http::services::ServeDir;
use types::WatchResponse;

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub log: SnapshotLog,
}

impl AppState {
    /// Runs `f` against the dashboard on the blocking pool. Transitions
    /// persist preferences to disk and may wait on a refresh holding the lock.
    async fn with_dashboard<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Dashboard) -> T + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = Arc::clone(&self.dashboard);
        task::spawn_blocking(move || {
            let mut guard = dashboard.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::Internal(format!("Dashboard worker failed: {e}")))
    }
}

/// Creates the main application router with all routes and middleware.
///
/// Anything that is not an API route falls through to the static dashboard
/// files in `static_dir`.
pub fn create_router(app_state: AppState, static_dir: &str) -> Router {
    // In a production environment, you would restrict the origin to your actual frontend domain.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    // Define the API sub-router
    let api_router = Router::new()
        .route("/fetch-coins", get(fetch_coins_handler))
        .route("/assets", get(get_assets_handler))
        .route("/sort/{column}", post(sort_handler))
        .route("/watch/{id}", post(toggle_watch_handler));

    // The main router.
    Router::new()
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .fallback_service(ServeDir::new(static_dir))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// A simple health check handler.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for `GET /api/fetch-coins`.
/// Returns the latest raw snapshot from today's log.
async fn fetch_coins_handler(State(state): State<AppState>) -> Result<Json<Snapshot>> {
    let log = state.log.clone();
    let latest = task::spawn_blocking(move || log.latest())
        .await
        .map_err(|e| Error::Internal(format!("Log reader failed: {e}")))?;
    match latest {
        Ok(Some(snapshot)) => Ok(Json(snapshot)),
        Ok(None) => Err(Error::NotFound("No data in today's log".to_string())),
        Err(e) => Err(Error::Internal(format!("Failed to read latest log entry: {e}"))),
    }
}

/// Handler for `GET /api/assets`.
async fn get_assets_handler(State(state): State<AppState>) -> Result<Json<RankedView>> {
    let view = state.with_dashboard(|dashboard| dashboard.view()).await?;
    Ok(Json(view.as_ref().clone()))
}

/// Handler for `POST /api/sort/{column}`.
async fn sort_handler(
    State(state): State<AppState>,
    Path(column): Path<String>,
) -> Result<Json<RankedView>> {
    let column: Column = column
        .parse()
        .map_err(|e: core_types::Error| Error::BadRequest(e.to_string()))?;
    tracing::debug!(%column, "Column activated");

    let view = state
        .with_dashboard(move |dashboard| dashboard.column_activated(column))
        .await?;
    Ok(Json(view.as_ref().clone()))
}

/// Handler for `POST /api/watch/{id}`.
async fn toggle_watch_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WatchResponse>> {
    if id.trim().is_empty() {
        return Err(Error::BadRequest("Asset id must not be empty".to_string()));
    }
    let watch_id = id.clone();
    let (watched, view) = state
        .with_dashboard(move |dashboard| dashboard.toggle_watch(&watch_id))
        .await?;
    Ok(Json(WatchResponse {
        id,
        watched,
        view: view.as_ref().clone(),
    }))
}

/// The main entry point for running the web server.
///
/// It will run forever until the process is terminated.
pub async fn run(settings: &ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state, &settings.static_dir);

    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServeError)?;

    Ok(())
}
