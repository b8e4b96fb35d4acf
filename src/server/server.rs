use anyhow::{Context, Result};
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info, warn};

use super::{
    error::ApiError, log_requests, state::*, track_routes::make_track_routes, ServerConfig,
};
use crate::uploads::{AudioUploads, AUDIO_ROUTE_PREFIX};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub tracks_count: Option<usize>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let tracks_count = match state.track_store.count_tracks() {
        Ok(count) => Some(count),
        Err(err) => {
            warn!("Could not count tracks: {:#}", err);
            None
        }
    };
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        tracks_count,
    })
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub fn make_app(
    config: ServerConfig,
    track_store: GuardedTrackStore,
    uploads: AudioUploads,
) -> Router {
    let audio_files_service = ServeDir::new(uploads.dir());
    let state = ServerState::new(config.clone(), track_store, uploads);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    home_router
        .merge(make_track_routes(state))
        .nest_service(AUDIO_ROUTE_PREFIX, audio_files_service)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes as usize))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level.clone(),
            log_requests,
        ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

pub async fn run_server(
    config: ServerConfig,
    track_store: GuardedTrackStore,
    uploads: AudioUploads,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, track_store, uploads);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}
