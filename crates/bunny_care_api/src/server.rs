//! Router assembly and the serving loop.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use bunny_care_store::CareStore;

use crate::domains::{dashboard, events, logs};

pub const SERVICE_NAME: &str = "bunny-care-tracker-backend";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CareStore>,
}

/// Builds the full application router. Exposed separately from [`serve`] so
/// tests can run it on an ephemeral listener.
pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health))
        .route("/api/logs", get(logs::list).post(logs::create))
        .route("/api/logs/{id}", put(logs::update).delete(logs::delete))
        .route("/api/events", get(events::list).post(events::create))
        .route("/api/events/{id}", put(events::update).delete(events::delete))
        .route("/api/dashboard", get(dashboard::summary))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cors_origin: HeaderValue,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, service = SERVICE_NAME, "listening");

    axum::serve(listener, app(state, cors_origin))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": SERVICE_NAME,
        "ts": Utc::now().to_rfc3339(),
    }))
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install interrupt handler: {err}");
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
                error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("received interrupt, shutting down"),
        _ = terminate => info!("received terminate, shutting down"),
    }
}
