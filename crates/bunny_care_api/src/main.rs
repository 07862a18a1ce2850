use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::net::TcpListener;

use bunny_care_api::config::Config;
use bunny_care_api::middleware::LoggingStore;
use bunny_care_api::server::{self, AppState};
use bunny_care_store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from `APP_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("APP_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!(
            "opening sqlite database at {}",
            config.database_path.display()
        )
    })?;
    let store = LoggingStore::new(store);

    let cors_origin = HeaderValue::from_str(&config.cors_origin)
        .context("CORS_ORIGIN is not a valid header value")?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;

    let state = AppState {
        store: Arc::new(store),
    };
    server::serve(listener, state, cors_origin)
        .await
        .context("server terminated abnormally")?;

    Ok(())
}
