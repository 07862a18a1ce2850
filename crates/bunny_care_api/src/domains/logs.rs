//! Daily care log endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;

use bunny_care_store::{DateRange, LogRecord, StoreError, normalize_log, normalize_log_patch};

use crate::domains::{RangeQuery, parse_id};
use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/logs
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let range = DateRange::from_params(query.from.as_deref(), query.to.as_deref())?;
    let logs = state.store.list_logs(&range).await?;
    Ok(Json(logs))
}

/// POST /api/logs
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<LogRecord>), ApiError> {
    let new_log = normalize_log(&body)?;
    let record = state.store.create_log(new_log).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/logs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<LogRecord>, ApiError> {
    let id = parse_id(&id)?;
    let patch = normalize_log_patch(&body)?;
    let record = state
        .store
        .update_log(&id, patch)
        .await
        .map_err(store_error)?;
    Ok(Json(record))
}

/// DELETE /api/logs/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete_log(&id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound("Log not found"),
        other => ApiError::Store(other),
    }
}
