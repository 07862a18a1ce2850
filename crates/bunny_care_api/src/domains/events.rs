//! Calendar event endpoints.
//!
//! Events cover scheduled care (vet, grooming, litter) plus free-form dated
//! notes; `start` is the only required field on create.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;

use bunny_care_store::{
    CareEvent, DateRange, StoreError, normalize_event, normalize_event_patch,
};

use crate::domains::{RangeQuery, parse_id};
use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<CareEvent>>, ApiError> {
    let range = DateRange::from_params(query.from.as_deref(), query.to.as_deref())?;
    let events = state.store.list_events(&range).await?;
    Ok(Json(events))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CareEvent>), ApiError> {
    let new_event = normalize_event(&body)?;
    let event = state.store.create_event(new_event).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<CareEvent>, ApiError> {
    let id = parse_id(&id)?;
    let patch = normalize_event_patch(&body)?;
    let event = state
        .store
        .update_event(&id, patch)
        .await
        .map_err(store_error)?;
    Ok(Json(event))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete_event(&id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound("Event not found"),
        other => ApiError::Store(other),
    }
}
