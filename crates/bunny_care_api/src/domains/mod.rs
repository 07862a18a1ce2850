//! Handler modules, one per resource.
//!
//! - [`logs`]: daily care log CRUD
//! - [`events`]: calendar event CRUD
//! - [`dashboard`]: summary statistics over a date range

pub mod dashboard;
pub mod events;
pub mod logs;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// The `?from=...&to=...` pair accepted by every listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Ids are canonical hyphenated UUIDs. Anything unparseable is rejected
/// before touching the store; parseable variants are normalized so lookups
/// match the stored form.
pub(crate) fn parse_id(raw: &str) -> Result<String, ApiError> {
    match Uuid::parse_str(raw) {
        Ok(id) => Ok(id.to_string()),
        Err(_) => Err(ApiError::InvalidId),
    }
}
