//! The `CareStore` trait: the persistence seam the HTTP layer and tests
//! program against.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CareEvent, EventPatch, LogPatch, LogRecord, NewEvent, NewLog};
use crate::range::DateRange;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Update or delete addressed a record that does not exist.
    #[error("record not found")]
    NotFound,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The database worker thread is gone or refused the task.
    #[error("database worker unavailable: {0}")]
    Worker(String),
    /// A stored value could not be decoded into the record model.
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait CareStore: Send + Sync + 'static {
    /// Logs within `range`, newest date first, ties broken by creation order
    /// (newest first). The summary path reuses this and ignores the order.
    async fn list_logs(&self, range: &DateRange) -> Result<Vec<LogRecord>, StoreError>;
    async fn create_log(&self, log: NewLog) -> Result<LogRecord, StoreError>;
    async fn update_log(&self, id: &str, patch: LogPatch) -> Result<LogRecord, StoreError>;
    async fn delete_log(&self, id: &str) -> Result<(), StoreError>;
    /// Events whose start day falls within `range`, newest first.
    async fn list_events(&self, range: &DateRange) -> Result<Vec<CareEvent>, StoreError>;
    async fn create_event(&self, event: NewEvent) -> Result<CareEvent, StoreError>;
    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<CareEvent, StoreError>;
    async fn delete_event(&self, id: &str) -> Result<(), StoreError>;
}
