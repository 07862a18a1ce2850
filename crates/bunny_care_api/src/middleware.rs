//! Store wrapper for cross-cutting concerns.
//!
//! `LoggingStore` sits between the HTTP handlers and the backing store and
//! records every operation with its outcome and timing, keeping the
//! handlers free of instrumentation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use bunny_care_store::{
    CareEvent, CareStore, DateRange, EventPatch, LogPatch, LogRecord, NewEvent, NewLog, StoreError,
};

#[derive(Clone)]
pub struct LoggingStore<S: CareStore> {
    inner: Arc<S>,
}

impl<S: CareStore> LoggingStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Execute a fallible store operation with logging.
    async fn with_logging<F, Fut, T>(&self, operation: F, name: &str) -> Result<T, StoreError>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        let start = Instant::now();
        debug!("starting store operation: {name}");

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        match &result {
            Ok(_) => debug!("store operation {name} completed in {duration:?}"),
            Err(err) => debug!("store operation {name} failed in {duration:?}: {err}"),
        }

        result
    }
}

#[async_trait]
impl<S: CareStore> CareStore for LoggingStore<S> {
    async fn list_logs(&self, range: &DateRange) -> Result<Vec<LogRecord>, StoreError> {
        let range = *range;
        self.with_logging(
            |store| async move { store.list_logs(&range).await },
            "list_logs",
        )
        .await
    }

    async fn create_log(&self, log: NewLog) -> Result<LogRecord, StoreError> {
        self.with_logging(
            |store| async move { store.create_log(log).await },
            "create_log",
        )
        .await
    }

    async fn update_log(&self, id: &str, patch: LogPatch) -> Result<LogRecord, StoreError> {
        let id = id.to_owned();
        self.with_logging(
            |store| async move { store.update_log(&id, patch).await },
            "update_log",
        )
        .await
    }

    async fn delete_log(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_owned();
        self.with_logging(
            |store| async move { store.delete_log(&id).await },
            "delete_log",
        )
        .await
    }

    async fn list_events(&self, range: &DateRange) -> Result<Vec<CareEvent>, StoreError> {
        let range = *range;
        self.with_logging(
            |store| async move { store.list_events(&range).await },
            "list_events",
        )
        .await
    }

    async fn create_event(&self, event: NewEvent) -> Result<CareEvent, StoreError> {
        self.with_logging(
            |store| async move { store.create_event(event).await },
            "create_event",
        )
        .await
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<CareEvent, StoreError> {
        let id = id.to_owned();
        self.with_logging(
            |store| async move { store.update_event(&id, patch).await },
            "update_event",
        )
        .await
    }

    async fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_owned();
        self.with_logging(
            |store| async move { store.delete_event(&id).await },
            "delete_event",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bunny_care_store::SqliteStore;
    use chrono::NaiveDate;

    use super::*;

    struct EmptyStore;

    #[async_trait]
    impl CareStore for EmptyStore {
        async fn list_logs(&self, _range: &DateRange) -> Result<Vec<LogRecord>, StoreError> {
            Ok(vec![])
        }

        async fn create_log(&self, _log: NewLog) -> Result<LogRecord, StoreError> {
            Err(StoreError::Worker("read-only".into()))
        }

        async fn update_log(&self, _id: &str, _patch: LogPatch) -> Result<LogRecord, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn delete_log(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }

        async fn list_events(&self, _range: &DateRange) -> Result<Vec<CareEvent>, StoreError> {
            Ok(vec![])
        }

        async fn create_event(&self, _event: NewEvent) -> Result<CareEvent, StoreError> {
            Err(StoreError::Worker("read-only".into()))
        }

        async fn update_event(
            &self,
            _id: &str,
            _patch: EventPatch,
        ) -> Result<CareEvent, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn delete_event(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }
    }

    #[tokio::test]
    async fn logging_store_passes_results_through() {
        let store = LoggingStore::new(EmptyStore);

        let logs = store.list_logs(&DateRange::ALL).await.unwrap();
        assert!(logs.is_empty());

        let err = store.delete_log("anything").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn logging_store_wraps_a_real_backend() {
        let store = LoggingStore::new(SqliteStore::open_in_memory().unwrap());

        let new_log = NewLog {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            treats: 1,
            veggies: 2,
            pellets: 3,
            hay: true,
            water: true,
            litter: true,
            grooming: false,
            mood: bunny_care_store::Mood::Neutral,
            free_roaming_mins: 15,
            poop_quality: bunny_care_store::PoopQuality::Normal,
            notes: String::new(),
        };

        let created = store.create_log(new_log).await.unwrap();
        let listed = store.list_logs(&DateRange::ALL).await.unwrap();
        assert_eq!(listed, vec![created]);
    }
}
