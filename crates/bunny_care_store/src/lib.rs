//! Care log records, write-side normalization, and the SQLite-backed store.

pub mod model;
pub mod normalize;
pub mod range;
pub mod sqlite;
pub mod store;

pub use model::{
    CareEvent, EventPatch, EventType, LogPatch, LogRecord, Mood, NewEvent, NewLog, PoopQuality,
};
pub use normalize::{
    NormalizeError, normalize_event, normalize_event_patch, normalize_log, normalize_log_patch,
};
pub use range::{DateRange, RangeParseError};
pub use sqlite::SqliteStore;
pub use store::{CareStore, StoreError};
