//! SQLite-backed [`CareStore`].
//!
//! A dedicated worker thread owns the single connection; async callers send
//! `FnOnce(&mut Connection)` tasks over a channel and await the reply on a
//! oneshot. Partial updates are read-merge-write inside one task, so they
//! are atomic with respect to every other store operation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};
use tokio::sync::oneshot;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::model::{
    CareEvent, EventPatch, EventType, LogPatch, LogRecord, Mood, NewEvent, NewLog, PoopQuality,
};
use crate::range::DateRange;
use crate::store::{CareStore, StoreError};

const SCHEMA: &str = include_str!("schema.sql");

const LOG_COLUMNS: &str = "id, date, treats, veggies, pellets, hay, water, litter, grooming, \
     mood, free_roaming_mins, poop_quality, notes, created_at, updated_at";

const EVENT_COLUMNS: &str =
    "id, type, start_date, end_date, all_day, title, notes, created_at, updated_at";

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Run(DbTask),
    Shutdown,
}

enum Target {
    File(PathBuf),
    Memory,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if self.sender.send(DbCommand::Shutdown).is_err() {
                error!("database worker was already gone at shutdown");
            }
            if handle.join().is_err() {
                error!("failed to join database worker thread");
            }
        }
    }
}

#[derive(Clone)]
struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    fn start(target: Target) -> Result<Self, StoreError> {
        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("bunny-care-db".into())
            .spawn(move || {
                let mut conn = match open_connection(&target) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("failed to enable WAL mode: {err}");
                }

                let init_result = conn.execute_batch(SCHEMA).map_err(StoreError::from);
                if ready_tx.send(init_result).is_err() {
                    error!("store startup receiver dropped before the ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Run(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                debug!("database worker shutting down");
            })?;

        ready_rx
            .recv()
            .map_err(|_| StoreError::Worker("worker exited before signaling readiness".into()))??;

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    async fn run<F, T>(&self, task: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Run(Box::new(move |conn| {
            if reply_tx.send(task(conn)).is_err() {
                error!("store caller dropped before receiving the result");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|_| StoreError::Worker("worker is no longer accepting tasks".into()))?;

        reply_rx
            .await
            .map_err(|_| StoreError::Worker("worker terminated unexpectedly".into()))?
    }
}

fn open_connection(target: &Target) -> Result<Connection, StoreError> {
    let conn = match target {
        Target::File(path) => Connection::open(path)?,
        Target::Memory => Connection::open_in_memory()?,
    };
    Ok(conn)
}

/// [`CareStore`] over a local SQLite file, or an in-memory database for
/// tests and ephemeral runs.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            // A bare filename has an empty parent; don't try to create "".
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::start(Target::File(path.clone()))?;
        info!(path = %path.display(), "sqlite store ready");
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = Database::start(Target::Memory)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl CareStore for SqliteStore {
    async fn list_logs(&self, range: &DateRange) -> Result<Vec<LogRecord>, StoreError> {
        let range = *range;
        self.db
            .run(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {LOG_COLUMNS} FROM logs
                     WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
                     ORDER BY date DESC, created_at DESC"
                ))?;

                let mut rows = stmt.query(params![
                    range.from.map(|day| day.to_string()),
                    range.to.map(|day| day.to_string()),
                ])?;
                let mut logs = Vec::new();
                while let Some(row) = rows.next()? {
                    logs.push(row_to_log(row)?);
                }

                Ok(logs)
            })
            .await
    }

    async fn create_log(&self, log: NewLog) -> Result<LogRecord, StoreError> {
        let now = Utc::now();
        let record = LogRecord {
            id: Uuid::new_v4().to_string(),
            date: log.date,
            treats: Some(log.treats),
            veggies: Some(log.veggies),
            pellets: Some(log.pellets),
            hay: Some(log.hay),
            water: Some(log.water),
            litter: Some(log.litter),
            grooming: Some(log.grooming),
            mood: Some(log.mood),
            free_roaming_mins: Some(log.free_roaming_mins),
            poop_quality: Some(log.poop_quality),
            notes: Some(log.notes),
            created_at: now,
            updated_at: now,
        };

        self.db
            .run(move |conn| {
                insert_log(conn, &record)?;
                Ok(record)
            })
            .await
    }

    async fn update_log(&self, id: &str, patch: LogPatch) -> Result<LogRecord, StoreError> {
        let id = id.to_owned();
        self.db
            .run(move |conn| {
                let mut record = get_log(conn, &id)?.ok_or(StoreError::NotFound)?;
                patch.apply(&mut record);
                record.updated_at = Utc::now();
                write_log(conn, &record)?;
                Ok(record)
            })
            .await
    }

    async fn delete_log(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_owned();
        self.db
            .run(move |conn| {
                let affected = conn.execute("DELETE FROM logs WHERE id = ?1", params![id])?;
                if affected == 0 {
                    return Err(StoreError::NotFound);
                }
                Ok(())
            })
            .await
    }

    async fn list_events(&self, range: &DateRange) -> Result<Vec<CareEvent>, StoreError> {
        let range = *range;
        self.db
            .run(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events
                     WHERE (?1 IS NULL OR start_date >= ?1) AND (?2 IS NULL OR start_date <= ?2)
                     ORDER BY start_date DESC, created_at DESC"
                ))?;

                let mut rows = stmt.query(params![
                    range.from.map(|day| day.to_string()),
                    range.to.map(|day| day.to_string()),
                ])?;
                let mut events = Vec::new();
                while let Some(row) = rows.next()? {
                    events.push(row_to_event(row)?);
                }

                Ok(events)
            })
            .await
    }

    async fn create_event(&self, event: NewEvent) -> Result<CareEvent, StoreError> {
        let now = Utc::now();
        let record = CareEvent {
            id: Uuid::new_v4().to_string(),
            event_type: event.event_type,
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            title: event.title,
            notes: Some(event.notes),
            created_at: now,
            updated_at: now,
        };

        self.db
            .run(move |conn| {
                insert_event(conn, &record)?;
                Ok(record)
            })
            .await
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<CareEvent, StoreError> {
        let id = id.to_owned();
        self.db
            .run(move |conn| {
                let mut event = get_event(conn, &id)?.ok_or(StoreError::NotFound)?;
                patch.apply(&mut event);
                event.updated_at = Utc::now();
                write_event(conn, &event)?;
                Ok(event)
            })
            .await
    }

    async fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_owned();
        self.db
            .run(move |conn| {
                let affected = conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
                if affected == 0 {
                    return Err(StoreError::NotFound);
                }
                Ok(())
            })
            .await
    }
}

fn insert_log(conn: &Connection, record: &LogRecord) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO logs ({LOG_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ),
        params![
            record.id,
            record.date.to_string(),
            record.treats,
            record.veggies,
            record.pellets,
            record.hay,
            record.water,
            record.litter,
            record.grooming,
            record.mood.map(Mood::as_str),
            record.free_roaming_mins,
            record.poop_quality.map(PoopQuality::as_str),
            record.notes,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn write_log(conn: &Connection, record: &LogRecord) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE logs
         SET date = ?2, treats = ?3, veggies = ?4, pellets = ?5, hay = ?6, water = ?7,
             litter = ?8, grooming = ?9, mood = ?10, free_roaming_mins = ?11,
             poop_quality = ?12, notes = ?13, updated_at = ?14
         WHERE id = ?1",
        params![
            record.id,
            record.date.to_string(),
            record.treats,
            record.veggies,
            record.pellets,
            record.hay,
            record.water,
            record.litter,
            record.grooming,
            record.mood.map(Mood::as_str),
            record.free_roaming_mins,
            record.poop_quality.map(PoopQuality::as_str),
            record.notes,
            record.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn get_log(conn: &Connection, id: &str) -> Result<Option<LogRecord>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {LOG_COLUMNS} FROM logs WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_log(row)?)),
        None => Ok(None),
    }
}

fn row_to_log(row: &Row<'_>) -> Result<LogRecord, StoreError> {
    Ok(LogRecord {
        id: row.get(0)?,
        date: parse_date(&row.get::<_, String>(1)?)?,
        treats: row.get(2)?,
        veggies: row.get(3)?,
        pellets: row.get(4)?,
        hay: row.get(5)?,
        water: row.get(6)?,
        litter: row.get(7)?,
        grooming: row.get(8)?,
        mood: row
            .get::<_, Option<String>>(9)?
            .as_deref()
            .and_then(Mood::parse),
        free_roaming_mins: row.get(10)?,
        poop_quality: row
            .get::<_, Option<String>>(11)?
            .as_deref()
            .and_then(PoopQuality::parse),
        notes: row.get(12)?,
        created_at: parse_timestamp(&row.get::<_, String>(13)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(14)?)?,
    })
}

fn insert_event(conn: &Connection, event: &CareEvent) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO events ({EVENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            event.id,
            event.event_type.map(EventType::as_str),
            event.start.to_string(),
            event.end.map(|end| end.to_rfc3339()),
            event.all_day,
            event.title,
            event.notes,
            event.created_at.to_rfc3339(),
            event.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn write_event(conn: &Connection, event: &CareEvent) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE events
         SET type = ?2, start_date = ?3, end_date = ?4, all_day = ?5, title = ?6,
             notes = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            event.id,
            event.event_type.map(EventType::as_str),
            event.start.to_string(),
            event.end.map(|end| end.to_rfc3339()),
            event.all_day,
            event.title,
            event.notes,
            event.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn get_event(conn: &Connection, id: &str) -> Result<Option<CareEvent>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_event(row)?)),
        None => Ok(None),
    }
}

fn row_to_event(row: &Row<'_>) -> Result<CareEvent, StoreError> {
    Ok(CareEvent {
        id: row.get(0)?,
        event_type: row
            .get::<_, Option<String>>(1)?
            .as_deref()
            .and_then(EventType::parse),
        start: parse_date(&row.get::<_, String>(2)?)?,
        end: row
            .get::<_, Option<String>>(3)?
            .as_deref()
            .map(parse_timestamp)
            .transpose()?,
        all_day: row.get(4)?,
        title: row.get(5)?,
        notes: row.get(6)?,
        created_at: parse_timestamp(&row.get::<_, String>(7)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(8)?)?,
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| StoreError::Corrupt(format!("invalid date '{value}': {err}")))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Corrupt(format!("invalid timestamp '{value}': {err}")))
}
