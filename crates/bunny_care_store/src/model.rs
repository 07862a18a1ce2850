//! Record types for daily care logs and calendar events.
//!
//! Stored records keep every metric optional: rows written outside the
//! normalized write path (legacy imports, manual SQL) may lack them, and the
//! summary engine treats a missing value as zero/false rather than failing.
//! The `New*` types are the strict output of write-side normalization; the
//! `*Patch` types carry only the fields a partial update actually provided.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Mood recorded for a day. Unknown input falls back to `Neutral` at the
/// write boundary (see `normalize`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Playful,
    Sleepy,
    Neutral,
    Sad,
    Zoomies,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Playful,
        Mood::Sleepy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Zoomies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Playful => "playful",
            Mood::Sleepy => "sleepy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Zoomies => "zoomies",
        }
    }

    /// Case-insensitive match against the allow-list; `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(value))
    }
}

/// Poop quality observed for a day. Unknown input falls back to `Normal`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PoopQuality {
    Normal,
    Small,
    Soft,
    None,
}

impl PoopQuality {
    pub const ALL: [PoopQuality; 4] = [
        PoopQuality::Normal,
        PoopQuality::Small,
        PoopQuality::Soft,
        PoopQuality::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PoopQuality::Normal => "normal",
            PoopQuality::Small => "small",
            PoopQuality::Soft => "soft",
            PoopQuality::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|quality| quality.as_str().eq_ignore_ascii_case(value))
    }
}

/// Category of a scheduled care event. An event without a type is a plain
/// note on a day; invalid input becomes "no type" rather than a default.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Vet,
    Grooming,
    Litter,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Vet, EventType::Grooming, EventType::Litter];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Vet => "vet",
            EventType::Grooming => "grooming",
            EventType::Litter => "litter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

/// One day's recorded care metrics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treats: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veggies: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pellets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub litter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grooming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_roaming_mins: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poop_quality: Option<PoopQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A normalized log ready for insertion. Every field has a value; the store
/// assigns the id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLog {
    pub date: NaiveDate,
    pub treats: i64,
    pub veggies: i64,
    pub pellets: i64,
    pub hay: bool,
    pub water: bool,
    pub litter: bool,
    pub grooming: bool,
    pub mood: Mood,
    pub free_roaming_mins: i64,
    pub poop_quality: PoopQuality,
    pub notes: String,
}

/// Fields provided by a partial log update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogPatch {
    pub date: Option<NaiveDate>,
    pub treats: Option<i64>,
    pub veggies: Option<i64>,
    pub pellets: Option<i64>,
    pub hay: Option<bool>,
    pub water: Option<bool>,
    pub litter: Option<bool>,
    pub grooming: Option<bool>,
    pub mood: Option<Mood>,
    pub free_roaming_mins: Option<i64>,
    pub poop_quality: Option<PoopQuality>,
    pub notes: Option<String>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        *self == LogPatch::default()
    }

    /// Applies the provided fields onto `record`, leaving the rest untouched.
    pub fn apply(self, record: &mut LogRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(treats) = self.treats {
            record.treats = Some(treats);
        }
        if let Some(veggies) = self.veggies {
            record.veggies = Some(veggies);
        }
        if let Some(pellets) = self.pellets {
            record.pellets = Some(pellets);
        }
        if let Some(hay) = self.hay {
            record.hay = Some(hay);
        }
        if let Some(water) = self.water {
            record.water = Some(water);
        }
        if let Some(litter) = self.litter {
            record.litter = Some(litter);
        }
        if let Some(grooming) = self.grooming {
            record.grooming = Some(grooming);
        }
        if let Some(mood) = self.mood {
            record.mood = Some(mood);
        }
        if let Some(mins) = self.free_roaming_mins {
            record.free_roaming_mins = Some(mins);
        }
        if let Some(quality) = self.poop_quality {
            record.poop_quality = Some(quality);
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
    }
}

/// A scheduled care item (vet/grooming/litter) or a dated note.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareEvent {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    pub start: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A normalized event ready for insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub event_type: Option<EventType>,
    pub start: NaiveDate,
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub title: Option<String>,
    pub notes: String,
}

/// Fields provided by a partial event update. Outer `None` means "leave
/// unchanged"; for `end` and `title`, `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPatch {
    pub event_type: Option<EventType>,
    pub start: Option<NaiveDate>,
    pub end: Option<Option<DateTime<Utc>>>,
    pub all_day: Option<bool>,
    pub title: Option<Option<String>>,
    pub notes: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    pub fn apply(self, event: &mut CareEvent) {
        if let Some(kind) = self.event_type {
            event.event_type = Some(kind);
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(notes) = self.notes {
            event.notes = Some(notes);
        }
    }
}
