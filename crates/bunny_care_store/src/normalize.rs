//! Write-side normalization.
//!
//! Inbound payloads are untyped JSON; everything is coerced into the strict
//! record types here, before the store ever sees it. Numeric fields clamp
//! into their domain (missing/invalid input maps to the minimum), booleans
//! coerce by truthiness, enums are matched case-insensitively against their
//! allow-list with a documented fallback, and calendar-day fields drop any
//! time-of-day component so range queries stay well-defined.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::model::{EventPatch, EventType, LogPatch, Mood, NewEvent, NewLog, PoopQuality};

pub const TREATS_MAX: i64 = 8;
pub const VEGGIES_MAX: i64 = 10;
pub const PELLETS_MAX: i64 = 10;
pub const FREE_ROAMING_MINS_MAX: i64 = 1440;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Expected a JSON object body")]
    NotAnObject,
    #[error("Start date is required")]
    MissingStart,
    /// The field was present but not a calendar date or RFC 3339 datetime.
    #[error("Invalid date in field '{0}'")]
    InvalidDate(&'static str),
}

/// Builds a strict [`NewLog`] from an untyped body. A missing date defaults
/// to today (UTC); a present but unparseable date is rejected. Everything
/// else coerces rather than fails.
pub fn normalize_log(body: &Value) -> Result<NewLog, NormalizeError> {
    let body = body.as_object().ok_or(NormalizeError::NotAnObject)?;

    let date = match body.get("date") {
        None | Some(Value::Null) => Utc::now().date_naive(),
        Some(value) => day_from_value(value, "date")?,
    };

    Ok(NewLog {
        date,
        treats: clamp_count(body.get("treats"), 0, TREATS_MAX),
        veggies: clamp_count(body.get("veggies"), 0, VEGGIES_MAX),
        pellets: clamp_count(body.get("pellets"), 0, PELLETS_MAX),
        hay: truthy(body.get("hay")),
        water: truthy(body.get("water")),
        litter: truthy(body.get("litter")),
        grooming: truthy(body.get("grooming")),
        mood: parse_mood(body.get("mood")),
        free_roaming_mins: clamp_count(body.get("freeRoamingMins"), 0, FREE_ROAMING_MINS_MAX),
        poop_quality: parse_poop_quality(body.get("poopQuality")),
        notes: string_or_empty(body.get("notes")),
    })
}

/// Builds a [`LogPatch`] carrying only the provided fields, each coerced with
/// the same rules as a create. Null fields count as "not provided".
pub fn normalize_log_patch(body: &Value) -> Result<LogPatch, NormalizeError> {
    let body = body.as_object().ok_or(NormalizeError::NotAnObject)?;
    let given = |name: &str| body.get(name).filter(|value| !value.is_null());

    let mut patch = LogPatch::default();
    if let Some(value) = given("date") {
        patch.date = Some(day_from_value(value, "date")?);
    }
    if let Some(value) = given("treats") {
        patch.treats = Some(clamp_count(Some(value), 0, TREATS_MAX));
    }
    if let Some(value) = given("veggies") {
        patch.veggies = Some(clamp_count(Some(value), 0, VEGGIES_MAX));
    }
    if let Some(value) = given("pellets") {
        patch.pellets = Some(clamp_count(Some(value), 0, PELLETS_MAX));
    }
    if let Some(value) = given("hay") {
        patch.hay = Some(truthy(Some(value)));
    }
    if let Some(value) = given("water") {
        patch.water = Some(truthy(Some(value)));
    }
    if let Some(value) = given("litter") {
        patch.litter = Some(truthy(Some(value)));
    }
    if let Some(value) = given("grooming") {
        patch.grooming = Some(truthy(Some(value)));
    }
    if let Some(value) = given("mood") {
        patch.mood = Some(parse_mood(Some(value)));
    }
    if let Some(value) = given("freeRoamingMins") {
        patch.free_roaming_mins = Some(clamp_count(Some(value), 0, FREE_ROAMING_MINS_MAX));
    }
    if let Some(value) = given("poopQuality") {
        patch.poop_quality = Some(parse_poop_quality(Some(value)));
    }
    if let Some(value) = given("notes") {
        patch.notes = Some(string_or_empty(Some(value)));
    }
    Ok(patch)
}

/// Builds a strict [`NewEvent`]. `start` is required; an unknown `type`
/// becomes "no type" (a note-only event), never a default.
pub fn normalize_event(body: &Value) -> Result<NewEvent, NormalizeError> {
    let body = body.as_object().ok_or(NormalizeError::NotAnObject)?;

    let start = match body.get("start") {
        Some(value) if truthy(Some(value)) => day_from_value(value, "start")?,
        _ => return Err(NormalizeError::MissingStart),
    };
    let end = match body.get("end") {
        None | Some(Value::Null) => None,
        Some(value) => Some(instant_from_value(value, "end")?),
    };

    Ok(NewEvent {
        event_type: parse_event_type(body.get("type")),
        start,
        end,
        all_day: truthy(body.get("allDay")),
        title: body.get("title").and_then(Value::as_str).map(str::to_owned),
        notes: string_or_empty(body.get("notes")),
    })
}

/// Builds an [`EventPatch`]. A provided-but-invalid `type` is dropped from
/// the patch (the stored value stays); explicit null clears `end` and
/// `title`; non-string `notes` overwrite with "".
pub fn normalize_event_patch(body: &Value) -> Result<EventPatch, NormalizeError> {
    let body = body.as_object().ok_or(NormalizeError::NotAnObject)?;

    let mut patch = EventPatch::default();
    if let Some(value) = body.get("type") {
        patch.event_type = parse_event_type(Some(value));
    }
    if let Some(value) = body.get("start").filter(|value| !value.is_null()) {
        patch.start = Some(day_from_value(value, "start")?);
    }
    match body.get("end") {
        None => {}
        Some(Value::Null) => patch.end = Some(None),
        Some(value) => patch.end = Some(Some(instant_from_value(value, "end")?)),
    }
    if let Some(value) = body.get("allDay") {
        patch.all_day = Some(truthy(Some(value)));
    }
    match body.get("title") {
        Some(Value::Null) => patch.title = Some(None),
        Some(Value::String(title)) => patch.title = Some(Some(title.clone())),
        _ => {}
    }
    if let Some(value) = body.get("notes") {
        patch.notes = Some(string_or_empty(Some(value)));
    }
    Ok(patch)
}

/// Clamps a count-like value into `[min, max]`. Missing, null, empty, and
/// non-numeric input maps to `min`; numeric strings are accepted; fractional
/// values truncate toward zero.
fn clamp_count(value: Option<&Value>, min: i64, max: i64) -> i64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number.filter(|n| n.is_finite()) {
        Some(n) => n.max(min as f64).min(max as f64) as i64,
        None => min,
    }
}

/// JavaScript-style truthiness: null/false/0/"" are false, everything else
/// (including arrays and objects) is true. Missing counts as false.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn parse_mood(value: Option<&Value>) -> Mood {
    value
        .and_then(Value::as_str)
        .and_then(Mood::parse)
        .unwrap_or(Mood::Neutral)
}

fn parse_poop_quality(value: Option<&Value>) -> PoopQuality {
    value
        .and_then(Value::as_str)
        .and_then(PoopQuality::parse)
        .unwrap_or(PoopQuality::Normal)
}

fn parse_event_type(value: Option<&Value>) -> Option<EventType> {
    value.and_then(Value::as_str).and_then(EventType::parse)
}

fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn day_from_value(value: &Value, field: &'static str) -> Result<NaiveDate, NormalizeError> {
    value
        .as_str()
        .and_then(parse_day)
        .ok_or(NormalizeError::InvalidDate(field))
}

fn instant_from_value(value: &Value, field: &'static str) -> Result<DateTime<Utc>, NormalizeError> {
    value
        .as_str()
        .and_then(parse_instant)
        .ok_or(NormalizeError::InvalidDate(field))
}

/// Parses `YYYY-MM-DD`, an RFC 3339 datetime, or a naive datetime down to
/// its calendar day.
pub(crate) fn parse_day(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    None
}

/// Parses an event end: a full datetime keeps its time-of-day, a bare date
/// means midnight UTC.
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    None
}
