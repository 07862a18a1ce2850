//! Dashboard summary statistics.
//!
//! [`summarize`] is a pure single pass over the fetched logs: consumption
//! totals, per-day averages, mood and poop-quality distributions, and
//! litter/grooming compliance. Metrics are clamped at write time, but the
//! pass still treats a missing value as zero/false so rows written outside
//! the normalized path cannot corrupt the sums. An empty range answers with
//! a message instead of a zeroed summary.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use bunny_care_store::{DateRange, LogRecord, Mood, PoopQuality};

use crate::domains::RangeQuery;
use crate::error::ApiError;
use crate::server::AppState;

pub const NO_LOGS_MESSAGE: &str = "No logs found in the specified date range";

/// GET /api/dashboard
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SummaryOutcome>, ApiError> {
    let range = DateRange::from_params(query.from.as_deref(), query.to.as_deref())?;
    let logs = state.store.list_logs(&range).await?;
    Ok(Json(summarize(&logs)))
}

/// Either a populated summary or the empty-range message; both are 200s.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SummaryOutcome {
    Empty {
        message: &'static str,
        summary: EmptySummary,
    },
    Ready {
        summary: Summary,
    },
}

/// Serializes as `{}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EmptySummary {}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub totals: Totals,
    pub averages: Averages,
    pub mood_distribution: BTreeMap<Mood, u64>,
    pub poop_quality_distribution: BTreeMap<PoopQuality, u64>,
    pub litter_days: DayTally,
    pub grooming_days: DayTally,
    pub average_free_roaming_mins: String,
    pub total_logs: u64,
}

/// Sums for the countable metrics; `hay`/`water` count the days the flag
/// was set rather than summing a quantity.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Totals {
    pub treats: i64,
    pub veggies: i64,
    pub pellets: i64,
    pub hay: u64,
    pub water: u64,
}

/// Per-day averages, rendered as fixed two-decimal strings.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Averages {
    pub treats: String,
    pub veggies: String,
    pub pellets: String,
    pub hay: String,
    pub water: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayTally {
    pub done: u64,
    pub total: u64,
}

pub fn summarize(records: &[LogRecord]) -> SummaryOutcome {
    if records.is_empty() {
        return SummaryOutcome::Empty {
            message: NO_LOGS_MESSAGE,
            summary: EmptySummary {},
        };
    }

    let mut totals = Totals {
        treats: 0,
        veggies: 0,
        pellets: 0,
        hay: 0,
        water: 0,
    };
    let mut mood_distribution: BTreeMap<Mood, u64> = BTreeMap::new();
    let mut poop_quality_distribution: BTreeMap<PoopQuality, u64> = BTreeMap::new();
    let mut litter_done: u64 = 0;
    let mut grooming_done: u64 = 0;
    let mut free_roaming_total: i64 = 0;

    for record in records {
        totals.treats += record.treats.unwrap_or(0);
        totals.veggies += record.veggies.unwrap_or(0);
        totals.pellets += record.pellets.unwrap_or(0);
        if record.hay.unwrap_or(false) {
            totals.hay += 1;
        }
        if record.water.unwrap_or(false) {
            totals.water += 1;
        }
        if record.litter.unwrap_or(false) {
            litter_done += 1;
        }
        if record.grooming.unwrap_or(false) {
            grooming_done += 1;
        }
        free_roaming_total += record.free_roaming_mins.unwrap_or(0);

        if let Some(mood) = record.mood {
            *mood_distribution.entry(mood).or_insert(0) += 1;
        }
        if let Some(quality) = record.poop_quality {
            *poop_quality_distribution.entry(quality).or_insert(0) += 1;
        }
    }

    let count = records.len() as u64;
    let len = records.len() as f64;

    let averages = Averages {
        treats: fixed2(totals.treats as f64 / len),
        veggies: fixed2(totals.veggies as f64 / len),
        pellets: fixed2(totals.pellets as f64 / len),
        hay: fixed2(totals.hay as f64 / len),
        water: fixed2(totals.water as f64 / len),
    };

    SummaryOutcome::Ready {
        summary: Summary {
            totals,
            averages,
            mood_distribution,
            poop_quality_distribution,
            litter_days: DayTally {
                done: litter_done,
                total: count,
            },
            grooming_days: DayTally {
                done: grooming_done,
                total: count,
            },
            average_free_roaming_mins: fixed2(free_roaming_total as f64 / len),
            total_logs: count,
        },
    }
}

/// Fixed two-decimal rendering with ties rounded away from zero. Every
/// average goes through here so the rounding rule stays in one place.
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn bare_record(id: &str) -> LogRecord {
        LogRecord {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            treats: None,
            veggies: None,
            pellets: None,
            hay: None,
            water: None,
            litter: None,
            grooming: None,
            mood: None,
            free_roaming_mins: None,
            poop_quality: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn record(id: &str, treats: i64, veggies: i64, hay: bool, mood: Mood, litter: bool) -> LogRecord {
        LogRecord {
            treats: Some(treats),
            veggies: Some(veggies),
            hay: Some(hay),
            mood: Some(mood),
            litter: Some(litter),
            ..bare_record(id)
        }
    }

    fn expect_summary(outcome: SummaryOutcome) -> Summary {
        match outcome {
            SummaryOutcome::Ready { summary } => summary,
            SummaryOutcome::Empty { .. } => panic!("expected a populated summary"),
        }
    }

    #[test]
    fn empty_input_answers_with_a_message_not_zeroes() {
        let outcome = summarize(&[]);
        assert_eq!(
            outcome,
            SummaryOutcome::Empty {
                message: NO_LOGS_MESSAGE,
                summary: EmptySummary {},
            }
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({
                "message": "No logs found in the specified date range",
                "summary": {},
            })
        );
    }

    #[test]
    fn two_record_scenario_matches_hand_computed_values() {
        let records = vec![
            record("a", 2, 5, true, Mood::Playful, true),
            record("b", 4, 3, false, Mood::Playful, false),
        ];

        let summary = expect_summary(summarize(&records));

        assert_eq!(summary.totals.treats, 6);
        assert_eq!(summary.totals.veggies, 8);
        assert_eq!(summary.totals.hay, 1);
        assert_eq!(summary.averages.treats, "3.00");
        assert_eq!(summary.mood_distribution.get(&Mood::Playful), Some(&2));
        assert_eq!(summary.mood_distribution.len(), 1);
        assert_eq!(summary.litter_days, DayTally { done: 1, total: 2 });
        assert_eq!(summary.grooming_days, DayTally { done: 0, total: 2 });
        assert_eq!(summary.total_logs, 2);
    }

    #[test]
    fn averages_are_fixed_two_decimal_strings() {
        let records = vec![
            record("a", 2, 0, false, Mood::Neutral, false),
            record("b", 4, 0, false, Mood::Neutral, false),
            record("c", 6, 1, true, Mood::Neutral, false),
        ];

        let summary = expect_summary(summarize(&records));

        assert_eq!(summary.totals.treats, 12);
        assert_eq!(summary.averages.treats, "4.00");
        // 1/3 rounds to 0.33, hay counts one day out of three
        assert_eq!(summary.averages.veggies, "0.33");
        assert_eq!(summary.averages.hay, "0.33");
    }

    #[test]
    fn missing_fields_count_as_zero_and_false() {
        let mut full = record("a", 3, 2, true, Mood::Zoomies, true);
        full.water = Some(true);
        full.grooming = Some(true);
        full.pellets = Some(4);
        full.free_roaming_mins = Some(90);
        full.poop_quality = Some(PoopQuality::Soft);

        let records = vec![full, bare_record("b")];
        let summary = expect_summary(summarize(&records));

        assert_eq!(summary.totals.treats, 3);
        assert_eq!(summary.totals.pellets, 4);
        assert_eq!(summary.totals.hay, 1);
        assert_eq!(summary.totals.water, 1);
        assert_eq!(summary.litter_days, DayTally { done: 1, total: 2 });
        assert_eq!(summary.grooming_days, DayTally { done: 1, total: 2 });
        assert_eq!(summary.average_free_roaming_mins, "45.00");
        assert_eq!(summary.total_logs, 2);
    }

    #[test]
    fn distributions_omit_values_that_never_occurred() {
        let mut a = record("a", 0, 0, false, Mood::Sleepy, false);
        a.poop_quality = Some(PoopQuality::Normal);
        let b = bare_record("b");
        let c = record("c", 0, 0, false, Mood::Sleepy, false);

        let summary = expect_summary(summarize(&[a, b, c]));

        assert_eq!(summary.mood_distribution.get(&Mood::Sleepy), Some(&2));
        assert!(!summary.mood_distribution.contains_key(&Mood::Playful));
        let mood_total: u64 = summary.mood_distribution.values().sum();
        assert_eq!(mood_total, 2);

        assert_eq!(
            summary.poop_quality_distribution.get(&PoopQuality::Normal),
            Some(&1)
        );
        assert_eq!(summary.poop_quality_distribution.len(), 1);
    }

    #[test]
    fn summarize_is_idempotent() {
        let records = vec![
            record("a", 1, 2, true, Mood::Sad, false),
            record("b", 3, 4, false, Mood::Playful, true),
        ];
        assert_eq!(summarize(&records), summarize(&records));
    }

    #[test]
    fn summary_serializes_with_the_wire_field_names() {
        let mut a = record("a", 2, 5, true, Mood::Playful, true);
        a.water = Some(true);
        a.free_roaming_mins = Some(30);
        a.poop_quality = Some(PoopQuality::Normal);

        let value = serde_json::to_value(summarize(&[a])).unwrap();
        let summary = &value["summary"];

        assert_eq!(summary["totals"]["treats"], 2);
        assert_eq!(summary["totals"]["hay"], 1);
        assert_eq!(summary["averages"]["treats"], "2.00");
        assert_eq!(summary["moodDistribution"]["playful"], 1);
        assert_eq!(summary["poopQualityDistribution"]["normal"], 1);
        assert_eq!(summary["litterDays"]["done"], 1);
        assert_eq!(summary["groomingDays"]["total"], 1);
        assert_eq!(summary["averageFreeRoamingMins"], "30.00");
        assert_eq!(summary["totalLogs"], 1);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn fixed2_rounds_ties_away_from_zero() {
        assert_eq!(fixed2(3.0), "3.00");
        assert_eq!(fixed2(1.0 / 3.0), "0.33");
        assert_eq!(fixed2(2.0 / 3.0), "0.67");
        assert_eq!(fixed2(0.125), "0.13");
        assert_eq!(fixed2(0.375), "0.38");
        assert_eq!(fixed2(-0.125), "-0.13");
        assert_eq!(fixed2(0.0), "0.00");
    }
}
