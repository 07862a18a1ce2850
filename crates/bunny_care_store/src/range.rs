//! Inclusive calendar-day range filtering for listing and summary queries.

use chrono::NaiveDate;
use thiserror::Error;

use crate::normalize::parse_day;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("Invalid date format for '{0}'")]
    InvalidBound(&'static str),
}

/// Inclusive `[from, to]` filter over calendar days. Either bound may be
/// absent; with neither bound, everything matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub const ALL: DateRange = DateRange {
        from: None,
        to: None,
    };

    /// Parses optional query values. Accepts `YYYY-MM-DD` or a datetime whose
    /// date part is used; empty strings count as absent. Present but
    /// unparseable bounds are rejected rather than silently matching nothing.
    pub fn from_params(from: Option<&str>, to: Option<&str>) -> Result<Self, RangeParseError> {
        Ok(DateRange {
            from: parse_bound(from, "from")?,
            to: parse_bound(to, "to")?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_bound(
    value: Option<&str>,
    name: &'static str,
) -> Result<Option<NaiveDate>, RangeParseError> {
    match value {
        None => Ok(None),
        Some("") => Ok(None),
        Some(s) => parse_day(s)
            .map(Some)
            .ok_or(RangeParseError::InvalidBound(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let range = DateRange::from_params(Some("2025-05-10"), None).unwrap();
        assert!(!range.contains(day("2025-05-09")));
        assert!(range.contains(day("2025-05-10")));
        assert!(range.contains(day("2025-05-11")));
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let range = DateRange::from_params(None, Some("2025-05-10")).unwrap();
        assert!(range.contains(day("2025-05-10")));
        assert!(!range.contains(day("2025-05-11")));
    }

    #[test]
    fn unbounded_range_matches_everything() {
        let range = DateRange::from_params(None, None).unwrap();
        assert!(range.is_unbounded());
        assert!(range.contains(day("1999-01-01")));
    }

    #[test]
    fn empty_string_bounds_count_as_absent() {
        let range = DateRange::from_params(Some(""), Some("")).unwrap();
        assert!(range.is_unbounded());
    }

    #[test]
    fn datetime_bounds_use_the_date_part() {
        let range = DateRange::from_params(Some("2025-05-10T22:00:00Z"), None).unwrap();
        assert_eq!(range.from, Some(day("2025-05-10")));
    }

    #[test]
    fn garbage_bounds_are_rejected() {
        assert_eq!(
            DateRange::from_params(Some("not-a-date"), None).unwrap_err(),
            RangeParseError::InvalidBound("from")
        );
        assert_eq!(
            DateRange::from_params(None, Some("05/10/2025")).unwrap_err(),
            RangeParseError::InvalidBound("to")
        );
    }
}
