use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{BillingError, Result};
use crate::types::DayDifference;

/// calendar date of a timestamp, time-of-day dropped
pub fn normalize_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// signed whole days from `due_date` to `as_of_date`, positive once past due
pub fn days_between(as_of_date: NaiveDate, due_date: NaiveDate) -> DayDifference {
    DayDifference::between(as_of_date, due_date)
}

/// days past the grace period, never negative
pub fn days_overdue(raw_day_difference: DayDifference, grace_period_days: u32) -> u32 {
    raw_day_difference.days_past(grace_period_days)
}

/// parse a date as the store hands it out
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp; a timestamp is
/// reduced to its UTC calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|ts| normalize_date(ts.with_timezone(&Utc)))
        .map_err(|e| BillingError::InvalidDate {
            message: format!("cannot parse {:?}: {}", s, e),
        })
}
