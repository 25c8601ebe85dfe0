use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a billing record
pub type BillingId = Uuid;

/// signed whole days from a due date to an as-of date, positive once past due
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayDifference(i64);

impl DayDifference {
    pub fn new(days: i64) -> Self {
        DayDifference(days)
    }

    pub fn between(as_of_date: NaiveDate, due_date: NaiveDate) -> Self {
        DayDifference((as_of_date - due_date).num_days())
    }

    pub fn days(&self) -> i64 {
        self.0
    }

    /// days before the due date, if the as-of date is early
    pub fn days_early(&self) -> Option<u64> {
        (self.0 < 0).then(|| self.0.unsigned_abs())
    }

    /// days past the grace period, never negative
    pub fn days_past(&self, grace_period_days: u32) -> u32 {
        let past_grace = self.0.saturating_sub(i64::from(grace_period_days));
        past_grace.clamp(0, i64::from(u32::MAX)) as u32
    }
}

/// billing record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    /// issued, due date not yet passed its grace period
    Pending,
    /// past due, interest and penalty apply
    Overdue,
    /// debt renegotiated into a new agreement
    Negotiated,
    /// fully paid
    Paid,
    /// voided
    Cancelled,
}

impl BillingStatus {
    /// paid and cancelled records no longer accept recalculated amounts
    pub fn is_closed(&self) -> bool {
        matches!(self, BillingStatus::Paid | BillingStatus::Cancelled)
    }
}
