use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adjustment::{AdjustmentEngine, CalculationResult};
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{BillingId, BillingStatus};

/// the fields of a calculation a caller writes back to a billing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecordUpdate {
    pub current_amount: Money,
    pub days_overdue: u32,
    pub interest_amount: Money,
    pub penalty_amount: Money,
    pub discount_amount: Money,
}

impl CalculationResult {
    pub fn to_record_update(&self) -> BillingRecordUpdate {
        BillingRecordUpdate {
            current_amount: self.final_amount_with_discount,
            days_overdue: self.days_overdue,
            interest_amount: self.interest_amount,
            penalty_amount: self.penalty_amount,
            discount_amount: self.discount_amount,
        }
    }
}

/// billing record (cobrança) owed by a franchise unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: BillingId,
    pub franchise_unit_id: String,
    pub description: String,

    pub original_amount: Money,
    pub current_amount: Money,
    pub interest_amount: Money,
    pub penalty_amount: Money,
    pub discount_amount: Money,

    pub due_date: NaiveDate,
    pub days_overdue: u32,

    pub status: BillingStatus,
    pub created_at: DateTime<Utc>,
    pub last_recalculated: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid_amount: Option<Money>,
}

impl BillingRecord {
    /// create new pending billing record
    pub fn new(
        franchise_unit_id: impl Into<String>,
        description: impl Into<String>,
        original_amount: Money,
        due_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if !original_amount.is_positive() {
            return Err(BillingError::InvalidAmount { amount: original_amount });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            franchise_unit_id: franchise_unit_id.into(),
            description: description.into(),
            original_amount,
            current_amount: original_amount,
            interest_amount: Money::ZERO,
            penalty_amount: Money::ZERO,
            discount_amount: Money::ZERO,
            due_date,
            days_overdue: 0,
            status: BillingStatus::Pending,
            created_at,
            last_recalculated: None,
            paid_at: None,
            paid_amount: None,
        })
    }

    /// recompute charges as of `as_of`; the record itself is left untouched
    pub fn recalculate(
        &self,
        engine: &AdjustmentEngine,
        as_of: DateTime<Utc>,
    ) -> Result<BillingRecordUpdate> {
        if self.status.is_closed() {
            return Err(BillingError::InvalidStatusTransition { status: self.status });
        }
        engine
            .calculate_at(self.original_amount, self.due_date, as_of)
            .map(|result| result.to_record_update())
    }

    /// write a recalculation back onto the record
    pub fn apply_update(&mut self, update: &BillingRecordUpdate, timestamp: DateTime<Utc>) -> Result<()> {
        if self.status.is_closed() {
            return Err(BillingError::InvalidStatusTransition { status: self.status });
        }

        self.current_amount = update.current_amount;
        self.days_overdue = update.days_overdue;
        self.interest_amount = update.interest_amount;
        self.penalty_amount = update.penalty_amount;
        self.discount_amount = update.discount_amount;
        self.last_recalculated = Some(timestamp);

        if update.days_overdue > 0 && self.status == BillingStatus::Pending {
            self.status = BillingStatus::Overdue;
        }
        Ok(())
    }

    /// recalculate and apply in one step
    pub fn refresh(&mut self, engine: &AdjustmentEngine, as_of: DateTime<Utc>) -> Result<()> {
        let update = self.recalculate(engine, as_of)?;
        self.apply_update(&update, as_of)
    }

    /// move into a renegotiated agreement
    pub fn mark_negotiated(&mut self) -> Result<()> {
        if self.status.is_closed() {
            return Err(BillingError::InvalidStatusTransition { status: self.status });
        }
        self.status = BillingStatus::Negotiated;
        Ok(())
    }

    /// settle the record
    pub fn mark_paid(&mut self, amount: Money, timestamp: DateTime<Utc>) -> Result<()> {
        if self.status.is_closed() {
            return Err(BillingError::InvalidStatusTransition { status: self.status });
        }
        if !amount.is_positive() {
            return Err(BillingError::InvalidAmount { amount });
        }
        self.status = BillingStatus::Paid;
        self.paid_amount = Some(amount);
        self.paid_at = Some(timestamp);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        if self.status == BillingStatus::Paid {
            return Err(BillingError::InvalidStatusTransition { status: self.status });
        }
        self.status = BillingStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfiguration;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn engine() -> AdjustmentEngine {
        let config = BillingConfiguration::new(dec!(0.001), dec!(2), dec!(10), 0)
            .unwrap()
            .with_early_payment_discount(dec!(5), 5);
        AdjustmentEngine::new(config).unwrap()
    }

    fn record() -> BillingRecord {
        BillingRecord::new(
            "unit-042",
            "royalties june",
            Money::from_major(1_000),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = record();
        assert_eq!(record.status, BillingStatus::Pending);
        assert_eq!(record.current_amount, record.original_amount);
        assert!(record.last_recalculated.is_none());
    }

    #[test]
    fn test_new_record_rejects_zero_amount() {
        let result = BillingRecord::new(
            "unit-042",
            "royalties",
            Money::ZERO,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            Utc::now(),
        );
        assert!(matches!(result, Err(BillingError::InvalidAmount { .. })));
    }

    #[test]
    fn test_refresh_marks_overdue() {
        let mut record = record();
        let as_of = Utc.with_ymd_and_hms(2024, 6, 20, 8, 0, 0).unwrap();

        record.refresh(&engine(), as_of).unwrap();

        assert_eq!(record.status, BillingStatus::Overdue);
        assert_eq!(record.days_overdue, 10);
        assert_eq!(record.interest_amount, Money::from_major(10));
        assert_eq!(record.penalty_amount, Money::from_major(20));
        assert_eq!(record.current_amount, Money::from_major(1_030));
        assert_eq!(record.original_amount, Money::from_major(1_000));
        assert_eq!(record.last_recalculated, Some(as_of));
    }

    #[test]
    fn test_refresh_before_due_applies_discount() {
        let mut record = record();
        let as_of = Utc.with_ymd_and_hms(2024, 6, 7, 8, 0, 0).unwrap();

        record.refresh(&engine(), as_of).unwrap();

        assert_eq!(record.status, BillingStatus::Pending);
        assert_eq!(record.discount_amount, Money::from_major(50));
        assert_eq!(record.current_amount, Money::from_major(950));
    }

    #[test]
    fn test_recalculate_does_not_mutate() {
        let record = record();
        let as_of = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap() + Duration::days(30);
        let update = record.recalculate(&engine(), as_of).unwrap();

        assert_eq!(update.days_overdue, 30);
        assert_eq!(record.days_overdue, 0);
        assert_eq!(record.current_amount, Money::from_major(1_000));
    }

    #[test]
    fn test_negotiated_record_stays_negotiated() {
        let mut record = record();
        record.mark_negotiated().unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 7, 10, 0, 0, 0).unwrap();

        record.refresh(&engine(), as_of).unwrap();
        assert_eq!(record.status, BillingStatus::Negotiated);
        assert_eq!(record.days_overdue, 30);
    }

    #[test]
    fn test_closed_record_rejects_updates() {
        let mut record = record();
        let paid_at = Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap();
        record.mark_paid(Money::from_major(950), paid_at).unwrap();

        assert_eq!(record.paid_amount, Some(Money::from_major(950)));
        assert_eq!(
            record.refresh(&engine(), paid_at),
            Err(BillingError::InvalidStatusTransition { status: BillingStatus::Paid })
        );
        assert!(record.cancel().is_err());
        assert!(record.mark_negotiated().is_err());
    }

    #[test]
    fn test_cancelled_record_rejects_payment() {
        let mut record = record();
        record.cancel().unwrap();
        assert!(record.mark_paid(Money::from_major(1_000), Utc::now()).is_err());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = record();
        let json = serde_json::to_string(&record).unwrap();
        let back: BillingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
