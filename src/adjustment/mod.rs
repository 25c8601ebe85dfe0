pub mod charges;
pub mod days;
pub mod discount;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::config::BillingConfiguration;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::DayDifference;

pub use charges::{interest_cap, late_penalty, overdue_charges, OverdueCharges};
pub use days::{days_between, days_overdue, normalize_date, parse_date};
pub use discount::early_payment_discount;

/// inputs for one adjustment calculation
#[derive(Debug, Clone, Copy)]
pub struct CalculationInput<'a> {
    pub original_amount: Money,
    pub due_date: NaiveDate,
    pub as_of_date: NaiveDate,
    pub configuration: &'a BillingConfiguration,
}

impl<'a> CalculationInput<'a> {
    pub fn new(
        original_amount: Money,
        due_date: NaiveDate,
        as_of_date: NaiveDate,
        configuration: &'a BillingConfiguration,
    ) -> Self {
        Self {
            original_amount,
            due_date,
            as_of_date,
            configuration,
        }
    }

    /// as-of date taken from the provider's current day
    pub fn as_of_now(
        original_amount: Money,
        due_date: NaiveDate,
        configuration: &'a BillingConfiguration,
        time_provider: &SafeTimeProvider,
    ) -> Self {
        Self::new(
            original_amount,
            due_date,
            normalize_date(time_provider.now()),
            configuration,
        )
    }

    /// build from timestamps; both are reduced to their calendar date
    pub fn from_timestamps(
        original_amount: Money,
        due: DateTime<Utc>,
        as_of: DateTime<Utc>,
        configuration: &'a BillingConfiguration,
    ) -> Self {
        Self::new(original_amount, normalize_date(due), normalize_date(as_of), configuration)
    }

    /// build from the textual dates the store returns
    pub fn parse(
        original_amount: Money,
        due_date: &str,
        as_of_date: &str,
        configuration: &'a BillingConfiguration,
    ) -> Result<Self> {
        Ok(Self::new(
            original_amount,
            parse_date(due_date)?,
            parse_date(as_of_date)?,
            configuration,
        ))
    }
}

/// outcome of one adjustment calculation, monetary fields rounded to cents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// signed days from due date to as-of date
    pub raw_day_difference: DayDifference,
    pub days_overdue: u32,
    pub interest_amount: Money,
    /// interest before the cap was applied
    pub uncapped_interest_amount: Money,
    pub interest_capped: bool,
    pub penalty_amount: Money,
    /// original + interest + penalty
    pub total_amount: Money,
    pub discount_applied: bool,
    pub discount_amount: Money,
    /// discounted original when a discount applies, otherwise the total
    pub final_amount_with_discount: Money,
}

/// compute overdue interest, late penalty and early-payment discount
///
/// Pure: the same input and configuration always give the same result.
/// Fails only on invalid input: a non-positive amount, a negative rate, or an
/// amount and rate combination too large to represent.
pub fn calculate_adjustment(input: &CalculationInput<'_>) -> Result<CalculationResult> {
    let original = input.original_amount;
    if !original.is_positive() {
        return Err(BillingError::InvalidAmount { amount: original });
    }
    let config = input.configuration;
    config.validate()?;

    let raw_day_difference = days_between(input.as_of_date, input.due_date);

    let discount = early_payment_discount(original, raw_day_difference, config)?;
    let days_overdue = days_overdue(raw_day_difference, config.grace_period_days);
    let charges = overdue_charges(original, days_overdue, config)?;

    let interest_amount = charges.interest_amount.round_currency();
    let penalty_amount = charges.penalty_amount.round_currency();
    let total_amount = original
        .checked_add(interest_amount)?
        .checked_add(penalty_amount)?
        .round_currency();

    let discount_amount = discount.map(|d| d.round_currency()).unwrap_or(Money::ZERO);
    let final_amount_with_discount = match discount {
        Some(_) => (original - discount_amount).round_currency(),
        None => total_amount,
    };

    let result = CalculationResult {
        raw_day_difference,
        days_overdue,
        interest_amount,
        uncapped_interest_amount: charges.uncapped_interest_amount.round_currency(),
        interest_capped: charges.interest_capped,
        penalty_amount,
        total_amount,
        discount_applied: discount.is_some(),
        discount_amount,
        final_amount_with_discount,
    };

    tracing::debug!(
        original_amount = %original,
        due_date = %input.due_date,
        as_of_date = %input.as_of_date,
        days_overdue = result.days_overdue,
        interest = %result.interest_amount,
        penalty = %result.penalty_amount,
        discount_applied = result.discount_applied,
        final_amount = %result.final_amount_with_discount,
        "billing adjustment calculated"
    );

    Ok(result)
}

/// calculator bound to one billing configuration
#[derive(Debug, Clone)]
pub struct AdjustmentEngine {
    config: BillingConfiguration,
}

impl AdjustmentEngine {
    /// validates the configuration once up front
    pub fn new(config: BillingConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BillingConfiguration {
        &self.config
    }

    /// calculate for explicit calendar dates
    pub fn calculate(
        &self,
        original_amount: Money,
        due_date: NaiveDate,
        as_of_date: NaiveDate,
    ) -> Result<CalculationResult> {
        calculate_adjustment(&CalculationInput::new(
            original_amount,
            due_date,
            as_of_date,
            &self.config,
        ))
    }

    /// calculate as of a timestamp, time-of-day ignored
    pub fn calculate_at(
        &self,
        original_amount: Money,
        due_date: NaiveDate,
        as_of: DateTime<Utc>,
    ) -> Result<CalculationResult> {
        self.calculate(original_amount, due_date, normalize_date(as_of))
    }

    /// calculate as of the provider's current day
    pub fn calculate_as_of_now(
        &self,
        original_amount: Money,
        due_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<CalculationResult> {
        calculate_adjustment(&CalculationInput::as_of_now(
            original_amount,
            due_date,
            &self.config,
            time_provider,
        ))
    }
}
