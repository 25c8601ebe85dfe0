use crate::config::BillingConfiguration;
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::DayDifference;

/// early-payment discount, if the as-of date falls inside the configured window
///
/// Only a strictly negative day difference qualifies; paying on the due date
/// itself earns nothing.
pub fn early_payment_discount(
    original_amount: Money,
    raw_day_difference: DayDifference,
    config: &BillingConfiguration,
) -> Result<Option<Money>> {
    let Some(days_early) = raw_day_difference.days_early() else {
        return Ok(None);
    };
    let Some((rate, window_days)) = config.early_payment_discount() else {
        return Ok(None);
    };
    if days_early > u64::from(window_days) {
        return Ok(None);
    }
    original_amount.apply_rate(rate).map(Some)
}
