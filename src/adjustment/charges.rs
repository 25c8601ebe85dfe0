use crate::config::BillingConfiguration;
use crate::decimal::Money;
use crate::errors::Result;

/// late charges for one overdue amount, unrounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueCharges {
    pub penalty_amount: Money,
    pub interest_amount: Money,
    /// daily accrual before the cap
    pub uncapped_interest_amount: Money,
    pub interest_capped: bool,
}

impl OverdueCharges {
    pub const NONE: OverdueCharges = OverdueCharges {
        penalty_amount: Money::ZERO,
        interest_amount: Money::ZERO,
        uncapped_interest_amount: Money::ZERO,
        interest_capped: false,
    };
}

/// one-time late fee, charged as soon as a single day is overdue
pub fn late_penalty(
    original_amount: Money,
    days_overdue: u32,
    config: &BillingConfiguration,
) -> Result<Money> {
    if days_overdue == 0 {
        return Ok(Money::ZERO);
    }
    original_amount.apply_rate(config.penalty_rate())
}

/// largest interest the original amount can accumulate
pub fn interest_cap(original_amount: Money, config: &BillingConfiguration) -> Result<Money> {
    original_amount.apply_rate(config.interest_cap_rate())
}

/// penalty plus daily interest capped at a share of the original amount
pub fn overdue_charges(
    original_amount: Money,
    days_overdue: u32,
    config: &BillingConfiguration,
) -> Result<OverdueCharges> {
    if days_overdue == 0 {
        return Ok(OverdueCharges::NONE);
    }

    let uncapped = original_amount.apply_daily_rate(config.daily_rate(), days_overdue)?;
    let cap = interest_cap(original_amount, config)?;

    Ok(OverdueCharges {
        penalty_amount: late_penalty(original_amount, days_overdue, config)?,
        interest_amount: uncapped.min(cap),
        uncapped_interest_amount: uncapped,
        interest_capped: uncapped > cap,
    })
}
