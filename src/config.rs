use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::decimal::Rate;
use crate::errors::{BillingError, Result};

/// billing configuration, the single settings row administrators edit
///
/// Units follow the settings screen: `daily_interest_rate` is a fraction per
/// day, every other rate is a percentage of the original amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingConfiguration {
    /// fraction accrued per overdue day (0.0033 is ~0.33%/day)
    pub daily_interest_rate: Decimal,
    /// one-time late fee, percent of the original amount
    pub late_penalty_rate: Decimal,
    /// ceiling on accumulated interest, percent of the original amount
    pub max_accumulated_interest_rate: Decimal,
    /// days after the due date before interest and penalty start
    #[serde(default)]
    pub grace_period_days: u32,
    /// discount percent for paying before the due date
    #[serde(default)]
    pub early_payment_discount_rate: Option<Decimal>,
    /// widest window, in days before the due date, where the discount applies
    #[serde(default)]
    pub early_payment_discount_days: Option<u32>,
}

impl Default for BillingConfiguration {
    fn default() -> Self {
        Self::standard()
    }
}

impl BillingConfiguration {
    pub fn new(
        daily_interest_rate: Decimal,
        late_penalty_rate: Decimal,
        max_accumulated_interest_rate: Decimal,
        grace_period_days: u32,
    ) -> Result<Self> {
        let config = Self {
            daily_interest_rate,
            late_penalty_rate,
            max_accumulated_interest_rate,
            grace_period_days,
            early_payment_discount_rate: None,
            early_payment_discount_days: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// 2% late fee, 1% a month interest (0.033%/day) capped at 20%, no grace, no discount
    pub fn standard() -> Self {
        Self {
            daily_interest_rate: dec!(0.00033),
            late_penalty_rate: dec!(2),
            max_accumulated_interest_rate: dec!(20),
            grace_period_days: 0,
            early_payment_discount_rate: None,
            early_payment_discount_days: None,
        }
    }

    /// add an early-payment discount of `rate` percent valid up to `days` before due
    pub fn with_early_payment_discount(mut self, rate: Decimal, days: u32) -> Self {
        self.early_payment_discount_rate = Some(rate);
        self.early_payment_discount_days = Some(days);
        self
    }

    pub fn with_grace_period(mut self, days: u32) -> Self {
        self.grace_period_days = days;
        self
    }

    /// reject negative rates
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("daily_interest_rate", Some(self.daily_interest_rate)),
            ("late_penalty_rate", Some(self.late_penalty_rate)),
            ("max_accumulated_interest_rate", Some(self.max_accumulated_interest_rate)),
            ("early_payment_discount_rate", self.early_payment_discount_rate),
        ];

        for (field, rate) in rates {
            match rate {
                Some(rate) if rate < Decimal::ZERO => {
                    return Err(BillingError::InvalidRate { field, rate });
                }
                _ => {}
            }
        }

        if let Some(rate) = self.early_payment_discount_rate {
            if rate > Decimal::ONE_HUNDRED {
                return Err(BillingError::InvalidConfiguration {
                    message: format!("early_payment_discount_rate {} exceeds 100%", rate),
                });
            }
        }

        Ok(())
    }

    pub fn daily_rate(&self) -> Rate {
        Rate::from_decimal(self.daily_interest_rate)
    }

    pub fn penalty_rate(&self) -> Rate {
        Rate::from_percentage(self.late_penalty_rate)
    }

    pub fn interest_cap_rate(&self) -> Rate {
        Rate::from_percentage(self.max_accumulated_interest_rate)
    }

    /// discount rate and window, only when both are configured
    pub fn early_payment_discount(&self) -> Option<(Rate, u32)> {
        match (self.early_payment_discount_rate, self.early_payment_discount_days) {
            (Some(rate), Some(days)) => Some((Rate::from_percentage(rate), days)),
            _ => None,
        }
    }

    /// build from a settings row as returned by the data store
    ///
    /// Numeric columns may come back as json numbers or as decimal strings;
    /// both are accepted. Missing or null discount fields mean no discount.
    pub fn from_settings_row(row: &Value) -> Result<Self> {
        let config = Self {
            daily_interest_rate: required_decimal(row, "daily_interest_rate")?,
            late_penalty_rate: required_decimal(row, "late_penalty_rate")?,
            max_accumulated_interest_rate: required_decimal(row, "max_accumulated_interest_rate")?,
            grace_period_days: optional_days(row, "grace_period_days")?.unwrap_or(0),
            early_payment_discount_rate: optional_decimal(row, "early_payment_discount_rate")?,
            early_payment_discount_days: optional_days(row, "early_payment_discount_days")?,
        };

        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "rejected billing settings row");
            return Err(err);
        }
        Ok(config)
    }

    /// parse a toml document with the same field names
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BillingError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn optional_decimal(row: &Value, field: &str) -> Result<Option<Decimal>> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => parse_decimal(&n.to_string(), field).map(Some),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_decimal(s, field).map(Some),
        Some(other) => Err(BillingError::InvalidConfiguration {
            message: format!("{} must be numeric, got {}", field, other),
        }),
    }
}

fn required_decimal(row: &Value, field: &str) -> Result<Decimal> {
    optional_decimal(row, field)?.ok_or_else(|| BillingError::InvalidConfiguration {
        message: format!("missing {}", field),
    })
}

fn optional_days(row: &Value, field: &str) -> Result<Option<u32>> {
    let Some(value) = optional_decimal(row, field)? else {
        return Ok(None);
    };
    if value.fract() != Decimal::ZERO || value < Decimal::ZERO {
        return Err(BillingError::InvalidConfiguration {
            message: format!("{} must be a non-negative whole number of days, got {}", field, value),
        });
    }
    value.to_u32().map(Some).ok_or_else(|| BillingError::InvalidConfiguration {
        message: format!("{} out of range: {}", field, value),
    })
}

fn parse_decimal(s: &str, field: &str) -> Result<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| BillingError::InvalidConfiguration {
            message: format!("{} is not a decimal ({}): {}", field, s, e),
        })
}
