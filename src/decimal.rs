use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::errors::{BillingError, Result};

/// decimal places of a reported currency value
pub const CURRENCY_DP: u32 = 2;

/// Money type backed by an exact decimal.
///
/// Arithmetic keeps full precision; rounding to cents happens once, through
/// [`Money::round_currency`], when a value is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> std::result::Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?))
    }

    /// create from integer amount (reais, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (centavos, cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, CURRENCY_DP))
    }

    /// create from a float coming off a json payload, rejecting NaN and infinities
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(BillingError::NonFiniteAmount { value });
        }
        Decimal::from_f64(value)
            .map(Money)
            .ok_or(BillingError::NonFiniteAmount { value })
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round half-up (away from zero) to whole cents
    pub fn round_currency(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// sum that reports overflow instead of panicking
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(BillingError::ArithmeticOverflow { operation: "add" })
    }

    /// share of the amount at `rate` (e.g., 2% of 1000 is 20)
    pub fn apply_rate(&self, rate: Rate) -> Result<Self> {
        self.0
            .checked_mul(rate.as_decimal())
            .map(Money)
            .ok_or(BillingError::ArithmeticOverflow { operation: "apply rate" })
    }

    /// apply a per-day fractional rate for given days
    pub fn apply_daily_rate(&self, daily_rate: Rate, days: u32) -> Result<Self> {
        self.0
            .checked_mul(daily_rate.as_decimal())
            .and_then(|per_day| per_day.checked_mul(Decimal::from(days)))
            .map(Money)
            .ok_or(BillingError::ArithmeticOverflow { operation: "daily interest" })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

/// rate type for per-day interest and percentages, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    /// create from fraction (e.g., 0.001 for 0.1%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 2 for 2%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// get as fraction
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_arithmetic_keeps_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        let sum = m + Money::from_major(1);
        assert_eq!(sum.as_decimal(), dec!(101.123456789));
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(Money::from_decimal(dec!(10.005)).round_currency(), Money::from_minor(1001));
        assert_eq!(Money::from_decimal(dec!(10.004)).round_currency(), Money::from_minor(1000));
        assert_eq!(Money::from_decimal(dec!(0.125)).round_currency(), Money::from_decimal(dec!(0.13)));
    }

    #[test]
    fn test_from_minor() {
        assert_eq!(Money::from_minor(150_050), Money::from_decimal(dec!(1500.50)));
        assert_eq!(Money::from_minor(1), Money::CENT);
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Money::from_f64(f64::NAN).is_err());
        assert!(Money::from_f64(f64::INFINITY).is_err());
        assert!(Money::from_f64(f64::NEG_INFINITY).is_err());
        assert_eq!(Money::from_f64(1000.0).unwrap(), Money::from_major(1000));
    }

    #[test]
    fn test_is_positive_excludes_zero() {
        assert!(!Money::ZERO.is_positive());
        assert!(Money::CENT.is_positive());
        assert!(!Money::from_major(-1).is_positive());
    }

    #[test]
    fn test_apply_rate_and_daily_rate() {
        let amount = Money::from_major(1_000);
        assert_eq!(amount.apply_rate(Rate::from_percentage(dec!(2))).unwrap(), Money::from_major(20));

        let daily = Rate::from_decimal(dec!(0.001));
        assert_eq!(amount.apply_daily_rate(daily, 10).unwrap(), Money::from_major(10));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(
            huge.apply_rate(Rate::from_decimal(dec!(2))),
            Err(BillingError::ArithmeticOverflow { operation: "apply rate" })
        );
        assert_eq!(
            Money::from_major(1_000_000_000_000)
                .apply_daily_rate(Rate::from_decimal(dec!(1000000000000000000)), 1_000_000),
            Err(BillingError::ArithmeticOverflow { operation: "daily interest" })
        );
        assert!(huge.checked_add(Money::from_major(1)).is_err());
        assert_eq!(
            Money::from_major(1).checked_add(Money::CENT).unwrap(),
            Money::from_minor(101)
        );
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percentage(dec!(5));
        assert_eq!(rate.as_decimal(), dec!(0.05));
        assert_eq!(rate.as_percentage(), dec!(5));
        assert_eq!(rate.to_string(), "5%");
    }
}
