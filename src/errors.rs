use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::BillingStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("invalid amount: {amount} (original amount must be greater than zero)")]
    InvalidAmount {
        amount: Money,
    },

    #[error("non-finite amount: {value}")]
    NonFiniteAmount {
        value: f64,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid rate for {field}: {rate} (rates must be non-negative)")]
    InvalidRate {
        field: &'static str,
        rate: Decimal,
    },

    #[error("arithmetic overflow in {operation}: amount or rate out of range")]
    ArithmeticOverflow {
        operation: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("billing record cannot be updated: current status is {status:?}")]
    InvalidStatusTransition {
        status: BillingStatus,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
