pub mod adjustment;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod record;
pub mod types;

// re-export key types
pub use adjustment::{
    calculate_adjustment, AdjustmentEngine, CalculationInput, CalculationResult, OverdueCharges,
};
pub use config::BillingConfiguration;
pub use decimal::{Money, Rate};
pub use errors::{BillingError, Result};
pub use record::{BillingRecord, BillingRecordUpdate};
pub use types::{BillingId, BillingStatus, DayDifference};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
