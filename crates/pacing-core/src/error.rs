use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacingError {
    #[error("Invalid range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid target: revenue target must be between 0 and 10^15 (got {0})")]
    InvalidTarget(Decimal),

    #[error("Invalid ROAS: target ROAS must be positive and imply at most 10^15 of ad spend (got {0})")]
    InvalidRoas(Decimal),

    #[error("Inconsistent monthly targets: {reason}")]
    InconsistentMonthlyTargets { reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PacingError {
    fn from(e: serde_json::Error) -> Self {
        PacingError::SerializationError(e.to_string())
    }
}
