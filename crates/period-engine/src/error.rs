//! Error types for period-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Malformed duration: {0}")]
    MalformedDuration(String),

    #[error("Unknown unit: '{0}'")]
    UnknownUnit(String),

    #[error("Invalid conversion: {0}")]
    InvalidConversion(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, PeriodError>;
