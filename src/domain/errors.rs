//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller error detected at construction / call time. Never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not implemented: {0}")]
    Unsupported(String),

    /// Input could not be interpreted as the expected type (date, weekday, number).
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid week: year {year} has no week number {week_number}")]
    InvalidWeek { year: i32, week_number: u32 },

    /// Strict-mode lookup found nothing, even after one rebuild-and-retry.
    #[error("Not found in cache: {key}")]
    NotFound { key: String },

    /// Build phases were run out of order (e.g. years before weeks).
    #[error("Internal consistency error: {0}")]
    Consistency(String),

    #[error("Cache error: {0}")]
    Cache(String),

    /// Interactive prompt failed or was cancelled.
    #[error("Input error: {0}")]
    Input(String),
}
