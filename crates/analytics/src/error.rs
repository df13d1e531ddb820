use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Period boundary for {0} is outside the supported calendar range")]
    DateOutOfRange(NaiveDate),

    #[error("Achievement '{0}' has a non-positive target")]
    InvalidTarget(String),

    #[error("Achievement id '{0}' is defined more than once")]
    DuplicateAchievement(String),
}
