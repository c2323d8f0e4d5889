//! Strategy error types.

use thiserror::Error;

/// Errors that abort a whole evaluation.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid value for `hysteresis`: {value:?} ({reason})")]
    InvalidHysteresis { value: String, reason: &'static str },

    #[error("period error: {0}")]
    Schedule(#[from] cronscale_schedule::ScheduleError),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
