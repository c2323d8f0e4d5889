//! Schedule error types.

use thiserror::Error;

/// Errors that can occur while parsing a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("calendar window must have 5 or 7 fields, got {0}: {1:?}")]
    FieldCount(usize, String),

    #[error("invalid {field} field {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("period `{key}` has no `{separator}` separator: {value:?}")]
    MissingSeparator {
        key: String,
        separator: String,
        value: String,
    },

    #[error("invalid value for `{key}`: {value:?} is neither an integer nor a known expression")]
    UnresolvedReference { key: String, value: String },

    #[error("invalid window for `{key}`: {source}")]
    Window {
        key: String,
        #[source]
        source: Box<ScheduleError>,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
