use thiserror::Error;

/// Input rejected locally, before any persistence call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text must not be empty")]
    EmptyText,
    #[error("days to deadline must be positive, got {0}")]
    NonPositiveDays(i64),
    #[error("could not parse deadline date '{0}' (expected YYYY-MM-DD)")]
    UnparsableDate(String),
    #[error("could not parse day count '{0}'")]
    UnparsableDays(String),
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),
    #[error("unknown quadrant '{0}' (expected q1..q4)")]
    UnknownQuadrant(String),
    #[error("reorder list does not match the tasks of {0}")]
    ReorderMismatch(String),
    #[error("only the last time record may be open")]
    MisplacedOpenRecord,
}

/// Rejected focus-timer transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("task already has an open time record")]
    OpenRecordExists,
}
