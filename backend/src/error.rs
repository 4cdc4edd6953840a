//! Error types for timetable resolution.
//!
//! Resolution itself is infallible for well-formed input; these errors cover
//! malformed entries, inconsistent timetable grids, and configuration problems.

/// Result type for timetable operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error type for timetable operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// An entry violates a data invariant (e.g. ends before it starts).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The lesson/break grid is inconsistent.
    #[error("Timetable error: {0}")]
    Timetable(String),

    /// A configuration file could not be read or interpreted.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ScheduleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScheduleError::Validation(message.into())
    }

    pub fn timetable(message: impl Into<String>) -> Self {
        ScheduleError::Timetable(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ScheduleError::Configuration(message.into())
    }

    /// Whether this error was raised by entry validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, ScheduleError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = ScheduleError::validation("end before start");
        assert_eq!(err.to_string(), "Validation error: end before start");
        assert!(err.is_validation());
    }

    #[test]
    fn test_timetable_error_is_not_validation() {
        let err = ScheduleError::timetable("missing break");
        assert!(!err.is_validation());
        assert!(err.to_string().starts_with("Timetable error"));
    }
}
