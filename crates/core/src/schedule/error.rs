use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("cron expression must have 5 fields, got {0}")]
    FieldCount(usize),
    #[error("invalid {field} field: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_error_display() {
        assert_eq!(
            ScheduleError::InvalidField {
                field: "hour",
                value: "25".to_string()
            }
            .to_string(),
            "invalid hour field: 25"
        );
        assert_eq!(
            ScheduleError::UnknownTimezone("Mars/Olympus".to_string()).to_string(),
            "unknown timezone: Mars/Olympus"
        );
    }
}
