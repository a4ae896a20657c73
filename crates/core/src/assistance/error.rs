use thiserror::Error;

/// Validation errors for recurring assistance templates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurringError {
    #[error("Applicant (file_id) is required.")]
    MissingFileId,
    #[error("Starting date and end date are required.")]
    MissingDates,
    #[error("Frequency must be Daily, Weekly, or Monthly.")]
    UnsupportedFrequency,
    #[error("Starting date and end date must be valid dates.")]
    InvalidDates,
    #[error("End date must be after start date.")]
    EndBeforeStart,
    #[error("Recurring schedules cannot exceed 12 months.")]
    RangeTooLong,
}
