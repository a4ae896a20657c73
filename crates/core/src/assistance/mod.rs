mod error;
mod recurrence;
mod types;
mod validation;

pub use error::RecurringError;
pub use recurrence::{
    add_frequency, is_active_template, next_occurrence, occurrence_from_template,
    plan_occurrences, recurring_log_for,
};
pub use types::{
    FinancialAssistance, FinancialAssistanceInput, Frequency, RecurringInvoiceLog,
    RecurringRequest,
};
pub use validation::{validate_recurring_request, MAX_RECURRING_RANGE_DAYS};
