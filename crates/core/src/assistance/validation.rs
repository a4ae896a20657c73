use chrono::NaiveDate;

use crate::audit::Audit;
use crate::serde::parse_date;

use super::{FinancialAssistance, Frequency, RecurringError, RecurringRequest};

/// Longest allowed span between starting and end date, in days.
pub const MAX_RECURRING_RANGE_DAYS: i64 = 366;

fn parse_required(value: &str) -> Result<NaiveDate, RecurringError> {
    parse_date(value).ok_or(RecurringError::InvalidDates)
}

/// Validates a recurring request and builds the template record.
///
/// Checks run in a fixed order so the first failing rule decides the error:
/// applicant, dates present, frequency, dates parse, ordering, range.
pub fn validate_recurring_request(
    request: RecurringRequest,
    center_id: Option<i64>,
    audit: Audit,
) -> Result<FinancialAssistance, RecurringError> {
    let file_id = request.file_id.ok_or(RecurringError::MissingFileId)?;

    let (Some(start), Some(end)) = (request.starting_date.as_deref(), request.end_date.as_deref())
    else {
        return Err(RecurringError::MissingDates);
    };

    let frequency = request
        .frequency
        .as_deref()
        .and_then(Frequency::parse)
        .ok_or(RecurringError::UnsupportedFrequency)?;

    let starting_date = parse_required(start)?;
    let end_date = parse_required(end)?;

    if end_date < starting_date {
        return Err(RecurringError::EndBeforeStart);
    }
    if (end_date - starting_date).num_days() > MAX_RECURRING_RANGE_DAYS {
        return Err(RecurringError::RangeTooLong);
    }

    let date_of_assistance = request
        .date_of_assistance
        .as_deref()
        .and_then(parse_date)
        .unwrap_or(starting_date);

    Ok(FinancialAssistance {
        id: 0,
        file_id,
        assistance_type: request.assistance_type,
        financial_amount: request.financial_amount,
        date_of_assistance: Some(date_of_assistance),
        assisted_by: request.assisted_by,
        sector: request.sector,
        program: request.program,
        project: request.project,
        give_to: request.give_to,
        starting_date: Some(starting_date),
        end_date: Some(end_date),
        frequency: Some(frequency.as_str().to_string()),
        is_recurring: true,
        is_auto_generated: false,
        recurring_source_id: None,
        center_id,
        audit,
    })
}
