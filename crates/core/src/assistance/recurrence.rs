//! Calendar arithmetic for recurring assistance.
//!
//! Pure functions: the caller supplies the last generated date and the
//! reference date, and persists whatever these functions plan.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::audit::{Audit, SYSTEM_ACTOR};

use super::{FinancialAssistance, Frequency, RecurringInvoiceLog};

/// Advances a date by one period.
///
/// Monthly steps clamp to the last day of shorter months, so Jan 31 is
/// followed by Feb 28 (or 29). Returns `None` on calendar overflow.
pub fn add_frequency(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
    }
}

/// First date still to generate for a template.
///
/// `last_generated` is the latest `date_of_assistance` among the template
/// and its occurrences. Without one, generation starts at `starting_date`.
pub fn next_occurrence(
    template: &FinancialAssistance,
    last_generated: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let frequency = template.parsed_frequency()?;
    match last_generated {
        Some(last) => add_frequency(last, frequency),
        None => template.starting_date,
    }
}

/// Dates that are due for a template as of `reference`.
///
/// Every returned date lies within `[starting_date, end_date]` and is on or
/// before `reference`. Templates with an unsupported frequency or missing
/// dates yield nothing.
pub fn plan_occurrences(
    template: &FinancialAssistance,
    last_generated: Option<NaiveDate>,
    reference: NaiveDate,
) -> Vec<NaiveDate> {
    let (Some(frequency), Some(start), Some(end)) = (
        template.parsed_frequency(),
        template.starting_date,
        template.end_date,
    ) else {
        return Vec::new();
    };

    let mut dates = Vec::new();
    let mut next = next_occurrence(template, last_generated);
    while let Some(date) = next {
        if date < start || date > end || date > reference {
            break;
        }
        dates.push(date);
        next = add_frequency(date, frequency);
    }
    dates
}

/// Whether a record is a template that is active on `reference`.
pub fn is_active_template(record: &FinancialAssistance, reference: NaiveDate) -> bool {
    record.is_recurring
        && !record.is_auto_generated
        && record.starting_date.is_some_and(|start| start <= reference)
        && record.end_date.is_some_and(|end| end >= reference)
}

/// Builds the occurrence row for `date`. The store assigns the id.
pub fn occurrence_from_template(
    template: &FinancialAssistance,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> FinancialAssistance {
    FinancialAssistance {
        id: 0,
        date_of_assistance: Some(date),
        is_recurring: false,
        is_auto_generated: true,
        recurring_source_id: Some(template.id),
        audit: Audit::new(SYSTEM_ACTOR, now),
        ..template.clone()
    }
}

/// Builds the log entry recorded next to a generated occurrence.
pub fn recurring_log_for(
    template: &FinancialAssistance,
    occurrence: &FinancialAssistance,
    now: DateTime<Utc>,
) -> RecurringInvoiceLog {
    let frequency = template.parsed_frequency();
    RecurringInvoiceLog {
        id: 0,
        applicant_id: template.file_id,
        financial_aid_id: occurrence.id,
        source_financial_aid_id: template.id,
        next_run_date: match (occurrence.date_of_assistance, frequency) {
            (Some(date), Some(freq)) => add_frequency(date, freq),
            _ => None,
        },
        frequency: frequency.map(|f| f.as_str().to_string()).unwrap_or_default(),
        created_by_system: true,
        center_id: template.center_id,
        audit: Audit::new(SYSTEM_ACTOR, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(frequency: &str, start: NaiveDate, end: NaiveDate) -> FinancialAssistance {
        FinancialAssistance {
            id: 10,
            file_id: 3,
            assistance_type: Some(1),
            financial_amount: Some(500.0),
            date_of_assistance: Some(start),
            assisted_by: None,
            sector: None,
            program: None,
            project: None,
            give_to: Some("Applicant".to_string()),
            starting_date: Some(start),
            end_date: Some(end),
            frequency: Some(frequency.to_string()),
            is_recurring: true,
            is_auto_generated: false,
            recurring_source_id: None,
            center_id: Some(2),
            audit: Audit::new("admin", Utc::now()),
        }
    }

    #[test]
    fn add_frequency_daily_and_weekly() {
        assert_eq!(
            add_frequency(date(2024, 12, 31), Frequency::Daily),
            Some(date(2025, 1, 1))
        );
        assert_eq!(
            add_frequency(date(2024, 2, 26), Frequency::Weekly),
            Some(date(2024, 3, 4))
        );
    }

    #[test]
    fn add_frequency_monthly_clamps_to_month_end() {
        assert_eq!(
            add_frequency(date(2024, 1, 31), Frequency::Monthly),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            add_frequency(date(2023, 1, 31), Frequency::Monthly),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            add_frequency(date(2024, 3, 31), Frequency::Monthly),
            Some(date(2024, 4, 30))
        );
        assert_eq!(
            add_frequency(date(2024, 12, 15), Frequency::Monthly),
            Some(date(2025, 1, 15))
        );
    }

    #[test]
    fn next_occurrence_starts_at_start_date_without_history() {
        let t = template("weekly", date(2025, 1, 1), date(2025, 3, 1));
        assert_eq!(next_occurrence(&t, None), Some(date(2025, 1, 1)));
        assert_eq!(
            next_occurrence(&t, Some(date(2025, 1, 1))),
            Some(date(2025, 1, 8))
        );
    }

    #[test]
    fn plan_stops_at_reference_date() {
        let t = template("weekly", date(2025, 1, 1), date(2025, 3, 1));
        // The template row itself is dated on the start date.
        let planned = plan_occurrences(&t, Some(date(2025, 1, 1)), date(2025, 1, 20));
        assert_eq!(planned, vec![date(2025, 1, 8), date(2025, 1, 15)]);
    }

    #[test]
    fn plan_stops_at_end_date() {
        let t = template("monthly", date(2025, 1, 31), date(2025, 4, 15));
        let planned = plan_occurrences(&t, Some(date(2025, 1, 31)), date(2025, 12, 31));
        // Monthly steps advance from the previous (clamped) date.
        assert_eq!(planned, vec![date(2025, 2, 28), date(2025, 3, 28)]);
    }

    #[test]
    fn plan_is_empty_when_caught_up() {
        let t = template("daily", date(2025, 1, 1), date(2025, 1, 10));
        assert!(plan_occurrences(&t, Some(date(2025, 1, 5)), date(2025, 1, 5)).is_empty());
    }

    #[test]
    fn plan_is_empty_for_unsupported_frequency_or_missing_dates() {
        let t = template("yearly", date(2025, 1, 1), date(2025, 12, 31));
        assert!(plan_occurrences(&t, None, date(2025, 6, 1)).is_empty());

        let mut t = template("daily", date(2025, 1, 1), date(2025, 12, 31));
        t.end_date = None;
        assert!(plan_occurrences(&t, None, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn plan_without_history_includes_start_date() {
        let t = template("daily", date(2025, 1, 1), date(2025, 1, 10));
        let planned = plan_occurrences(&t, None, date(2025, 1, 3));
        assert_eq!(
            planned,
            vec![date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]
        );
    }

    #[test]
    fn active_template_window() {
        let t = template("daily", date(2025, 1, 1), date(2025, 1, 10));
        assert!(is_active_template(&t, date(2025, 1, 1)));
        assert!(is_active_template(&t, date(2025, 1, 10)));
        assert!(!is_active_template(&t, date(2025, 1, 11)));
        assert!(!is_active_template(&t, date(2024, 12, 31)));

        let mut occurrence = t.clone();
        occurrence.is_auto_generated = true;
        assert!(!is_active_template(&occurrence, date(2025, 1, 5)));
    }

    #[test]
    fn occurrence_copies_template_fields() {
        let now = Utc::now();
        let t = template("Monthly", date(2025, 1, 1), date(2025, 6, 1));
        let occurrence = occurrence_from_template(&t, date(2025, 2, 1), now);

        assert_eq!(occurrence.id, 0);
        assert_eq!(occurrence.file_id, 3);
        assert_eq!(occurrence.financial_amount, Some(500.0));
        assert_eq!(occurrence.date_of_assistance, Some(date(2025, 2, 1)));
        assert!(!occurrence.is_recurring);
        assert!(occurrence.is_auto_generated);
        assert_eq!(occurrence.recurring_source_id, Some(10));
        assert_eq!(occurrence.center_id, Some(2));
        assert_eq!(occurrence.audit.created_by, "system");
    }

    #[test]
    fn log_records_next_run_date() {
        let now = Utc::now();
        let t = template("MONTHLY", date(2025, 1, 31), date(2025, 6, 1));
        let mut occurrence = occurrence_from_template(&t, date(2025, 2, 28), now);
        occurrence.id = 11;

        let log = recurring_log_for(&t, &occurrence, now);
        assert_eq!(log.applicant_id, 3);
        assert_eq!(log.financial_aid_id, 11);
        assert_eq!(log.source_financial_aid_id, 10);
        assert_eq!(log.next_run_date, Some(date(2025, 3, 28)));
        assert_eq!(log.frequency, "monthly");
        assert!(log.created_by_system);
    }
}
