//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! Rows are read by column name so `SELECT *` and joins stay in sync with
//! the schema.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde_json::{Map, Value};

use welfare_core::assistance::{FinancialAssistance, RecurringInvoiceLog};
use welfare_core::attachment::Attachment;
use welfare_core::audit::Audit;
use welfare_core::files::{Folder, PersonalFile};
use welfare_core::lookup::LookupRow;
use welfare_core::messaging::{
    Conversation, ConversationKind, ConversationParticipant, Message, ReadReceipt, ReadStatus,
};
use welfare_core::outreach::{Borehole, Ticket};
use welfare_core::people::{Applicant, Employee};

/// Attachment columns in bind order: data, filename, mime, size, updated_at.
pub type AttachmentParams = (
    Option<Vec<u8>>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
);

// ============================================================================
// People
// ============================================================================

pub fn row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        center_id: row.get("center_id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        user_type: row.get("user_type")?,
        email: row.get("email")?,
        contact_number: row.get("contact_number")?,
        department: row.get("department")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_applicant(row: &Row) -> rusqlite::Result<Applicant> {
    Ok(Applicant {
        id: row.get("id")?,
        center_id: row.get("center_id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        file_number: row.get("file_number")?,
        id_number: row.get("id_number")?,
        cell_number: row.get("cell_number")?,
        file_status: row.get("file_status")?,
        signature: row_to_attachment(row, "signature")?,
        audit: row_to_audit(row)?,
    })
}

// ============================================================================
// Assistance
// ============================================================================

pub fn row_to_assistance(row: &Row) -> rusqlite::Result<FinancialAssistance> {
    Ok(FinancialAssistance {
        id: row.get("id")?,
        file_id: row.get("file_id")?,
        assistance_type: row.get("assistance_type")?,
        financial_amount: row.get("financial_amount")?,
        date_of_assistance: get_optional_date(row, "date_of_assistance")?,
        assisted_by: row.get("assisted_by")?,
        sector: row.get("sector")?,
        program: row.get("program")?,
        project: row.get("project")?,
        give_to: row.get("give_to")?,
        starting_date: get_optional_date(row, "starting_date")?,
        end_date: get_optional_date(row, "end_date")?,
        frequency: row.get("frequency")?,
        is_recurring: row.get("is_recurring")?,
        is_auto_generated: row.get("is_auto_generated")?,
        recurring_source_id: row.get("recurring_source_id")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_recurring_log(row: &Row) -> rusqlite::Result<RecurringInvoiceLog> {
    Ok(RecurringInvoiceLog {
        id: row.get("id")?,
        applicant_id: row.get("applicant_id")?,
        financial_aid_id: row.get("financial_aid_id")?,
        source_financial_aid_id: row.get("source_financial_aid_id")?,
        next_run_date: get_optional_date(row, "next_run_date")?,
        frequency: row.get("frequency")?,
        created_by_system: row.get("created_by_system")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

// ============================================================================
// Outreach
// ============================================================================

/// Water usage purposes live in their own table and are filled in by the
/// repository after the row is read.
pub fn row_to_borehole(row: &Row) -> rusqlite::Result<Borehole> {
    Ok(Borehole {
        id: row.get("id")?,
        imam_profile_id: row.get("imam_profile_id")?,
        where_required: row.get("where_required")?,
        has_electricity: row.get("has_electricity")?,
        received_borehole_before: row.get("received_borehole_before")?,
        current_water_source: row.get("current_water_source")?,
        distance_to_water_source: row.get("distance_to_water_source")?,
        beneficiaries_count: row.get("beneficiaries_count")?,
        challenges_due_to_lack_of_water: row.get("challenges_due_to_lack_of_water")?,
        motivation: row.get("motivation")?,
        longitude: row.get("longitude")?,
        latitude: row.get("latitude")?,
        acknowledge: row.get("acknowledge")?,
        status_id: row.get("status_id")?,
        comment: row.get("comment")?,
        water_usage_purpose_ids: Vec::new(),
        current_water_source_image: row_to_attachment(row, "current_water_source_image")?,
        masjid_area_image: row_to_attachment(row, "masjid_area_image")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_ticket(row: &Row) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        classification_id: row.get("classification_id")?,
        status_id: row.get("status_id")?,
        allocated_to: row.get("allocated_to")?,
        closed_at: get_optional_datetime(row, "closed_at")?,
        media: row_to_attachment(row, "media")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

// ============================================================================
// File manager
// ============================================================================

pub fn row_to_folder(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
        employee_id: row.get("employee_id")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_personal_file(row: &Row) -> rusqlite::Result<PersonalFile> {
    Ok(PersonalFile {
        id: row.get("id")?,
        name: row.get("name")?,
        folder_id: row.get("folder_id")?,
        employee_id: row.get("employee_id")?,
        file: row_to_attachment(row, "file")?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

// ============================================================================
// Messaging
// ============================================================================

pub fn row_to_conversation(row: &Row) -> rusqlite::Result<Conversation> {
    let kind: String = row.get("type")?;
    Ok(Conversation {
        id: row.get("id")?,
        title: row.get("title")?,
        kind: ConversationKind::parse(&kind)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        center_id: row.get("center_id")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_participant(row: &Row) -> rusqlite::Result<ConversationParticipant> {
    Ok(ConversationParticipant {
        id: row.get("id")?,
        conversation_id: row.get("conversation_id")?,
        employee_id: row.get("employee_id")?,
        joined_date: get_date(row, "joined_date")?,
        last_read_at: get_optional_datetime(row, "last_read_at")?,
        deleted_at: get_optional_datetime(row, "deleted_at")?,
        last_restored_at: get_optional_datetime(row, "last_restored_at")?,
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_message(row: &Row) -> rusqlite::Result<Message> {
    let status: String = row.get("read_status")?;
    Ok(Message {
        id: row.get("id")?,
        conversation_id: row.get("conversation_id")?,
        sender_id: row.get("sender_id")?,
        message_text: row.get("message_text")?,
        attachment: row_to_attachment(row, "attachment")?,
        read_status: parse_read_status(&status),
        audit: row_to_audit(row)?,
    })
}

pub fn row_to_receipt(row: &Row) -> rusqlite::Result<ReadReceipt> {
    Ok(ReadReceipt {
        message_id: row.get("message_id")?,
        employee_id: row.get("employee_id")?,
        read_at: get_datetime(row, "read_at")?,
    })
}

pub fn read_status_to_str(status: ReadStatus) -> &'static str {
    match status {
        ReadStatus::Unread => "Unread",
        ReadStatus::Read => "Read",
    }
}

fn parse_read_status(s: &str) -> ReadStatus {
    if s.eq_ignore_ascii_case("read") {
        ReadStatus::Read
    } else {
        ReadStatus::Unread
    }
}

// ============================================================================
// Lookups
// ============================================================================

pub fn row_to_lookup(row: &Row) -> rusqlite::Result<LookupRow> {
    let extra: String = row.get("extra")?;
    Ok(LookupRow {
        id: row.get("id")?,
        name: row.get("name")?,
        extra: parse_extra(&extra)?,
        audit: row_to_audit(row)?,
    })
}

pub fn extra_to_json(extra: &Map<String, Value>) -> String {
    Value::Object(extra.clone()).to_string()
}

fn parse_extra(s: &str) -> rusqlite::Result<Map<String, Value>> {
    serde_json::from_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

// ============================================================================
// Shared columns
// ============================================================================

fn row_to_audit(row: &Row) -> rusqlite::Result<Audit> {
    Ok(Audit {
        created_by: row.get("created_by")?,
        updated_by: row.get("updated_by")?,
        created_at: get_datetime(row, "created_at")?,
        updated_at: get_datetime(row, "updated_at")?,
    })
}

/// Reads the attachment stored under `prefix`. A missing blob means no
/// attachment.
fn row_to_attachment(row: &Row, prefix: &str) -> rusqlite::Result<Option<Attachment>> {
    let Some(data) = row.get::<_, Option<Vec<u8>>>(prefix)? else {
        return Ok(None);
    };
    Ok(Some(Attachment {
        data,
        filename: row.get(format!("{prefix}_filename").as_str())?,
        mime: row.get(format!("{prefix}_mime").as_str())?,
        size: row.get(format!("{prefix}_size").as_str())?,
        updated_at: get_optional_datetime(row, &format!("{prefix}_updated_at"))?,
    }))
}

pub fn attachment_params(attachment: Option<&Attachment>) -> AttachmentParams {
    match attachment {
        Some(a) => (
            Some(a.data.clone()),
            a.filename.clone(),
            a.mime.clone(),
            a.size,
            a.updated_at.as_ref().map(format_datetime),
        ),
        None => (None, None, None, None, None),
    }
}

fn get_date(row: &Row, column: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(column)?;
    parse_date(&s)
}

fn get_optional_date(row: &Row, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(column)?
        .as_deref()
        .map(parse_date)
        .transpose()
}

fn get_datetime(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(column)?;
    parse_datetime(&s)
}

fn get_optional_datetime(row: &Row, column: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(column)?
        .as_deref()
        .map(parse_datetime)
        .transpose()
}

pub fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Formats a timestamp with a fixed number of fractional digits so stored
/// values sort lexically in time order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> Option<String> {
    date.as_ref().map(format_date)
}

pub fn format_optional_datetime(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let fraction = whole + chrono::Duration::milliseconds(5);
        assert_eq!(format_datetime(&whole), "2025-03-10T08:00:00.000000000Z");
        assert_eq!(format_datetime(&fraction), "2025-03-10T08:00:00.005000000Z");
        assert!(format_datetime(&whole) < format_datetime(&fraction));
    }

    #[test]
    fn test_parse_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 10, 8, 30, 15).unwrap();
        assert_eq!(parse_datetime(&format_datetime(&dt)).unwrap(), dt);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_format_and_parse_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(format_date(&date), "2025-01-31");
        assert_eq!(parse_date("2025-01-31").unwrap(), date);
        assert!(parse_date("31/01/2025").is_err());
        assert_eq!(format_optional_date(None), None);
    }

    #[test]
    fn test_read_status_text() {
        assert_eq!(read_status_to_str(ReadStatus::Read), "Read");
        assert_eq!(parse_read_status("Read"), ReadStatus::Read);
        assert_eq!(parse_read_status("Unread"), ReadStatus::Unread);
        assert_eq!(parse_read_status("anything"), ReadStatus::Unread);
    }

    #[test]
    fn test_attachment_params() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let attachment = Attachment::new(
            vec![1, 2, 3],
            Some("well.jpg".to_string()),
            Some("image/jpeg".to_string()),
            now,
        );
        let (data, filename, mime, size, updated_at) = attachment_params(Some(&attachment));
        assert_eq!(data, Some(vec![1, 2, 3]));
        assert_eq!(filename.as_deref(), Some("well.jpg"));
        assert_eq!(mime.as_deref(), Some("image/jpeg"));
        assert_eq!(size, Some(3));
        assert_eq!(updated_at, Some(format_datetime(&now)));

        assert_eq!(attachment_params(None), (None, None, None, None, None));
    }

    #[test]
    fn test_extra_json() {
        let mut extra = Map::new();
        extra.insert("hadith_arabic".to_string(), Value::from("..."));
        let json = extra_to_json(&extra);
        assert_eq!(parse_extra(&json).unwrap(), extra);
        assert!(parse_extra("not json").is_err());
    }
}
