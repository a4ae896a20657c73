//! SQLite repository implementation.
//!
//! Implements the repository traits from `welfare_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Params, Row};
use tokio_rusqlite::Connection;

use welfare_core::assistance::{FinancialAssistance, RecurringInvoiceLog};
use welfare_core::files::{Folder, PersonalFile};
use welfare_core::lookup::{LookupRow, LOOKUP_TABLES};
use welfare_core::messaging::{Conversation, ConversationParticipant, Message, ReadReceipt};
use welfare_core::outreach::{Borehole, Ticket};
use welfare_core::people::{Applicant, Employee};
use welfare_core::storage::{
    ApplicantRepository, BoreholeRepository, CenterFilter, ConversationRepository,
    EmployeeRepository, FinancialAssistanceRepository, FolderRepository, LookupRepository,
    MessageRepository, ParticipantRepository, PersonalFileRepository,
    RecurringInvoiceLogRepository, RepositoryError, Result, TicketRepository,
};

use super::conversions::{
    attachment_params, extra_to_json, format_date, format_datetime, format_optional_date,
    format_optional_datetime, parse_date, read_status_to_str, row_to_applicant, row_to_assistance,
    row_to_borehole, row_to_conversation, row_to_employee, row_to_folder, row_to_lookup,
    row_to_message, row_to_participant, row_to_personal_file, row_to_receipt,
    row_to_recurring_log, row_to_ticket,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn query_all<T, P: Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    f: fn(&Row) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, f)?;
    rows.collect()
}

fn query_optional<T, P: Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    f: fn(&Row) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
    conn.prepare(sql)?.query_row(params, f).optional()
}

/// Runs a write that must touch a row. Zero affected rows becomes
/// `QueryReturnedNoRows`, which maps to `NotFound`.
fn execute_existing<P: Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<()> {
    match conn.execute(sql, params)? {
        0 => Err(rusqlite::Error::QueryReturnedNoRows),
        _ => Ok(()),
    }
}

fn load_purposes(conn: &rusqlite::Connection, borehole: &mut Borehole) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(schema::SELECT_BOREHOLE_PURPOSES)?;
    let ids = stmt.query_map([borehole.id], |row| row.get(0))?;
    borehole.water_usage_purpose_ids = ids.collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(())
}

fn save_purposes(
    conn: &rusqlite::Connection,
    borehole_id: i64,
    ids: &[i64],
) -> rusqlite::Result<()> {
    conn.execute(schema::DELETE_BOREHOLE_PURPOSES, [borehole_id])?;
    let mut stmt = conn.prepare(schema::INSERT_BOREHOLE_PURPOSE)?;
    for id in ids {
        stmt.execute([borehole_id, *id])?;
    }
    Ok(())
}

fn insert_assistance(
    conn: &rusqlite::Connection,
    r: &FinancialAssistance,
) -> rusqlite::Result<i64> {
    conn.execute(
        schema::INSERT_ASSISTANCE,
        params![
            r.file_id,
            r.assistance_type,
            r.financial_amount,
            format_optional_date(r.date_of_assistance),
            r.assisted_by,
            r.sector,
            r.program,
            r.project,
            r.give_to,
            format_optional_date(r.starting_date),
            format_optional_date(r.end_date),
            r.frequency,
            r.is_recurring,
            r.is_auto_generated,
            r.recurring_source_id,
            r.center_id,
            r.audit.created_by,
            r.audit.updated_by,
            format_datetime(&r.audit.created_at),
            format_datetime(&r.audit.updated_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_participant(
    conn: &rusqlite::Connection,
    p: &ConversationParticipant,
) -> rusqlite::Result<i64> {
    conn.execute(
        schema::INSERT_PARTICIPANT,
        params![
            p.conversation_id,
            p.employee_id,
            format_date(&p.joined_date),
            format_optional_datetime(p.last_read_at),
            format_optional_datetime(p.deleted_at),
            format_optional_datetime(p.last_restored_at),
            p.audit.created_by,
            p.audit.updated_by,
            format_datetime(&p.audit.created_at),
            format_datetime(&p.audit.updated_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates the fixed tables and one table per allowlisted lookup.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMAS).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            for table in LOOKUP_TABLES {
                conn.execute_batch(&schema::create_lookup_table(table.name))
                    .map_err(wrap_err)?;
            }
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// EmployeeRepository implementation
// ============================================================================

#[async_trait]
impl EmployeeRepository for SqliteRepository {
    async fn list_employees(&self, center: CenterFilter) -> Result<Vec<Employee>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_EMPLOYEES, [center], row_to_employee)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))
    }

    async fn get_employee(&self, id: i64, center: CenterFilter) -> Result<Option<Employee>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_EMPLOYEE_BY_ID,
                    params![id, center],
                    row_to_employee,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", id))
    }

    async fn get_employee_by_username(&self, username: &str) -> Result<Option<Employee>> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_EMPLOYEE_BY_USERNAME,
                    [&username],
                    row_to_employee,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))
    }

    async fn get_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>> {
        let ids = ids.to_vec();

        self.conn
            .call(move |conn| {
                let mut employees = Vec::with_capacity(ids.len());
                for id in ids {
                    let found = query_optional(
                        conn,
                        schema::SELECT_EMPLOYEE_BY_ID,
                        params![id, None::<i64>],
                        row_to_employee,
                    )
                    .map_err(wrap_err)?;
                    employees.extend(found);
                }
                Ok(employees)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))
    }

    async fn create_employee(&self, employee: &Employee) -> Result<Employee> {
        let mut stored = employee.clone();
        let username = employee.username.clone();

        self.conn
            .call(move |conn| {
                let e = &stored;
                conn.execute(
                    schema::INSERT_EMPLOYEE,
                    params![
                        e.center_id,
                        e.name,
                        e.surname,
                        e.username,
                        e.password_hash,
                        e.user_type,
                        e.email,
                        e.contact_number,
                        e.department,
                        e.audit.created_by,
                        e.audit.updated_by,
                        format_datetime(&e.audit.created_at),
                        format_datetime(&e.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", username))
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let e = employee.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    schema::UPDATE_EMPLOYEE,
                    params![
                        e.id,
                        e.center_id,
                        e.name,
                        e.surname,
                        e.username,
                        e.password_hash,
                        e.user_type,
                        e.email,
                        e.contact_number,
                        e.department,
                        e.audit.updated_by,
                        format_datetime(&e.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|err| map_tokio_rusqlite_error_with_id(err, "Employee", employee.id))
    }

    async fn delete_employee(&self, id: i64, center: CenterFilter) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_EMPLOYEE, params![id, center])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", id))
    }
}

// ============================================================================
// ApplicantRepository implementation
// ============================================================================

#[async_trait]
impl ApplicantRepository for SqliteRepository {
    async fn list_applicants(&self, center: CenterFilter) -> Result<Vec<Applicant>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_APPLICANTS, [center], row_to_applicant)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Applicant"))
    }

    async fn get_applicant(&self, id: i64, center: CenterFilter) -> Result<Option<Applicant>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_APPLICANT_BY_ID,
                    params![id, center],
                    row_to_applicant,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Applicant", id))
    }

    async fn create_applicant(&self, applicant: &Applicant) -> Result<Applicant> {
        let mut stored = applicant.clone();

        self.conn
            .call(move |conn| {
                let a = &stored;
                let (data, filename, mime, size, updated_at) =
                    attachment_params(a.signature.as_ref());
                conn.execute(
                    schema::INSERT_APPLICANT,
                    params![
                        a.center_id,
                        a.name,
                        a.surname,
                        a.file_number,
                        a.id_number,
                        a.cell_number,
                        a.file_status,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        a.audit.created_by,
                        a.audit.updated_by,
                        format_datetime(&a.audit.created_at),
                        format_datetime(&a.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Applicant"))
    }

    async fn update_applicant(&self, applicant: &Applicant) -> Result<()> {
        let a = applicant.clone();

        self.conn
            .call(move |conn| {
                let (data, filename, mime, size, updated_at) =
                    attachment_params(a.signature.as_ref());
                execute_existing(
                    conn,
                    schema::UPDATE_APPLICANT,
                    params![
                        a.id,
                        a.center_id,
                        a.name,
                        a.surname,
                        a.file_number,
                        a.id_number,
                        a.cell_number,
                        a.file_status,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        a.audit.updated_by,
                        format_datetime(&a.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Applicant", applicant.id))
    }

    async fn delete_applicant(&self, id: i64, center: CenterFilter) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_APPLICANT, params![id, center])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Applicant", id))
    }
}

// ============================================================================
// FinancialAssistanceRepository implementation
// ============================================================================

#[async_trait]
impl FinancialAssistanceRepository for SqliteRepository {
    async fn list_assistance(&self, center: CenterFilter) -> Result<Vec<FinancialAssistance>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_ASSISTANCE, [center], row_to_assistance)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "FinancialAssistance"))
    }

    async fn get_assistance(
        &self,
        id: i64,
        center: CenterFilter,
    ) -> Result<Option<FinancialAssistance>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_ASSISTANCE_BY_ID,
                    params![id, center],
                    row_to_assistance,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialAssistance", id))
    }

    async fn create_assistance(&self, record: &FinancialAssistance) -> Result<FinancialAssistance> {
        let mut stored = record.clone();

        self.conn
            .call(move |conn| {
                stored.id = insert_assistance(conn, &stored).map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "FinancialAssistance"))
    }

    async fn update_assistance(&self, record: &FinancialAssistance) -> Result<()> {
        let r = record.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    schema::UPDATE_ASSISTANCE,
                    params![
                        r.id,
                        r.file_id,
                        r.assistance_type,
                        r.financial_amount,
                        format_optional_date(r.date_of_assistance),
                        r.assisted_by,
                        r.sector,
                        r.program,
                        r.project,
                        r.give_to,
                        format_optional_date(r.starting_date),
                        format_optional_date(r.end_date),
                        r.frequency,
                        r.is_recurring,
                        r.center_id,
                        r.audit.updated_by,
                        format_datetime(&r.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialAssistance", record.id))
    }

    async fn delete_assistance(&self, id: i64, center: CenterFilter) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_ASSISTANCE, params![id, center])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialAssistance", id))
    }

    async fn list_active_templates(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<FinancialAssistance>> {
        let reference = format_date(&reference);

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_ACTIVE_TEMPLATES,
                    [&reference],
                    row_to_assistance,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "FinancialAssistance"))
    }

    async fn last_generated_date(&self, template_id: i64) -> Result<Option<NaiveDate>> {
        self.conn
            .call(move |conn| {
                let last: Option<String> = conn
                    .query_row(schema::SELECT_LAST_GENERATED_DATE, [template_id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                last.as_deref().map(parse_date).transpose().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialAssistance", template_id))
    }

    async fn occurrence_exists(&self, template_id: i64, date: NaiveDate) -> Result<bool> {
        let date = format_date(&date);

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_OCCURRENCE_EXISTS,
                    params![template_id, date],
                    |row| row.get(0),
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialAssistance", template_id))
    }

    async fn create_occurrence(
        &self,
        occurrence: &FinancialAssistance,
        log: &RecurringInvoiceLog,
    ) -> Result<FinancialAssistance> {
        let mut stored = occurrence.clone();
        let l = log.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                stored.id = insert_assistance(&tx, &stored).map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_RECURRING_LOG,
                    params![
                        l.applicant_id,
                        stored.id,
                        l.source_financial_aid_id,
                        format_optional_date(l.next_run_date),
                        l.frequency,
                        l.created_by_system,
                        l.center_id,
                        l.audit.created_by,
                        l.audit.updated_by,
                        format_datetime(&l.audit.created_at),
                        format_datetime(&l.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RecurringInvoiceLog"))
    }
}

// ============================================================================
// RecurringInvoiceLogRepository implementation
// ============================================================================

#[async_trait]
impl RecurringInvoiceLogRepository for SqliteRepository {
    async fn list_recurring_logs(
        &self,
        source_financial_aid_id: Option<i64>,
    ) -> Result<Vec<RecurringInvoiceLog>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_RECURRING_LOGS,
                    [source_financial_aid_id],
                    row_to_recurring_log,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "RecurringInvoiceLog"))
    }
}

// ============================================================================
// BoreholeRepository implementation
// ============================================================================

#[async_trait]
impl BoreholeRepository for SqliteRepository {
    async fn list_boreholes(
        &self,
        imam_profile_id: Option<i64>,
        center: CenterFilter,
    ) -> Result<Vec<Borehole>> {
        self.conn
            .call(move |conn| {
                let mut boreholes = query_all(
                    conn,
                    schema::SELECT_BOREHOLES,
                    params![imam_profile_id, center],
                    row_to_borehole,
                )
                .map_err(wrap_err)?;
                for borehole in &mut boreholes {
                    load_purposes(conn, borehole).map_err(wrap_err)?;
                }
                Ok(boreholes)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Borehole"))
    }

    async fn get_borehole(&self, id: i64, center: CenterFilter) -> Result<Option<Borehole>> {
        self.conn
            .call(move |conn| {
                let found = query_optional(
                    conn,
                    schema::SELECT_BOREHOLE_BY_ID,
                    params![id, center],
                    row_to_borehole,
                )
                .map_err(wrap_err)?;
                let Some(mut borehole) = found else {
                    return Ok(None);
                };
                load_purposes(conn, &mut borehole).map_err(wrap_err)?;
                Ok(Some(borehole))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Borehole", id))
    }

    async fn create_borehole(&self, borehole: &Borehole) -> Result<Borehole> {
        let mut stored = borehole.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let b = &stored;
                let (water, water_name, water_mime, water_size, water_at) =
                    attachment_params(b.current_water_source_image.as_ref());
                let (area, area_name, area_mime, area_size, area_at) =
                    attachment_params(b.masjid_area_image.as_ref());
                tx.execute(
                    schema::INSERT_BOREHOLE,
                    params![
                        b.imam_profile_id,
                        b.where_required,
                        b.has_electricity,
                        b.received_borehole_before,
                        b.current_water_source,
                        b.distance_to_water_source,
                        b.beneficiaries_count,
                        b.challenges_due_to_lack_of_water,
                        b.motivation,
                        b.longitude,
                        b.latitude,
                        b.acknowledge,
                        b.status_id,
                        b.comment,
                        water,
                        water_name,
                        water_mime,
                        water_size,
                        water_at,
                        area,
                        area_name,
                        area_mime,
                        area_size,
                        area_at,
                        b.center_id,
                        b.audit.created_by,
                        b.audit.updated_by,
                        format_datetime(&b.audit.created_at),
                        format_datetime(&b.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                save_purposes(&tx, id, &stored.water_usage_purpose_ids).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                stored.id = id;
                stored.water_usage_purpose_ids.sort_unstable();
                stored.water_usage_purpose_ids.dedup();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Borehole"))
    }

    async fn update_borehole(&self, borehole: &Borehole) -> Result<()> {
        let b = borehole.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let (water, water_name, water_mime, water_size, water_at) =
                    attachment_params(b.current_water_source_image.as_ref());
                let (area, area_name, area_mime, area_size, area_at) =
                    attachment_params(b.masjid_area_image.as_ref());
                execute_existing(
                    &tx,
                    schema::UPDATE_BOREHOLE,
                    params![
                        b.id,
                        b.imam_profile_id,
                        b.where_required,
                        b.has_electricity,
                        b.received_borehole_before,
                        b.current_water_source,
                        b.distance_to_water_source,
                        b.beneficiaries_count,
                        b.challenges_due_to_lack_of_water,
                        b.motivation,
                        b.longitude,
                        b.latitude,
                        b.acknowledge,
                        b.status_id,
                        b.comment,
                        water,
                        water_name,
                        water_mime,
                        water_size,
                        water_at,
                        area,
                        area_name,
                        area_mime,
                        area_size,
                        area_at,
                        b.center_id,
                        b.audit.updated_by,
                        format_datetime(&b.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                save_purposes(&tx, b.id, &b.water_usage_purpose_ids).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Borehole", borehole.id))
    }

    async fn delete_borehole(&self, id: i64, center: CenterFilter) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_BOREHOLE, params![id, center])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Borehole", id))
    }
}

// ============================================================================
// TicketRepository implementation
// ============================================================================

#[async_trait]
impl TicketRepository for SqliteRepository {
    async fn list_tickets(&self, center: CenterFilter) -> Result<Vec<Ticket>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_TICKETS, [center], row_to_ticket).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Ticket"))
    }

    async fn get_ticket(&self, id: i64, center: CenterFilter) -> Result<Option<Ticket>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_TICKET_BY_ID,
                    params![id, center],
                    row_to_ticket,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ticket", id))
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<Ticket> {
        let mut stored = ticket.clone();

        self.conn
            .call(move |conn| {
                let t = &stored;
                let (data, filename, mime, size, updated_at) = attachment_params(t.media.as_ref());
                conn.execute(
                    schema::INSERT_TICKET,
                    params![
                        t.title,
                        t.description,
                        t.classification_id,
                        t.status_id,
                        t.allocated_to,
                        format_optional_datetime(t.closed_at),
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        t.center_id,
                        t.audit.created_by,
                        t.audit.updated_by,
                        format_datetime(&t.audit.created_at),
                        format_datetime(&t.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Ticket"))
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<()> {
        let t = ticket.clone();

        self.conn
            .call(move |conn| {
                let (data, filename, mime, size, updated_at) = attachment_params(t.media.as_ref());
                execute_existing(
                    conn,
                    schema::UPDATE_TICKET,
                    params![
                        t.id,
                        t.title,
                        t.description,
                        t.classification_id,
                        t.status_id,
                        t.allocated_to,
                        format_optional_datetime(t.closed_at),
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        t.center_id,
                        t.audit.updated_by,
                        format_datetime(&t.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ticket", ticket.id))
    }

    async fn delete_ticket(&self, id: i64, center: CenterFilter) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_TICKET, params![id, center])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Ticket", id))
    }
}

// ============================================================================
// ConversationRepository implementation
// ============================================================================

#[async_trait]
impl ConversationRepository for SqliteRepository {
    async fn list_conversations_for(&self, employee_id: i64) -> Result<Vec<Conversation>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_CONVERSATIONS_FOR_EMPLOYEE,
                    [employee_id],
                    row_to_conversation,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Conversation"))
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_CONVERSATION_BY_ID,
                    [id],
                    row_to_conversation,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Conversation", id))
    }

    async fn create_conversation(
        &self,
        conversation: &Conversation,
        creator_id: i64,
    ) -> Result<Conversation> {
        let mut stored = conversation.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let c = &stored;
                tx.execute(
                    schema::INSERT_CONVERSATION,
                    params![
                        c.title,
                        c.kind.as_str(),
                        c.center_id,
                        c.audit.created_by,
                        c.audit.updated_by,
                        format_datetime(&c.audit.created_at),
                        format_datetime(&c.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = tx.last_insert_rowid();
                let creator =
                    ConversationParticipant::joining(stored.id, creator_id, stored.audit.clone());
                insert_participant(&tx, &creator).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Conversation"))
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<()> {
        let c = conversation.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    schema::UPDATE_CONVERSATION,
                    params![
                        c.id,
                        c.title,
                        c.kind.as_str(),
                        c.center_id,
                        c.audit.updated_by,
                        format_datetime(&c.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Conversation", conversation.id))
    }

    async fn delete_conversation(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_CONVERSATION, [id]).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Conversation", id))
    }

    async fn touch_conversation(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let at = format_datetime(&at);

        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::TOUCH_CONVERSATION, params![id, at])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Conversation", id))
    }
}

// ============================================================================
// ParticipantRepository implementation
// ============================================================================

#[async_trait]
impl ParticipantRepository for SqliteRepository {
    async fn list_participants(
        &self,
        conversation_id: Option<i64>,
    ) -> Result<Vec<ConversationParticipant>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_PARTICIPANTS,
                    [conversation_id],
                    row_to_participant,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ConversationParticipant"))
    }

    async fn get_participant(&self, id: i64) -> Result<Option<ConversationParticipant>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_PARTICIPANT_BY_ID,
                    [id],
                    row_to_participant,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ConversationParticipant", id))
    }

    async fn find_participant(
        &self,
        conversation_id: i64,
        employee_id: i64,
    ) -> Result<Option<ConversationParticipant>> {
        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_PARTICIPANT_BY_MEMBER,
                    [conversation_id, employee_id],
                    row_to_participant,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ConversationParticipant"))
    }

    async fn create_participant(
        &self,
        participant: &ConversationParticipant,
    ) -> Result<ConversationParticipant> {
        let mut stored = participant.clone();
        let member = format!("{}/{}", participant.conversation_id, participant.employee_id);

        self.conn
            .call(move |conn| {
                stored.id = insert_participant(conn, &stored).map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ConversationParticipant", member))
    }

    async fn update_participant(&self, participant: &ConversationParticipant) -> Result<()> {
        let p = participant.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    schema::UPDATE_PARTICIPANT,
                    params![
                        p.id,
                        p.conversation_id,
                        p.employee_id,
                        format_date(&p.joined_date),
                        format_optional_datetime(p.last_read_at),
                        format_optional_datetime(p.deleted_at),
                        format_optional_datetime(p.last_restored_at),
                        p.audit.updated_by,
                        format_datetime(&p.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "ConversationParticipant", participant.id)
            })
    }

    async fn delete_participant(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_PARTICIPANT, [id]).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ConversationParticipant", id))
    }
}

// ============================================================================
// MessageRepository implementation
// ============================================================================

#[async_trait]
impl MessageRepository for SqliteRepository {
    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_MESSAGES_BY_CONVERSATION,
                    [conversation_id],
                    row_to_message,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Message"))
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_MESSAGE_BY_ID, [id], row_to_message)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Message", id))
    }

    async fn create_message(&self, message: &Message) -> Result<Message> {
        let mut stored = message.clone();

        self.conn
            .call(move |conn| {
                let m = &stored;
                let (data, filename, mime, size, updated_at) =
                    attachment_params(m.attachment.as_ref());
                conn.execute(
                    schema::INSERT_MESSAGE,
                    params![
                        m.conversation_id,
                        m.sender_id,
                        m.message_text,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        read_status_to_str(m.read_status),
                        m.audit.created_by,
                        m.audit.updated_by,
                        format_datetime(&m.audit.created_at),
                        format_datetime(&m.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Message"))
    }

    async fn update_message(&self, message: &Message) -> Result<()> {
        let m = message.clone();

        self.conn
            .call(move |conn| {
                let (data, filename, mime, size, updated_at) =
                    attachment_params(m.attachment.as_ref());
                execute_existing(
                    conn,
                    schema::UPDATE_MESSAGE,
                    params![
                        m.id,
                        m.message_text,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        read_status_to_str(m.read_status),
                        m.audit.updated_by,
                        format_datetime(&m.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Message", message.id))
    }

    async fn delete_message(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_MESSAGE, [id]).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Message", id))
    }

    async fn list_receipts(&self, conversation_id: i64) -> Result<Vec<ReadReceipt>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_RECEIPTS_BY_CONVERSATION,
                    [conversation_id],
                    row_to_receipt,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ReadReceipt"))
    }

    async fn mark_read(
        &self,
        conversation_id: i64,
        employee_id: i64,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        let at = format_datetime(&at);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_MISSING_RECEIPTS,
                    params![conversation_id, employee_id, at],
                )
                .map_err(wrap_err)?;
                tx.execute(
                    schema::MARK_MESSAGES_READ,
                    params![conversation_id, employee_id],
                )
                .map_err(wrap_err)?;
                let held: i64 = tx
                    .query_row(
                        schema::COUNT_RECEIPTS_FOR_READER,
                        params![conversation_id, employee_id],
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(usize::try_from(held).unwrap_or_default())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Conversation", conversation_id))
    }
}

// ============================================================================
// FolderRepository implementation
// ============================================================================

#[async_trait]
impl FolderRepository for SqliteRepository {
    async fn list_folders(&self, owner: &str) -> Result<Vec<Folder>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_FOLDERS_BY_OWNER, [owner], row_to_folder)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Folder"))
    }

    async fn get_folder(&self, id: i64, owner: &str) -> Result<Option<Folder>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_FOLDER_BY_ID,
                    params![id, owner],
                    row_to_folder,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Folder", id))
    }

    async fn create_folder(&self, folder: &Folder) -> Result<Folder> {
        let mut stored = folder.clone();

        self.conn
            .call(move |conn| {
                let f = &stored;
                conn.execute(
                    schema::INSERT_FOLDER,
                    params![
                        f.name,
                        f.parent_id,
                        f.employee_id,
                        f.center_id,
                        f.audit.created_by,
                        f.audit.updated_by,
                        format_datetime(&f.audit.created_at),
                        format_datetime(&f.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Folder"))
    }

    async fn update_folder(&self, folder: &Folder) -> Result<()> {
        let f = folder.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    schema::UPDATE_FOLDER,
                    params![
                        f.id,
                        f.name,
                        f.parent_id,
                        f.employee_id,
                        f.center_id,
                        f.audit.updated_by,
                        format_datetime(&f.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Folder", folder.id))
    }

    async fn delete_folder(&self, id: i64, owner: &str) -> Result<()> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_FOLDER, params![id, owner]).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Folder", id))
    }
}

// ============================================================================
// PersonalFileRepository implementation
// ============================================================================

#[async_trait]
impl PersonalFileRepository for SqliteRepository {
    async fn list_personal_files(&self, owner: &str) -> Result<Vec<PersonalFile>> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_PERSONAL_FILES_BY_OWNER,
                    [owner],
                    row_to_personal_file,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "PersonalFile"))
    }

    async fn get_personal_file(
        &self,
        id: i64,
        owner: Option<&str>,
    ) -> Result<Option<PersonalFile>> {
        let owner = owner.map(str::to_string);

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_PERSONAL_FILE_BY_ID,
                    params![id, owner],
                    row_to_personal_file,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "PersonalFile", id))
    }

    async fn create_personal_file(&self, file: &PersonalFile) -> Result<PersonalFile> {
        let mut stored = file.clone();

        self.conn
            .call(move |conn| {
                let f = &stored;
                let (data, filename, mime, size, updated_at) = attachment_params(f.file.as_ref());
                conn.execute(
                    schema::INSERT_PERSONAL_FILE,
                    params![
                        f.name,
                        f.folder_id,
                        f.employee_id,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        f.center_id,
                        f.audit.created_by,
                        f.audit.updated_by,
                        format_datetime(&f.audit.created_at),
                        format_datetime(&f.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "PersonalFile"))
    }

    async fn update_personal_file(&self, file: &PersonalFile) -> Result<()> {
        let f = file.clone();

        self.conn
            .call(move |conn| {
                let (data, filename, mime, size, updated_at) = attachment_params(f.file.as_ref());
                execute_existing(
                    conn,
                    schema::UPDATE_PERSONAL_FILE,
                    params![
                        f.id,
                        f.name,
                        f.folder_id,
                        f.employee_id,
                        data,
                        filename,
                        mime,
                        size,
                        updated_at,
                        f.center_id,
                        f.audit.updated_by,
                        format_datetime(&f.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "PersonalFile", file.id))
    }

    async fn delete_personal_file(&self, id: i64, owner: &str) -> Result<()> {
        let owner = owner.to_string();

        self.conn
            .call(move |conn| {
                execute_existing(conn, schema::DELETE_PERSONAL_FILE, params![id, owner])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "PersonalFile", id))
    }
}

// ============================================================================
// LookupRepository implementation
// ============================================================================

#[async_trait]
impl LookupRepository for SqliteRepository {
    async fn list_lookups(&self, table: &str, order_by_name: bool) -> Result<Vec<LookupRow>> {
        let sql = schema::select_lookups(table, order_by_name);

        self.conn
            .call(move |conn| query_all(conn, &sql, [], row_to_lookup).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Lookup"))
    }

    async fn get_lookup(&self, table: &str, id: i64) -> Result<Option<LookupRow>> {
        let sql = schema::select_lookup_by_id(table);

        self.conn
            .call(move |conn| query_optional(conn, &sql, [id], row_to_lookup).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Lookup", id))
    }

    async fn create_lookup(&self, table: &str, row: &LookupRow) -> Result<LookupRow> {
        let sql = schema::insert_lookup(table);
        let mut stored = row.clone();

        self.conn
            .call(move |conn| {
                let r = &stored;
                conn.execute(
                    &sql,
                    params![
                        r.name,
                        extra_to_json(&r.extra),
                        r.audit.created_by,
                        r.audit.updated_by,
                        format_datetime(&r.audit.created_at),
                        format_datetime(&r.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                stored.id = conn.last_insert_rowid();
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Lookup"))
    }

    async fn update_lookup(&self, table: &str, row: &LookupRow) -> Result<()> {
        let sql = schema::update_lookup(table);
        let r = row.clone();

        self.conn
            .call(move |conn| {
                execute_existing(
                    conn,
                    &sql,
                    params![
                        r.id,
                        r.name,
                        extra_to_json(&r.extra),
                        r.audit.updated_by,
                        format_datetime(&r.audit.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Lookup", row.id))
    }

    async fn delete_lookup(&self, table: &str, id: i64) -> Result<()> {
        let sql = schema::delete_lookup(table);

        self.conn
            .call(move |conn| execute_existing(conn, &sql, [id]).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Lookup", id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::{json, Map};
    use welfare_core::attachment::Attachment;
    use welfare_core::audit::Audit;
    use welfare_core::messaging::{ConversationKind, ReadStatus};

    use super::*;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, minute, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(username: &str, center_id: Option<i64>) -> Employee {
        Employee {
            id: 0,
            center_id,
            name: "Bilal".to_string(),
            surname: "Osman".to_string(),
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            user_type: 3,
            email: Some("bilal@example.org".to_string()),
            contact_number: None,
            department: Some(2),
            audit: Audit::new("admin", at(0)),
        }
    }

    fn borehole(imam_profile_id: i64, purposes: Vec<i64>) -> Borehole {
        Borehole {
            id: 0,
            imam_profile_id,
            where_required: Some(1),
            has_electricity: Some(1),
            received_borehole_before: None,
            current_water_source: Some(2),
            distance_to_water_source: Some("2km".to_string()),
            beneficiaries_count: Some(120),
            challenges_due_to_lack_of_water: None,
            motivation: None,
            longitude: Some(28.04),
            latitude: Some(-26.2),
            acknowledge: true,
            status_id: None,
            comment: None,
            water_usage_purpose_ids: purposes,
            current_water_source_image: Some(Attachment::new(
                vec![0xff, 0xd8, 0xff],
                Some("river.jpg".to_string()),
                Some("image/jpeg".to_string()),
                at(1),
            )),
            masjid_area_image: None,
            center_id: Some(1),
            audit: Audit::new("imam", at(1)),
        }
    }

    fn message(conversation_id: i64, sender_id: i64, minute: u32) -> Message {
        Message {
            id: 0,
            conversation_id,
            sender_id,
            message_text: Some(format!("message at {minute}")),
            attachment: None,
            read_status: ReadStatus::Unread,
            audit: Audit::new("sender", at(minute)),
        }
    }

    #[tokio::test]
    async fn test_employee_round_trip_and_scope() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let created = repo.create_employee(&employee("bilal", Some(2))).await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = repo.get_employee(created.id, None).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_employee(created.id, Some(1)).await.unwrap().is_none());
        assert_eq!(
            repo.get_employee_by_username("bilal").await.unwrap(),
            Some(created.clone())
        );

        let mut updated = created.clone();
        updated.email = None;
        repo.update_employee(&updated).await.unwrap();
        assert_eq!(repo.get_employee(1, Some(2)).await.unwrap().unwrap().email, None);

        assert!(matches!(
            repo.create_employee(&employee("bilal", None)).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));
        assert!(matches!(
            repo.delete_employee(1, Some(1)).await,
            Err(RepositoryError::NotFound { .. })
        ));
        repo.delete_employee(1, Some(2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_employees_by_ids_skips_missing() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_employee(&employee("a", None)).await.unwrap();
        repo.create_employee(&employee("b", None)).await.unwrap();

        let found = repo.get_employees_by_ids(&[2, 9, 1]).await.unwrap();
        let usernames: Vec<&str> = found.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(usernames, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let mut ghost = employee("ghost", None);
        ghost.id = 42;
        assert_eq!(
            repo.update_employee(&ghost).await,
            Err(RepositoryError::NotFound {
                entity_type: "Employee",
                id: "42".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_borehole_purposes_and_images() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let first = repo.create_borehole(&borehole(5, vec![3, 1, 3])).await.unwrap();
        let second = repo.create_borehole(&borehole(6, vec![])).await.unwrap();
        assert_eq!(first.water_usage_purpose_ids, vec![1, 3]);

        let fetched = repo.get_borehole(first.id, Some(1)).await.unwrap().unwrap();
        assert_eq!(fetched.water_usage_purpose_ids, vec![1, 3]);
        let image = fetched.current_water_source_image.unwrap();
        assert_eq!(image.data, vec![0xff, 0xd8, 0xff]);
        assert_eq!(image.filename.as_deref(), Some("river.jpg"));
        assert_eq!(image.size, Some(3));
        assert!(fetched.masjid_area_image.is_none());

        let all = repo.list_boreholes(None, None).await.unwrap();
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        let for_imam = repo.list_boreholes(Some(5), None).await.unwrap();
        assert_eq!(for_imam.len(), 1);

        let mut changed = first.clone();
        changed.water_usage_purpose_ids = vec![2];
        repo.update_borehole(&changed).await.unwrap();
        let fetched = repo.get_borehole(first.id, None).await.unwrap().unwrap();
        assert_eq!(fetched.water_usage_purpose_ids, vec![2]);

        repo.delete_borehole(first.id, None).await.unwrap();
        assert!(repo.get_borehole(first.id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recurring_generation_queries() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let template = FinancialAssistance {
            id: 0,
            file_id: 11,
            assistance_type: Some(1),
            financial_amount: Some(500.0),
            date_of_assistance: Some(date(2025, 1, 15)),
            assisted_by: None,
            sector: None,
            program: None,
            project: None,
            give_to: Some("Applicant".to_string()),
            starting_date: Some(date(2025, 1, 15)),
            end_date: Some(date(2025, 4, 15)),
            frequency: Some("monthly".to_string()),
            is_recurring: true,
            is_auto_generated: false,
            recurring_source_id: None,
            center_id: Some(1),
            audit: Audit::new("admin", at(0)),
        };
        let stored = repo.create_assistance(&template).await.unwrap();

        assert_eq!(repo.list_active_templates(date(2025, 2, 1)).await.unwrap().len(), 1);
        assert!(repo
            .list_active_templates(date(2025, 5, 1))
            .await
            .unwrap()
            .is_empty());

        let mut occurrence = stored.clone();
        occurrence.date_of_assistance = Some(date(2025, 2, 15));
        occurrence.is_recurring = false;
        occurrence.is_auto_generated = true;
        occurrence.recurring_source_id = Some(stored.id);
        let log = RecurringInvoiceLog {
            id: 0,
            applicant_id: 11,
            financial_aid_id: 0,
            source_financial_aid_id: stored.id,
            next_run_date: Some(date(2025, 3, 15)),
            frequency: "monthly".to_string(),
            created_by_system: true,
            center_id: Some(1),
            audit: Audit::new("system", at(0)),
        };
        let created = repo.create_occurrence(&occurrence, &log).await.unwrap();

        assert_eq!(
            repo.last_generated_date(stored.id).await.unwrap(),
            Some(date(2025, 2, 15))
        );
        assert!(repo.occurrence_exists(stored.id, date(2025, 2, 15)).await.unwrap());
        assert!(!repo.occurrence_exists(stored.id, date(2025, 1, 15)).await.unwrap());
        assert_eq!(repo.list_active_templates(date(2025, 2, 1)).await.unwrap().len(), 1);

        let mut next = occurrence.clone();
        next.date_of_assistance = Some(date(2025, 3, 15));
        let next_log = RecurringInvoiceLog {
            next_run_date: Some(date(2025, 4, 15)),
            ..log.clone()
        };
        let newest = repo.create_occurrence(&next, &next_log).await.unwrap();

        let logs = repo.list_recurring_logs(Some(stored.id)).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].financial_aid_id, newest.id);
        assert_eq!(logs[1].financial_aid_id, created.id);
        assert_eq!(logs[1].next_run_date, Some(date(2025, 3, 15)));
    }

    #[tokio::test]
    async fn test_conversation_cascade_and_receipts() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let conversation = Conversation {
            id: 0,
            title: Some("Food parcels".to_string()),
            kind: ConversationKind::Group,
            center_id: Some(1),
            audit: Audit::new("bilal", at(0)),
        };
        let stored = repo.create_conversation(&conversation, 1).await.unwrap();
        assert_eq!(repo.list_participants(Some(stored.id)).await.unwrap().len(), 1);

        let other = ConversationParticipant::joining(stored.id, 2, Audit::new("bilal", at(0)));
        repo.create_participant(&other).await.unwrap();
        assert!(matches!(
            repo.create_participant(&other).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));

        // Inserted out of order; listing is by creation time.
        repo.create_message(&message(stored.id, 1, 9)).await.unwrap();
        repo.create_message(&message(stored.id, 2, 3)).await.unwrap();
        let listed = repo.list_messages(stored.id).await.unwrap();
        assert_eq!(listed[0].audit.created_at, at(3));

        assert_eq!(repo.mark_read(stored.id, 2, at(10)).await.unwrap(), 1);
        // The count covers every receipt held, not only the new ones.
        assert_eq!(repo.mark_read(stored.id, 2, at(11)).await.unwrap(), 1);
        assert_eq!(repo.mark_read(stored.id, 1, at(12)).await.unwrap(), 1);
        let receipts = repo.list_receipts(stored.id).await.unwrap();
        assert_eq!(receipts.len(), 2);
        let bilal = receipts.iter().find(|r| r.employee_id == 2).unwrap();
        assert_eq!(bilal.read_at, at(10));

        repo.touch_conversation(stored.id, at(0) + Duration::hours(1))
            .await
            .unwrap();
        let mine = repo.list_conversations_for(2).await.unwrap();
        assert_eq!(mine[0].audit.updated_at, at(0) + Duration::hours(1));

        repo.delete_conversation(stored.id).await.unwrap();
        assert!(repo.list_messages(stored.id).await.unwrap().is_empty());
        assert!(repo.list_participants(Some(stored.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_requires_conversation() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        assert!(matches!(
            repo.create_message(&message(99, 1, 0)).await,
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_extra_columns_survive() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let mut fields = Map::new();
        fields.insert("name".into(), json!("Intentions"));
        fields.insert("hadith_arabic".into(), json!("إنما الأعمال بالنيات"));
        let created = repo
            .create_lookup("Hadith", &LookupRow::from_fields(fields, Audit::new("hq", at(0))))
            .await
            .unwrap();

        let fetched = repo.get_lookup("Hadith", created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let mut water = Map::new();
        water.insert("name".into(), json!("River"));
        repo.create_lookup("Water_Source", &LookupRow::from_fields(water, Audit::new("hq", at(0))))
            .await
            .unwrap();
        let mut water = Map::new();
        water.insert("name".into(), json!("Borehole"));
        repo.create_lookup("Water_Source", &LookupRow::from_fields(water, Audit::new("hq", at(0))))
            .await
            .unwrap();

        let ordered = repo.list_lookups("Water_Source", true).await.unwrap();
        assert_eq!(ordered[0].name.as_deref(), Some("Borehole"));
        let by_id = repo.list_lookups("Water_Source", false).await.unwrap();
        assert_eq!(by_id[0].name.as_deref(), Some("River"));

        assert!(matches!(
            repo.delete_lookup("Water_Source", 99).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_manager_ownership_and_folder_delete() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let folder = |name: &str, minute: u32, parent_id: Option<i64>| Folder {
            id: 0,
            name: name.to_string(),
            parent_id,
            employee_id: Some(4),
            center_id: Some(1),
            audit: Audit::new("zaid", at(minute)),
        };

        let hr = repo.create_folder(&folder("HR", 0, None)).await.unwrap();
        let payslips = repo.create_folder(&folder("Payslips", 5, Some(hr.id))).await.unwrap();
        assert!(matches!(
            repo.create_folder(&folder("Orphan", 6, Some(99))).await,
            Err(RepositoryError::InvalidData(_))
        ));

        let listed = repo.list_folders("zaid").await.unwrap();
        assert_eq!(listed, vec![payslips.clone(), hr.clone()]);
        assert!(repo.list_folders("amina").await.unwrap().is_empty());
        assert!(repo.get_folder(hr.id, "amina").await.unwrap().is_none());

        let stored = repo
            .create_personal_file(&PersonalFile {
                id: 0,
                name: "March payslip".to_string(),
                folder_id: Some(payslips.id),
                employee_id: Some(4),
                file: Some(Attachment::new(
                    b"%PDF-1.7".to_vec(),
                    Some("march.pdf".to_string()),
                    Some("application/pdf".to_string()),
                    at(7),
                )),
                center_id: Some(1),
                audit: Audit::new("zaid", at(7)),
            })
            .await
            .unwrap();

        let fetched = repo.get_personal_file(stored.id, None).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(repo
            .get_personal_file(stored.id, Some("amina"))
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            repo.delete_personal_file(stored.id, "amina").await,
            Err(RepositoryError::NotFound { .. })
        ));

        repo.delete_folder(payslips.id, "zaid").await.unwrap();
        let fetched = repo.get_personal_file(stored.id, Some("zaid")).await.unwrap().unwrap();
        assert_eq!(fetched.folder_id, None);
        assert_eq!(fetched.file.unwrap().data, b"%PDF-1.7".to_vec());

        repo.delete_personal_file(stored.id, "zaid").await.unwrap();
        assert!(repo.list_personal_files("zaid").await.unwrap().is_empty());
    }
}
