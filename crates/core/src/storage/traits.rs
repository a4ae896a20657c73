use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::assistance::{FinancialAssistance, RecurringInvoiceLog};
use crate::files::{Folder, PersonalFile};
use crate::lookup::LookupRow;
use crate::messaging::{Conversation, ConversationParticipant, Message, ReadReceipt};
use crate::outreach::{Borehole, Ticket};
use crate::people::{Applicant, Employee};

use super::{CenterFilter, Result};

// Conventions shared by every repository below:
// - `create_*` ignores the incoming id and returns the stored row.
// - `get_*` and `list_*` hide rows outside `center`.
// - `update_*` and `delete_*` fail with `NotFound` when the row is missing
//   or, where a center is taken, outside it.

/// Repository for employees, who are also the login principals.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list_employees(&self, center: CenterFilter) -> Result<Vec<Employee>>;

    async fn get_employee(&self, id: i64, center: CenterFilter) -> Result<Option<Employee>>;

    /// Gets an employee by login name, across all centers.
    async fn get_employee_by_username(&self, username: &str) -> Result<Option<Employee>>;

    /// Gets the employees with the given ids. Unknown ids are skipped.
    async fn get_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>>;

    /// Creates an employee. Fails with `AlreadyExists` on a taken username.
    async fn create_employee(&self, employee: &Employee) -> Result<Employee>;

    async fn update_employee(&self, employee: &Employee) -> Result<()>;

    async fn delete_employee(&self, id: i64, center: CenterFilter) -> Result<()>;
}

/// Repository for applicant files.
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    async fn list_applicants(&self, center: CenterFilter) -> Result<Vec<Applicant>>;

    async fn get_applicant(&self, id: i64, center: CenterFilter) -> Result<Option<Applicant>>;

    async fn create_applicant(&self, applicant: &Applicant) -> Result<Applicant>;

    async fn update_applicant(&self, applicant: &Applicant) -> Result<()>;

    async fn delete_applicant(&self, id: i64, center: CenterFilter) -> Result<()>;
}

/// Repository for financial assistance rows, recurring templates included.
#[async_trait]
pub trait FinancialAssistanceRepository: Send + Sync {
    async fn list_assistance(&self, center: CenterFilter) -> Result<Vec<FinancialAssistance>>;

    async fn get_assistance(
        &self,
        id: i64,
        center: CenterFilter,
    ) -> Result<Option<FinancialAssistance>>;

    async fn create_assistance(&self, record: &FinancialAssistance) -> Result<FinancialAssistance>;

    async fn update_assistance(&self, record: &FinancialAssistance) -> Result<()>;

    async fn delete_assistance(&self, id: i64, center: CenterFilter) -> Result<()>;

    /// Recurring templates whose date range covers `reference`, ordered by id.
    async fn list_active_templates(&self, reference: NaiveDate)
        -> Result<Vec<FinancialAssistance>>;

    /// Latest `date_of_assistance` over a template and its generated rows.
    async fn last_generated_date(&self, template_id: i64) -> Result<Option<NaiveDate>>;

    /// Whether an occurrence of `template_id` already exists on `date`.
    async fn occurrence_exists(&self, template_id: i64, date: NaiveDate) -> Result<bool>;

    /// Stores a generated occurrence and its log entry in one write.
    ///
    /// The log's `financial_aid_id` is set to the new occurrence id.
    async fn create_occurrence(
        &self,
        occurrence: &FinancialAssistance,
        log: &RecurringInvoiceLog,
    ) -> Result<FinancialAssistance>;
}

/// Read access to the recurring generation log.
#[async_trait]
pub trait RecurringInvoiceLogRepository: Send + Sync {
    /// Log entries for one template, or all of them, newest first.
    async fn list_recurring_logs(
        &self,
        source_financial_aid_id: Option<i64>,
    ) -> Result<Vec<RecurringInvoiceLog>>;
}

/// Repository for borehole requests and their water-usage purposes.
#[async_trait]
pub trait BoreholeRepository: Send + Sync {
    /// Lists boreholes newest first, optionally for one imam profile.
    async fn list_boreholes(
        &self,
        imam_profile_id: Option<i64>,
        center: CenterFilter,
    ) -> Result<Vec<Borehole>>;

    async fn get_borehole(&self, id: i64, center: CenterFilter) -> Result<Option<Borehole>>;

    /// Creates a borehole and its purpose rows together.
    async fn create_borehole(&self, borehole: &Borehole) -> Result<Borehole>;

    /// Updates a borehole, replacing its purpose rows.
    async fn update_borehole(&self, borehole: &Borehole) -> Result<()>;

    async fn delete_borehole(&self, id: i64, center: CenterFilter) -> Result<()>;
}

/// Repository for support tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Lists tickets newest first.
    async fn list_tickets(&self, center: CenterFilter) -> Result<Vec<Ticket>>;

    async fn get_ticket(&self, id: i64, center: CenterFilter) -> Result<Option<Ticket>>;

    async fn create_ticket(&self, ticket: &Ticket) -> Result<Ticket>;

    async fn update_ticket(&self, ticket: &Ticket) -> Result<()>;

    async fn delete_ticket(&self, id: i64, center: CenterFilter) -> Result<()>;
}

/// Repository for conversations.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Conversations `employee_id` participates in and has not deleted,
    /// most recently updated first.
    async fn list_conversations_for(&self, employee_id: i64) -> Result<Vec<Conversation>>;

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>>;

    /// Creates a conversation with `creator_id` as its first participant.
    async fn create_conversation(
        &self,
        conversation: &Conversation,
        creator_id: i64,
    ) -> Result<Conversation>;

    async fn update_conversation(&self, conversation: &Conversation) -> Result<()>;

    /// Deletes a conversation with its participants, messages and receipts.
    async fn delete_conversation(&self, id: i64) -> Result<()>;

    /// Sets `updated_at` without touching anything else.
    async fn touch_conversation(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}

/// Repository for conversation membership rows.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn list_participants(
        &self,
        conversation_id: Option<i64>,
    ) -> Result<Vec<ConversationParticipant>>;

    async fn get_participant(&self, id: i64) -> Result<Option<ConversationParticipant>>;

    async fn find_participant(
        &self,
        conversation_id: i64,
        employee_id: i64,
    ) -> Result<Option<ConversationParticipant>>;

    /// Adds a participant. Fails with `AlreadyExists` when the employee is
    /// already in the conversation.
    async fn create_participant(
        &self,
        participant: &ConversationParticipant,
    ) -> Result<ConversationParticipant>;

    async fn update_participant(&self, participant: &ConversationParticipant) -> Result<()>;

    async fn delete_participant(&self, id: i64) -> Result<()>;
}

/// Repository for messages and read receipts.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Messages of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>>;

    async fn get_message(&self, id: i64) -> Result<Option<Message>>;

    async fn create_message(&self, message: &Message) -> Result<Message>;

    async fn update_message(&self, message: &Message) -> Result<()>;

    async fn delete_message(&self, id: i64) -> Result<()>;

    /// Receipts for every message of a conversation.
    async fn list_receipts(&self, conversation_id: i64) -> Result<Vec<ReadReceipt>>;

    /// Records receipts for the messages `employee_id` did not send and
    /// flags them read. Returns how many receipts the employee now holds in
    /// the conversation, earlier ones included.
    async fn mark_read(
        &self,
        conversation_id: i64,
        employee_id: i64,
        at: DateTime<Utc>,
    ) -> Result<usize>;
}

/// Repository for file manager folders.
///
/// Folders are private to their creator: `owner` is matched against
/// `created_by` instead of scoping by center.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Lists the owner's folders, newest first.
    async fn list_folders(&self, owner: &str) -> Result<Vec<Folder>>;

    async fn get_folder(&self, id: i64, owner: &str) -> Result<Option<Folder>>;

    async fn create_folder(&self, folder: &Folder) -> Result<Folder>;

    async fn update_folder(&self, folder: &Folder) -> Result<()>;

    /// Deletes a folder. Its subfolders and files move to the top level.
    async fn delete_folder(&self, id: i64, owner: &str) -> Result<()>;
}

/// Repository for files stored in the file manager.
#[async_trait]
pub trait PersonalFileRepository: Send + Sync {
    /// Lists the owner's files, newest first.
    async fn list_personal_files(&self, owner: &str) -> Result<Vec<PersonalFile>>;

    /// Gets a file, restricted to `owner` when one is given.
    async fn get_personal_file(&self, id: i64, owner: Option<&str>)
        -> Result<Option<PersonalFile>>;

    async fn create_personal_file(&self, file: &PersonalFile) -> Result<PersonalFile>;

    async fn update_personal_file(&self, file: &PersonalFile) -> Result<()>;

    async fn delete_personal_file(&self, id: i64, owner: &str) -> Result<()>;
}

/// Repository over the allowlisted lookup tables.
///
/// Table names are validated by the caller against
/// [`crate::lookup::LOOKUP_TABLES`].
#[async_trait]
pub trait LookupRepository: Send + Sync {
    /// Lists a table, ordered by name when `order_by_name`, else by id.
    async fn list_lookups(&self, table: &str, order_by_name: bool) -> Result<Vec<LookupRow>>;

    async fn get_lookup(&self, table: &str, id: i64) -> Result<Option<LookupRow>>;

    async fn create_lookup(&self, table: &str, row: &LookupRow) -> Result<LookupRow>;

    async fn update_lookup(&self, table: &str, row: &LookupRow) -> Result<()>;

    async fn delete_lookup(&self, table: &str, id: i64) -> Result<()>;
}
