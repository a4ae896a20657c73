//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use welfare_core::assistance::{is_active_template, FinancialAssistance, RecurringInvoiceLog};
use welfare_core::files::{Folder, PersonalFile};
use welfare_core::lookup::LookupRow;
use welfare_core::messaging::{
    Conversation, ConversationParticipant, Message, ReadReceipt, ReadStatus,
};
use welfare_core::outreach::{Borehole, Ticket};
use welfare_core::people::{Applicant, Employee};
use welfare_core::storage::{
    ApplicantRepository, BoreholeRepository, CenterFilter, ConversationRepository,
    EmployeeRepository, FinancialAssistanceRepository, FolderRepository, LookupRepository,
    MessageRepository, ParticipantRepository, PersonalFileRepository,
    RecurringInvoiceLogRepository, RepositoryError, Result, TicketRepository,
};

use super::table::{not_found, Table};

type Shared<T> = Arc<RwLock<T>>;

/// In-memory storage backend for testing.
///
/// Methods that hold several locks take them in field order, so
/// `conversations` before `participants` before `messages` before `receipts`,
/// and `folders` before `personal_files`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    employees: Shared<Table<Employee>>,
    applicants: Shared<Table<Applicant>>,
    assistance: Shared<Table<FinancialAssistance>>,
    recurring_logs: Shared<Table<RecurringInvoiceLog>>,
    boreholes: Shared<Table<Borehole>>,
    tickets: Shared<Table<Ticket>>,
    conversations: Shared<Table<Conversation>>,
    participants: Shared<Table<ConversationParticipant>>,
    messages: Shared<Table<Message>>,
    /// Keyed by (message_id, employee_id).
    receipts: Shared<BTreeMap<(i64, i64), ReadReceipt>>,
    lookups: Shared<HashMap<String, Table<LookupRow>>>,
    folders: Shared<Table<Folder>>,
    personal_files: Shared<Table<PersonalFile>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn foreign_key_violation(entity: &str, id: i64) -> RepositoryError {
    RepositoryError::InvalidData(format!("{entity} {id} does not exist"))
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn list_employees(&self, center: CenterFilter) -> Result<Vec<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.scoped(center).cloned().collect())
    }

    async fn get_employee(&self, id: i64, center: CenterFilter) -> Result<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.get_scoped(id, center).cloned())
    }

    async fn get_employee_by_username(&self, username: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().await;
        let found = employees.values().find(|e| e.username == username).cloned();
        Ok(found)
    }

    async fn get_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>> {
        let employees = self.employees.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| employees.get(*id))
            .cloned()
            .collect())
    }

    async fn create_employee(&self, employee: &Employee) -> Result<Employee> {
        let mut employees = self.employees.write().await;
        if employees.values().any(|e| e.username == employee.username) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Employee",
                id: employee.username.clone(),
            });
        }
        Ok(employees.insert(employee))
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let mut employees = self.employees.write().await;
        if employees
            .values()
            .any(|e| e.username == employee.username && e.id != employee.id)
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Employee",
                id: employee.username.clone(),
            });
        }
        employees.replace(employee)
    }

    async fn delete_employee(&self, id: i64, center: CenterFilter) -> Result<()> {
        let mut employees = self.employees.write().await;
        employees.remove_scoped(id, center).map(|_| ())
    }
}

#[async_trait]
impl ApplicantRepository for InMemoryRepository {
    async fn list_applicants(&self, center: CenterFilter) -> Result<Vec<Applicant>> {
        let applicants = self.applicants.read().await;
        Ok(applicants.scoped(center).cloned().collect())
    }

    async fn get_applicant(&self, id: i64, center: CenterFilter) -> Result<Option<Applicant>> {
        let applicants = self.applicants.read().await;
        Ok(applicants.get_scoped(id, center).cloned())
    }

    async fn create_applicant(&self, applicant: &Applicant) -> Result<Applicant> {
        let mut applicants = self.applicants.write().await;
        Ok(applicants.insert(applicant))
    }

    async fn update_applicant(&self, applicant: &Applicant) -> Result<()> {
        self.applicants.write().await.replace(applicant)
    }

    async fn delete_applicant(&self, id: i64, center: CenterFilter) -> Result<()> {
        let mut applicants = self.applicants.write().await;
        applicants.remove_scoped(id, center).map(|_| ())
    }
}

#[async_trait]
impl FinancialAssistanceRepository for InMemoryRepository {
    async fn list_assistance(&self, center: CenterFilter) -> Result<Vec<FinancialAssistance>> {
        let assistance = self.assistance.read().await;
        Ok(assistance.scoped(center).cloned().collect())
    }

    async fn get_assistance(
        &self,
        id: i64,
        center: CenterFilter,
    ) -> Result<Option<FinancialAssistance>> {
        let assistance = self.assistance.read().await;
        Ok(assistance.get_scoped(id, center).cloned())
    }

    async fn create_assistance(&self, record: &FinancialAssistance) -> Result<FinancialAssistance> {
        let mut assistance = self.assistance.write().await;
        Ok(assistance.insert(record))
    }

    async fn update_assistance(&self, record: &FinancialAssistance) -> Result<()> {
        self.assistance.write().await.replace(record)
    }

    async fn delete_assistance(&self, id: i64, center: CenterFilter) -> Result<()> {
        let mut assistance = self.assistance.write().await;
        assistance.remove_scoped(id, center)?;
        self.recurring_logs
            .write()
            .await
            .retain(|_, log| log.financial_aid_id != id && log.source_financial_aid_id != id);
        Ok(())
    }

    async fn list_active_templates(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<FinancialAssistance>> {
        let assistance = self.assistance.read().await;
        Ok(assistance
            .values()
            .filter(|record| is_active_template(record, reference))
            .cloned()
            .collect())
    }

    async fn last_generated_date(&self, template_id: i64) -> Result<Option<NaiveDate>> {
        let assistance = self.assistance.read().await;
        Ok(assistance
            .values()
            .filter(|r| r.id == template_id || r.recurring_source_id == Some(template_id))
            .filter_map(|r| r.date_of_assistance)
            .max())
    }

    async fn occurrence_exists(&self, template_id: i64, date: NaiveDate) -> Result<bool> {
        let assistance = self.assistance.read().await;
        let exists = assistance.values().any(|r| {
            r.recurring_source_id == Some(template_id) && r.date_of_assistance == Some(date)
        });
        Ok(exists)
    }

    async fn create_occurrence(
        &self,
        occurrence: &FinancialAssistance,
        log: &RecurringInvoiceLog,
    ) -> Result<FinancialAssistance> {
        let mut assistance = self.assistance.write().await;
        let mut logs = self.recurring_logs.write().await;

        let stored = assistance.insert(occurrence);
        let mut log = log.clone();
        log.financial_aid_id = stored.id;
        logs.insert(&log);
        Ok(stored)
    }
}

#[async_trait]
impl RecurringInvoiceLogRepository for InMemoryRepository {
    async fn list_recurring_logs(
        &self,
        source_financial_aid_id: Option<i64>,
    ) -> Result<Vec<RecurringInvoiceLog>> {
        let logs = self.recurring_logs.read().await;
        Ok(logs
            .values()
            .rev()
            .filter(|log| {
                source_financial_aid_id.is_none_or(|id| log.source_financial_aid_id == id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BoreholeRepository for InMemoryRepository {
    async fn list_boreholes(
        &self,
        imam_profile_id: Option<i64>,
        center: CenterFilter,
    ) -> Result<Vec<Borehole>> {
        let boreholes = self.boreholes.read().await;
        Ok(boreholes
            .scoped(center)
            .rev()
            .filter(|b| imam_profile_id.is_none_or(|id| b.imam_profile_id == id))
            .cloned()
            .collect())
    }

    async fn get_borehole(&self, id: i64, center: CenterFilter) -> Result<Option<Borehole>> {
        let boreholes = self.boreholes.read().await;
        Ok(boreholes.get_scoped(id, center).cloned())
    }

    async fn create_borehole(&self, borehole: &Borehole) -> Result<Borehole> {
        let mut boreholes = self.boreholes.write().await;
        Ok(boreholes.insert(borehole))
    }

    async fn update_borehole(&self, borehole: &Borehole) -> Result<()> {
        self.boreholes.write().await.replace(borehole)
    }

    async fn delete_borehole(&self, id: i64, center: CenterFilter) -> Result<()> {
        let mut boreholes = self.boreholes.write().await;
        boreholes.remove_scoped(id, center).map(|_| ())
    }
}

#[async_trait]
impl TicketRepository for InMemoryRepository {
    async fn list_tickets(&self, center: CenterFilter) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets.scoped(center).rev().cloned().collect())
    }

    async fn get_ticket(&self, id: i64, center: CenterFilter) -> Result<Option<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets.get_scoped(id, center).cloned())
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        Ok(tickets.insert(ticket))
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.tickets.write().await.replace(ticket)
    }

    async fn delete_ticket(&self, id: i64, center: CenterFilter) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        tickets.remove_scoped(id, center).map(|_| ())
    }
}

#[async_trait]
impl ConversationRepository for InMemoryRepository {
    async fn list_conversations_for(&self, employee_id: i64) -> Result<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let participants = self.participants.read().await;

        let active: HashSet<i64> = participants
            .values()
            .filter(|p| p.employee_id == employee_id && p.deleted_at.is_none())
            .map(|p| p.conversation_id)
            .collect();

        let mut result: Vec<Conversation> = conversations
            .values()
            .filter(|c| active.contains(&c.id))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.audit
                .updated_at
                .cmp(&a.audit.updated_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(result)
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(id).cloned())
    }

    async fn create_conversation(
        &self,
        conversation: &Conversation,
        creator_id: i64,
    ) -> Result<Conversation> {
        let mut conversations = self.conversations.write().await;
        let mut participants = self.participants.write().await;

        let stored = conversations.insert(conversation);
        participants.insert(&ConversationParticipant::joining(
            stored.id,
            creator_id,
            stored.audit.clone(),
        ));
        Ok(stored)
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<()> {
        self.conversations.write().await.replace(conversation)
    }

    async fn delete_conversation(&self, id: i64) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        let mut participants = self.participants.write().await;
        let mut messages = self.messages.write().await;
        let mut receipts = self.receipts.write().await;

        conversations.remove_scoped(id, None)?;
        participants.retain(|_, p| p.conversation_id != id);

        let removed: HashSet<i64> = messages
            .values()
            .filter(|m| m.conversation_id == id)
            .map(|m| m.id)
            .collect();
        messages.retain(|message_id, _| !removed.contains(message_id));
        receipts.retain(|(message_id, _), _| !removed.contains(message_id));
        Ok(())
    }

    async fn touch_conversation(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| not_found("Conversation", id))?;
        conversation.audit.updated_at = at;
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryRepository {
    async fn list_participants(
        &self,
        conversation_id: Option<i64>,
    ) -> Result<Vec<ConversationParticipant>> {
        let participants = self.participants.read().await;
        Ok(participants
            .values()
            .filter(|p| conversation_id.is_none_or(|id| p.conversation_id == id))
            .cloned()
            .collect())
    }

    async fn get_participant(&self, id: i64) -> Result<Option<ConversationParticipant>> {
        let participants = self.participants.read().await;
        Ok(participants.get(id).cloned())
    }

    async fn find_participant(
        &self,
        conversation_id: i64,
        employee_id: i64,
    ) -> Result<Option<ConversationParticipant>> {
        let participants = self.participants.read().await;
        let found = participants
            .values()
            .find(|p| p.conversation_id == conversation_id && p.employee_id == employee_id)
            .cloned();
        Ok(found)
    }

    async fn create_participant(
        &self,
        participant: &ConversationParticipant,
    ) -> Result<ConversationParticipant> {
        let conversations = self.conversations.read().await;
        let mut participants = self.participants.write().await;

        if conversations.get(participant.conversation_id).is_none() {
            return Err(foreign_key_violation(
                "Conversation",
                participant.conversation_id,
            ));
        }
        if participants.values().any(|p| {
            p.conversation_id == participant.conversation_id
                && p.employee_id == participant.employee_id
        }) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "ConversationParticipant",
                id: format!(
                    "{}/{}",
                    participant.conversation_id, participant.employee_id
                ),
            });
        }
        Ok(participants.insert(participant))
    }

    async fn update_participant(&self, participant: &ConversationParticipant) -> Result<()> {
        self.participants.write().await.replace(participant)
    }

    async fn delete_participant(&self, id: i64) -> Result<()> {
        let mut participants = self.participants.write().await;
        participants.remove_scoped(id, None).map(|_| ())
    }
}

#[async_trait]
impl MessageRepository for InMemoryRepository {
    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut result: Vec<Message> = messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.audit
                .created_at
                .cmp(&b.audit.created_at)
                .then(a.id.cmp(&b.id))
        });
        Ok(result)
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(messages.get(id).cloned())
    }

    async fn create_message(&self, message: &Message) -> Result<Message> {
        let conversations = self.conversations.read().await;
        if conversations.get(message.conversation_id).is_none() {
            return Err(foreign_key_violation("Conversation", message.conversation_id));
        }
        let mut messages = self.messages.write().await;
        Ok(messages.insert(message))
    }

    async fn update_message(&self, message: &Message) -> Result<()> {
        self.messages.write().await.replace(message)
    }

    async fn delete_message(&self, id: i64) -> Result<()> {
        let mut messages = self.messages.write().await;
        messages.remove_scoped(id, None)?;
        self.receipts
            .write()
            .await
            .retain(|(message_id, _), _| *message_id != id);
        Ok(())
    }

    async fn list_receipts(&self, conversation_id: i64) -> Result<Vec<ReadReceipt>> {
        let messages = self.messages.read().await;
        let receipts = self.receipts.read().await;
        Ok(receipts
            .values()
            .filter(|r| {
                messages
                    .get(r.message_id)
                    .is_some_and(|m| m.conversation_id == conversation_id)
            })
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        conversation_id: i64,
        employee_id: i64,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut messages = self.messages.write().await;
        let mut receipts = self.receipts.write().await;

        let from_others: Vec<i64> = messages
            .values()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != employee_id)
            .map(|m| m.id)
            .collect();

        for &message_id in &from_others {
            if let Some(message) = messages.get_mut(message_id) {
                message.read_status = ReadStatus::Read;
            }
            receipts
                .entry((message_id, employee_id))
                .or_insert(ReadReceipt {
                    message_id,
                    employee_id,
                    read_at: at,
                });
        }
        Ok(from_others.len())
    }
}

#[async_trait]
impl LookupRepository for InMemoryRepository {
    async fn list_lookups(&self, table: &str, order_by_name: bool) -> Result<Vec<LookupRow>> {
        let lookups = self.lookups.read().await;
        let mut rows: Vec<LookupRow> = lookups
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default();
        if order_by_name {
            rows.sort_by_key(LookupRow::sort_key);
        }
        Ok(rows)
    }

    async fn get_lookup(&self, table: &str, id: i64) -> Result<Option<LookupRow>> {
        let lookups = self.lookups.read().await;
        Ok(lookups.get(table).and_then(|t| t.get(id)).cloned())
    }

    async fn create_lookup(&self, table: &str, row: &LookupRow) -> Result<LookupRow> {
        let mut lookups = self.lookups.write().await;
        Ok(lookups.entry(table.to_string()).or_default().insert(row))
    }

    async fn update_lookup(&self, table: &str, row: &LookupRow) -> Result<()> {
        let mut lookups = self.lookups.write().await;
        lookups
            .get_mut(table)
            .ok_or_else(|| not_found("Lookup", row.id))?
            .replace(row)
    }

    async fn delete_lookup(&self, table: &str, id: i64) -> Result<()> {
        let mut lookups = self.lookups.write().await;
        lookups
            .get_mut(table)
            .ok_or_else(|| not_found("Lookup", id))?
            .remove_scoped(id, None)
            .map(|_| ())
    }
}

#[async_trait]
impl FolderRepository for InMemoryRepository {
    async fn list_folders(&self, owner: &str) -> Result<Vec<Folder>> {
        let folders = self.folders.read().await;
        let owned = folders
            .values()
            .rev()
            .filter(|f| f.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(owned)
    }

    async fn get_folder(&self, id: i64, owner: &str) -> Result<Option<Folder>> {
        let folders = self.folders.read().await;
        let found = folders.get(id).filter(|f| f.is_owned_by(owner)).cloned();
        Ok(found)
    }

    async fn create_folder(&self, folder: &Folder) -> Result<Folder> {
        let mut folders = self.folders.write().await;
        if let Some(parent_id) = folder.parent_id {
            if folders.get(parent_id).is_none() {
                return Err(foreign_key_violation("Folder", parent_id));
            }
        }
        Ok(folders.insert(folder))
    }

    async fn update_folder(&self, folder: &Folder) -> Result<()> {
        let mut folders = self.folders.write().await;
        if let Some(parent_id) = folder.parent_id {
            if folders.get(parent_id).is_none() {
                return Err(foreign_key_violation("Folder", parent_id));
            }
        }
        folders.replace(folder)
    }

    async fn delete_folder(&self, id: i64, owner: &str) -> Result<()> {
        let mut folders = self.folders.write().await;
        if !folders.get(id).is_some_and(|f| f.is_owned_by(owner)) {
            return Err(not_found("Folder", id));
        }
        folders.remove_scoped(id, None)?;
        folders.retain(|_, f| {
            if f.parent_id == Some(id) {
                f.parent_id = None;
            }
            true
        });

        let mut files = self.personal_files.write().await;
        files.retain(|_, f| {
            if f.folder_id == Some(id) {
                f.folder_id = None;
            }
            true
        });
        Ok(())
    }
}

#[async_trait]
impl PersonalFileRepository for InMemoryRepository {
    async fn list_personal_files(&self, owner: &str) -> Result<Vec<PersonalFile>> {
        let files = self.personal_files.read().await;
        let owned = files
            .values()
            .rev()
            .filter(|f| f.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(owned)
    }

    async fn get_personal_file(
        &self,
        id: i64,
        owner: Option<&str>,
    ) -> Result<Option<PersonalFile>> {
        let files = self.personal_files.read().await;
        let found = files
            .get(id)
            .filter(|f| owner.is_none_or(|owner| f.is_owned_by(owner)))
            .cloned();
        Ok(found)
    }

    async fn create_personal_file(&self, file: &PersonalFile) -> Result<PersonalFile> {
        let folders = self.folders.read().await;
        if let Some(folder_id) = file.folder_id {
            if folders.get(folder_id).is_none() {
                return Err(foreign_key_violation("Folder", folder_id));
            }
        }
        let mut files = self.personal_files.write().await;
        Ok(files.insert(file))
    }

    async fn update_personal_file(&self, file: &PersonalFile) -> Result<()> {
        let folders = self.folders.read().await;
        if let Some(folder_id) = file.folder_id {
            if folders.get(folder_id).is_none() {
                return Err(foreign_key_violation("Folder", folder_id));
            }
        }
        self.personal_files.write().await.replace(file)
    }

    async fn delete_personal_file(&self, id: i64, owner: &str) -> Result<()> {
        let mut files = self.personal_files.write().await;
        if !files.get(id).is_some_and(|f| f.is_owned_by(owner)) {
            return Err(not_found("PersonalFile", id));
        }
        files.remove_scoped(id, None).map(|_| ())
    }
}
