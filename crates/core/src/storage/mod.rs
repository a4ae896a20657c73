mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{
    ApplicantRepository, BoreholeRepository, ConversationRepository, EmployeeRepository,
    FinancialAssistanceRepository, FolderRepository, LookupRepository, MessageRepository,
    ParticipantRepository, PersonalFileRepository, RecurringInvoiceLogRepository,
    TicketRepository,
};
pub use types::{inject_center, is_visible_to, CenterFilter};
