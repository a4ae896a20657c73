//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Lookup tables share one shape and their statements
//! are built from the allowlisted table name.

/// Enables cascading deletes. Must run on every new connection.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create the fixed tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS Employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    center_id INTEGER,
    name TEXT NOT NULL,
    surname TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    user_type INTEGER NOT NULL,
    email TEXT,
    contact_number TEXT,
    department INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Applicant_Details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    center_id INTEGER,
    name TEXT NOT NULL,
    surname TEXT NOT NULL,
    file_number TEXT NOT NULL,
    id_number TEXT,
    cell_number TEXT,
    file_status INTEGER,
    signature BLOB,
    signature_filename TEXT,
    signature_mime TEXT,
    signature_size INTEGER,
    signature_updated_at TEXT,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Financial_Assistance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL,
    assistance_type INTEGER,
    financial_amount REAL,
    date_of_assistance TEXT,
    assisted_by INTEGER,
    sector INTEGER,
    program INTEGER,
    project INTEGER,
    give_to TEXT,
    starting_date TEXT,
    end_date TEXT,
    frequency TEXT,
    is_recurring INTEGER NOT NULL DEFAULT 0,
    is_auto_generated INTEGER NOT NULL DEFAULT 0,
    recurring_source_id INTEGER REFERENCES Financial_Assistance(id) ON DELETE SET NULL,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Recurring_Invoice_Logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    applicant_id INTEGER NOT NULL,
    financial_aid_id INTEGER NOT NULL REFERENCES Financial_Assistance(id) ON DELETE CASCADE,
    source_financial_aid_id INTEGER NOT NULL REFERENCES Financial_Assistance(id) ON DELETE CASCADE,
    next_run_date TEXT,
    frequency TEXT NOT NULL,
    created_by_system INTEGER NOT NULL DEFAULT 1,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Borehole (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imam_profile_id INTEGER NOT NULL,
    where_required INTEGER,
    has_electricity INTEGER,
    received_borehole_before INTEGER,
    current_water_source INTEGER,
    distance_to_water_source TEXT,
    beneficiaries_count INTEGER,
    challenges_due_to_lack_of_water TEXT,
    motivation TEXT,
    longitude REAL,
    latitude REAL,
    acknowledge INTEGER NOT NULL DEFAULT 0,
    status_id INTEGER,
    comment TEXT,
    current_water_source_image BLOB,
    current_water_source_image_filename TEXT,
    current_water_source_image_mime TEXT,
    current_water_source_image_size INTEGER,
    current_water_source_image_updated_at TEXT,
    masjid_area_image BLOB,
    masjid_area_image_filename TEXT,
    masjid_area_image_mime TEXT,
    masjid_area_image_size INTEGER,
    masjid_area_image_updated_at TEXT,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Borehole_Water_Usage_Purpose (
    borehole_id INTEGER NOT NULL REFERENCES Borehole(id) ON DELETE CASCADE,
    water_usage_purpose_id INTEGER NOT NULL,
    PRIMARY KEY (borehole_id, water_usage_purpose_id)
);

CREATE TABLE IF NOT EXISTS Tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    classification_id INTEGER,
    status_id INTEGER NOT NULL DEFAULT 1,
    allocated_to INTEGER,
    closed_at TEXT,
    media BLOB,
    media_filename TEXT,
    media_mime TEXT,
    media_size INTEGER,
    media_updated_at TEXT,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    type TEXT NOT NULL,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Conversation_Participants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES Conversations(id) ON DELETE CASCADE,
    employee_id INTEGER NOT NULL,
    joined_date TEXT NOT NULL,
    last_read_at TEXT,
    deleted_at TEXT,
    last_restored_at TEXT,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (conversation_id, employee_id)
);

CREATE TABLE IF NOT EXISTS Messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES Conversations(id) ON DELETE CASCADE,
    sender_id INTEGER NOT NULL,
    message_text TEXT,
    attachment BLOB,
    attachment_filename TEXT,
    attachment_mime TEXT,
    attachment_size INTEGER,
    attachment_updated_at TEXT,
    read_status TEXT NOT NULL DEFAULT 'Unread',
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Message_Read_Receipts (
    message_id INTEGER NOT NULL REFERENCES Messages(id) ON DELETE CASCADE,
    employee_id INTEGER NOT NULL,
    read_at TEXT NOT NULL,
    PRIMARY KEY (message_id, employee_id)
);

CREATE TABLE IF NOT EXISTS Folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES Folders(id) ON DELETE SET NULL,
    employee_id INTEGER,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Personal_Files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    folder_id INTEGER REFERENCES Folders(id) ON DELETE SET NULL,
    employee_id INTEGER,
    file BLOB,
    file_filename TEXT,
    file_mime TEXT,
    file_size INTEGER,
    file_updated_at TEXT,
    center_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_assistance_source
    ON Financial_Assistance(recurring_source_id, date_of_assistance);
CREATE INDEX IF NOT EXISTS idx_borehole_imam ON Borehole(imam_profile_id);
CREATE INDEX IF NOT EXISTS idx_participants_employee ON Conversation_Participants(employee_id);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON Messages(conversation_id, created_at);
CREATE INDEX IF NOT EXISTS idx_folders_owner ON Folders(created_by);
CREATE INDEX IF NOT EXISTS idx_personal_files_owner ON Personal_Files(created_by);
"#;

// Employee queries
pub const INSERT_EMPLOYEE: &str = r#"
INSERT INTO Employee (center_id, name, surname, username, password_hash, user_type, email,
    contact_number, department, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

pub const SELECT_EMPLOYEES: &str = r#"
SELECT * FROM Employee
WHERE (?1 IS NULL OR center_id = ?1)
ORDER BY id
"#;

pub const SELECT_EMPLOYEE_BY_ID: &str = r#"
SELECT * FROM Employee
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const SELECT_EMPLOYEE_BY_USERNAME: &str = r#"
SELECT * FROM Employee
WHERE username = ?1
"#;

pub const UPDATE_EMPLOYEE: &str = r#"
UPDATE Employee
SET center_id = ?2, name = ?3, surname = ?4, username = ?5, password_hash = ?6, user_type = ?7,
    email = ?8, contact_number = ?9, department = ?10, updated_by = ?11, updated_at = ?12
WHERE id = ?1
"#;

pub const DELETE_EMPLOYEE: &str = r#"
DELETE FROM Employee
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

// Applicant queries
pub const INSERT_APPLICANT: &str = r#"
INSERT INTO Applicant_Details (center_id, name, surname, file_number, id_number, cell_number,
    file_status, signature, signature_filename, signature_mime, signature_size,
    signature_updated_at, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
"#;

pub const SELECT_APPLICANTS: &str = r#"
SELECT * FROM Applicant_Details
WHERE (?1 IS NULL OR center_id = ?1)
ORDER BY id
"#;

pub const SELECT_APPLICANT_BY_ID: &str = r#"
SELECT * FROM Applicant_Details
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const UPDATE_APPLICANT: &str = r#"
UPDATE Applicant_Details
SET center_id = ?2, name = ?3, surname = ?4, file_number = ?5, id_number = ?6,
    cell_number = ?7, file_status = ?8, signature = ?9, signature_filename = ?10,
    signature_mime = ?11, signature_size = ?12, signature_updated_at = ?13,
    updated_by = ?14, updated_at = ?15
WHERE id = ?1
"#;

pub const DELETE_APPLICANT: &str = r#"
DELETE FROM Applicant_Details
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

// Financial assistance queries
pub const INSERT_ASSISTANCE: &str = r#"
INSERT INTO Financial_Assistance (file_id, assistance_type, financial_amount, date_of_assistance,
    assisted_by, sector, program, project, give_to, starting_date, end_date, frequency,
    is_recurring, is_auto_generated, recurring_source_id, center_id,
    created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
"#;

pub const SELECT_ASSISTANCE: &str = r#"
SELECT * FROM Financial_Assistance
WHERE (?1 IS NULL OR center_id = ?1)
ORDER BY id
"#;

pub const SELECT_ASSISTANCE_BY_ID: &str = r#"
SELECT * FROM Financial_Assistance
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const UPDATE_ASSISTANCE: &str = r#"
UPDATE Financial_Assistance
SET file_id = ?2, assistance_type = ?3, financial_amount = ?4, date_of_assistance = ?5,
    assisted_by = ?6, sector = ?7, program = ?8, project = ?9, give_to = ?10,
    starting_date = ?11, end_date = ?12, frequency = ?13, is_recurring = ?14,
    center_id = ?15, updated_by = ?16, updated_at = ?17
WHERE id = ?1
"#;

pub const DELETE_ASSISTANCE: &str = r#"
DELETE FROM Financial_Assistance
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const SELECT_ACTIVE_TEMPLATES: &str = r#"
SELECT * FROM Financial_Assistance
WHERE is_recurring = 1
  AND is_auto_generated = 0
  AND starting_date IS NOT NULL AND starting_date <= ?1
  AND end_date IS NOT NULL AND end_date >= ?1
ORDER BY id
"#;

pub const SELECT_LAST_GENERATED_DATE: &str = r#"
SELECT MAX(date_of_assistance) FROM Financial_Assistance
WHERE id = ?1 OR recurring_source_id = ?1
"#;

pub const SELECT_OCCURRENCE_EXISTS: &str = r#"
SELECT EXISTS (
    SELECT 1 FROM Financial_Assistance
    WHERE recurring_source_id = ?1 AND date_of_assistance = ?2
)
"#;

// Recurring log queries
pub const INSERT_RECURRING_LOG: &str = r#"
INSERT INTO Recurring_Invoice_Logs (applicant_id, financial_aid_id, source_financial_aid_id,
    next_run_date, frequency, created_by_system, center_id,
    created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const SELECT_RECURRING_LOGS: &str = r#"
SELECT * FROM Recurring_Invoice_Logs
WHERE (?1 IS NULL OR source_financial_aid_id = ?1)
ORDER BY id DESC
"#;

// Borehole queries
pub const INSERT_BOREHOLE: &str = r#"
INSERT INTO Borehole (imam_profile_id, where_required, has_electricity, received_borehole_before,
    current_water_source, distance_to_water_source, beneficiaries_count,
    challenges_due_to_lack_of_water, motivation, longitude, latitude, acknowledge, status_id,
    comment, current_water_source_image, current_water_source_image_filename,
    current_water_source_image_mime, current_water_source_image_size,
    current_water_source_image_updated_at, masjid_area_image, masjid_area_image_filename,
    masjid_area_image_mime, masjid_area_image_size, masjid_area_image_updated_at, center_id,
    created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19,
    ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29)
"#;

pub const SELECT_BOREHOLES: &str = r#"
SELECT * FROM Borehole
WHERE (?1 IS NULL OR imam_profile_id = ?1) AND (?2 IS NULL OR center_id = ?2)
ORDER BY id DESC
"#;

pub const SELECT_BOREHOLE_BY_ID: &str = r#"
SELECT * FROM Borehole
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const UPDATE_BOREHOLE: &str = r#"
UPDATE Borehole
SET imam_profile_id = ?2, where_required = ?3, has_electricity = ?4,
    received_borehole_before = ?5, current_water_source = ?6, distance_to_water_source = ?7,
    beneficiaries_count = ?8, challenges_due_to_lack_of_water = ?9, motivation = ?10,
    longitude = ?11, latitude = ?12, acknowledge = ?13, status_id = ?14, comment = ?15,
    current_water_source_image = ?16, current_water_source_image_filename = ?17,
    current_water_source_image_mime = ?18, current_water_source_image_size = ?19,
    current_water_source_image_updated_at = ?20, masjid_area_image = ?21,
    masjid_area_image_filename = ?22, masjid_area_image_mime = ?23,
    masjid_area_image_size = ?24, masjid_area_image_updated_at = ?25, center_id = ?26,
    updated_by = ?27, updated_at = ?28
WHERE id = ?1
"#;

pub const DELETE_BOREHOLE: &str = r#"
DELETE FROM Borehole
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const SELECT_BOREHOLE_PURPOSES: &str = r#"
SELECT water_usage_purpose_id FROM Borehole_Water_Usage_Purpose
WHERE borehole_id = ?1
ORDER BY water_usage_purpose_id
"#;

pub const INSERT_BOREHOLE_PURPOSE: &str = r#"
INSERT OR IGNORE INTO Borehole_Water_Usage_Purpose (borehole_id, water_usage_purpose_id)
VALUES (?1, ?2)
"#;

pub const DELETE_BOREHOLE_PURPOSES: &str = r#"
DELETE FROM Borehole_Water_Usage_Purpose
WHERE borehole_id = ?1
"#;

// Ticket queries
pub const INSERT_TICKET: &str = r#"
INSERT INTO Tickets (title, description, classification_id, status_id, allocated_to, closed_at,
    media, media_filename, media_mime, media_size, media_updated_at, center_id,
    created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
"#;

pub const SELECT_TICKETS: &str = r#"
SELECT * FROM Tickets
WHERE (?1 IS NULL OR center_id = ?1)
ORDER BY id DESC
"#;

pub const SELECT_TICKET_BY_ID: &str = r#"
SELECT * FROM Tickets
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

pub const UPDATE_TICKET: &str = r#"
UPDATE Tickets
SET title = ?2, description = ?3, classification_id = ?4, status_id = ?5, allocated_to = ?6,
    closed_at = ?7, media = ?8, media_filename = ?9, media_mime = ?10, media_size = ?11,
    media_updated_at = ?12, center_id = ?13, updated_by = ?14, updated_at = ?15
WHERE id = ?1
"#;

pub const DELETE_TICKET: &str = r#"
DELETE FROM Tickets
WHERE id = ?1 AND (?2 IS NULL OR center_id = ?2)
"#;

// Conversation queries
pub const INSERT_CONVERSATION: &str = r#"
INSERT INTO Conversations (title, type, center_id, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_CONVERSATIONS_FOR_EMPLOYEE: &str = r#"
SELECT c.* FROM Conversations c
INNER JOIN Conversation_Participants p ON p.conversation_id = c.id
WHERE p.employee_id = ?1 AND p.deleted_at IS NULL
ORDER BY c.updated_at DESC, c.id DESC
"#;

pub const SELECT_CONVERSATION_BY_ID: &str = r#"
SELECT * FROM Conversations
WHERE id = ?1
"#;

pub const UPDATE_CONVERSATION: &str = r#"
UPDATE Conversations
SET title = ?2, type = ?3, center_id = ?4, updated_by = ?5, updated_at = ?6
WHERE id = ?1
"#;

pub const TOUCH_CONVERSATION: &str = r#"
UPDATE Conversations
SET updated_at = ?2
WHERE id = ?1
"#;

pub const DELETE_CONVERSATION: &str = r#"
DELETE FROM Conversations
WHERE id = ?1
"#;

// Participant queries
pub const INSERT_PARTICIPANT: &str = r#"
INSERT INTO Conversation_Participants (conversation_id, employee_id, joined_date, last_read_at,
    deleted_at, last_restored_at, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const SELECT_PARTICIPANTS: &str = r#"
SELECT * FROM Conversation_Participants
WHERE (?1 IS NULL OR conversation_id = ?1)
ORDER BY id
"#;

pub const SELECT_PARTICIPANT_BY_ID: &str = r#"
SELECT * FROM Conversation_Participants
WHERE id = ?1
"#;

pub const SELECT_PARTICIPANT_BY_MEMBER: &str = r#"
SELECT * FROM Conversation_Participants
WHERE conversation_id = ?1 AND employee_id = ?2
"#;

pub const UPDATE_PARTICIPANT: &str = r#"
UPDATE Conversation_Participants
SET conversation_id = ?2, employee_id = ?3, joined_date = ?4, last_read_at = ?5,
    deleted_at = ?6, last_restored_at = ?7, updated_by = ?8, updated_at = ?9
WHERE id = ?1
"#;

pub const DELETE_PARTICIPANT: &str = r#"
DELETE FROM Conversation_Participants
WHERE id = ?1
"#;

// Message queries
pub const INSERT_MESSAGE: &str = r#"
INSERT INTO Messages (conversation_id, sender_id, message_text, attachment, attachment_filename,
    attachment_mime, attachment_size, attachment_updated_at, read_status,
    created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

pub const SELECT_MESSAGES_BY_CONVERSATION: &str = r#"
SELECT * FROM Messages
WHERE conversation_id = ?1
ORDER BY created_at ASC, id ASC
"#;

pub const SELECT_MESSAGE_BY_ID: &str = r#"
SELECT * FROM Messages
WHERE id = ?1
"#;

pub const UPDATE_MESSAGE: &str = r#"
UPDATE Messages
SET message_text = ?2, attachment = ?3, attachment_filename = ?4, attachment_mime = ?5,
    attachment_size = ?6, attachment_updated_at = ?7, read_status = ?8,
    updated_by = ?9, updated_at = ?10
WHERE id = ?1
"#;

pub const DELETE_MESSAGE: &str = r#"
DELETE FROM Messages
WHERE id = ?1
"#;

pub const SELECT_RECEIPTS_BY_CONVERSATION: &str = r#"
SELECT r.message_id, r.employee_id, r.read_at FROM Message_Read_Receipts r
INNER JOIN Messages m ON m.id = r.message_id
WHERE m.conversation_id = ?1
ORDER BY r.message_id, r.employee_id
"#;

pub const INSERT_MISSING_RECEIPTS: &str = r#"
INSERT OR IGNORE INTO Message_Read_Receipts (message_id, employee_id, read_at)
SELECT id, ?2, ?3 FROM Messages
WHERE conversation_id = ?1 AND sender_id != ?2
"#;

pub const COUNT_RECEIPTS_FOR_READER: &str = r#"
SELECT COUNT(*) FROM Message_Read_Receipts r
JOIN Messages m ON m.id = r.message_id
WHERE m.conversation_id = ?1 AND r.employee_id = ?2 AND m.sender_id != ?2
"#;

pub const MARK_MESSAGES_READ: &str = r#"
UPDATE Messages
SET read_status = 'Read'
WHERE conversation_id = ?1 AND sender_id != ?2
"#;

// Folder queries
pub const INSERT_FOLDER: &str = r#"
INSERT INTO Folders (name, parent_id, employee_id, center_id, created_by, updated_by,
    created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_FOLDERS_BY_OWNER: &str = r#"
SELECT * FROM Folders
WHERE created_by = ?1
ORDER BY created_at DESC, id DESC
"#;

pub const SELECT_FOLDER_BY_ID: &str = r#"
SELECT * FROM Folders
WHERE id = ?1 AND created_by = ?2
"#;

pub const UPDATE_FOLDER: &str = r#"
UPDATE Folders
SET name = ?2, parent_id = ?3, employee_id = ?4, center_id = ?5, updated_by = ?6,
    updated_at = ?7
WHERE id = ?1
"#;

pub const DELETE_FOLDER: &str = r#"
DELETE FROM Folders
WHERE id = ?1 AND created_by = ?2
"#;

// Personal file queries
pub const INSERT_PERSONAL_FILE: &str = r#"
INSERT INTO Personal_Files (name, folder_id, employee_id, file, file_filename, file_mime,
    file_size, file_updated_at, center_id, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

pub const SELECT_PERSONAL_FILES_BY_OWNER: &str = r#"
SELECT * FROM Personal_Files
WHERE created_by = ?1
ORDER BY created_at DESC, id DESC
"#;

pub const SELECT_PERSONAL_FILE_BY_ID: &str = r#"
SELECT * FROM Personal_Files
WHERE id = ?1 AND (?2 IS NULL OR created_by = ?2)
"#;

pub const UPDATE_PERSONAL_FILE: &str = r#"
UPDATE Personal_Files
SET name = ?2, folder_id = ?3, employee_id = ?4, file = ?5, file_filename = ?6,
    file_mime = ?7, file_size = ?8, file_updated_at = ?9, center_id = ?10, updated_by = ?11,
    updated_at = ?12
WHERE id = ?1
"#;

pub const DELETE_PERSONAL_FILE: &str = r#"
DELETE FROM Personal_Files
WHERE id = ?1 AND created_by = ?2
"#;

// Lookup tables. Names come from the allowlist and are quoted.

pub fn create_lookup_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{table}" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    extra TEXT NOT NULL DEFAULT '{{}}',
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);"#
    )
}

pub fn select_lookups(table: &str, order_by_name: bool) -> String {
    let order = if order_by_name {
        "name IS NULL, name, id"
    } else {
        "id"
    };
    format!(r#"SELECT * FROM "{table}" ORDER BY {order}"#)
}

pub fn select_lookup_by_id(table: &str) -> String {
    format!(r#"SELECT * FROM "{table}" WHERE id = ?1"#)
}

pub fn insert_lookup(table: &str) -> String {
    format!(
        r#"INSERT INTO "{table}" (name, extra, created_by, updated_by, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#
    )
}

pub fn update_lookup(table: &str) -> String {
    format!(
        r#"UPDATE "{table}"
           SET name = ?2, extra = ?3, updated_by = ?4, updated_at = ?5
           WHERE id = ?1"#
    )
}

pub fn delete_lookup(table: &str) -> String {
    format!(r#"DELETE FROM "{table}" WHERE id = ?1"#)
}
