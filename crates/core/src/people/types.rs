use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::audit::Audit;
use crate::serde::{deserialize_lenient_i64, deserialize_optional_string};

use super::PeopleError;

/// A staff member. Employees are also the principals that log in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub center_id: Option<i64>,
    pub name: String,
    pub surname: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Numeric role id, see [`crate::access::Role`].
    pub user_type: i64,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub department: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Create/update payload for an employee. Absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub user_type: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub department: Option<i64>,
}

impl EmployeeInput {
    /// Builds a new employee. The store assigns the id.
    pub fn into_employee(
        self,
        password_hash: String,
        audit: Audit,
    ) -> Result<Employee, PeopleError> {
        Ok(Employee {
            id: 0,
            center_id: self.center_id,
            name: self.name.ok_or(PeopleError::MissingField("name"))?,
            surname: self.surname.ok_or(PeopleError::MissingField("surname"))?,
            username: self.username.ok_or(PeopleError::MissingField("username"))?,
            password_hash,
            user_type: self.user_type.ok_or(PeopleError::MissingField("user_type"))?,
            email: self.email,
            contact_number: self.contact_number,
            department: self.department,
            audit,
        })
    }

    /// Copies the provided fields onto an existing employee.
    ///
    /// The password is not applied here; callers hash it first.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(center_id) = self.center_id {
            employee.center_id = Some(center_id);
        }
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(surname) = self.surname {
            employee.surname = surname;
        }
        if let Some(username) = self.username {
            employee.username = username;
        }
        if let Some(user_type) = self.user_type {
            employee.user_type = user_type;
        }
        if self.email.is_some() {
            employee.email = self.email;
        }
        if self.contact_number.is_some() {
            employee.contact_number = self.contact_number;
        }
        if self.department.is_some() {
            employee.department = self.department;
        }
    }
}

/// A welfare applicant, also called a "file".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applicant {
    pub id: i64,
    pub center_id: Option<i64>,
    pub name: String,
    pub surname: String,
    pub file_number: String,
    pub id_number: Option<String>,
    pub cell_number: Option<String>,
    pub file_status: Option<i64>,
    pub signature: Option<Attachment>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub file_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub id_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cell_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub file_status: Option<i64>,
}

impl ApplicantInput {
    /// Builds a new applicant. The store assigns the id.
    pub fn into_applicant(
        self,
        signature: Option<Attachment>,
        audit: Audit,
    ) -> Result<Applicant, PeopleError> {
        Ok(Applicant {
            id: 0,
            center_id: self.center_id,
            name: self.name.ok_or(PeopleError::MissingField("name"))?,
            surname: self.surname.ok_or(PeopleError::MissingField("surname"))?,
            file_number: self
                .file_number
                .ok_or(PeopleError::MissingField("file_number"))?,
            id_number: self.id_number,
            cell_number: self.cell_number,
            file_status: self.file_status,
            signature,
            audit,
        })
    }

    pub fn apply_to(self, applicant: &mut Applicant) {
        if let Some(center_id) = self.center_id {
            applicant.center_id = Some(center_id);
        }
        if let Some(name) = self.name {
            applicant.name = name;
        }
        if let Some(surname) = self.surname {
            applicant.surname = surname;
        }
        if let Some(file_number) = self.file_number {
            applicant.file_number = file_number;
        }
        if self.id_number.is_some() {
            applicant.id_number = self.id_number;
        }
        if self.cell_number.is_some() {
            applicant.cell_number = self.cell_number;
        }
        if self.file_status.is_some() {
            applicant.file_status = self.file_status;
        }
    }
}
