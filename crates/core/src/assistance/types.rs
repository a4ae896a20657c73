use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::audit::Audit;
use crate::serde::{
    deserialize_lenient_bool, deserialize_lenient_f64, deserialize_lenient_i64,
    deserialize_optional_date, deserialize_optional_string,
};

/// How often a recurring template produces occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parses a frequency name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A financial assistance payment to an applicant.
///
/// Rows with `is_recurring` set are templates; rows with
/// `is_auto_generated` set are occurrences produced from a template and
/// point back at it through `recurring_source_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialAssistance {
    pub id: i64,
    pub file_id: i64,
    pub assistance_type: Option<i64>,
    pub financial_amount: Option<f64>,
    pub date_of_assistance: Option<NaiveDate>,
    pub assisted_by: Option<i64>,
    pub sector: Option<i64>,
    pub program: Option<i64>,
    pub project: Option<i64>,
    pub give_to: Option<String>,
    pub starting_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Stored as entered; parsed with [`Frequency::parse`] when generating.
    pub frequency: Option<String>,
    pub is_recurring: bool,
    pub is_auto_generated: bool,
    pub recurring_source_id: Option<i64>,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl FinancialAssistance {
    /// Parsed frequency, if the stored value is supported.
    pub fn parsed_frequency(&self) -> Option<Frequency> {
        self.frequency.as_deref().and_then(Frequency::parse)
    }
}

/// Create/update payload for financial assistance.
///
/// `is_auto_generated` and `recurring_source_id` are managed by the
/// generator and cannot be set by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinancialAssistanceInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub file_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub assistance_type: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub financial_amount: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_of_assistance: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub assisted_by: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub sector: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub program: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub project: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub give_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub starting_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub is_recurring: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl FinancialAssistanceInput {
    /// Builds a manually entered record. The store assigns the id.
    ///
    /// Returns `None` when `file_id` is missing.
    pub fn into_assistance(self, audit: Audit) -> Option<FinancialAssistance> {
        Some(FinancialAssistance {
            id: 0,
            file_id: self.file_id?,
            assistance_type: self.assistance_type,
            financial_amount: self.financial_amount,
            date_of_assistance: self.date_of_assistance,
            assisted_by: self.assisted_by,
            sector: self.sector,
            program: self.program,
            project: self.project,
            give_to: self.give_to,
            starting_date: self.starting_date,
            end_date: self.end_date,
            frequency: self.frequency,
            is_recurring: self.is_recurring.unwrap_or(false),
            is_auto_generated: false,
            recurring_source_id: None,
            center_id: self.center_id,
            audit,
        })
    }

    /// Copies the provided fields onto an existing record.
    pub fn apply_to(self, record: &mut FinancialAssistance) {
        if let Some(file_id) = self.file_id {
            record.file_id = file_id;
        }
        if self.assistance_type.is_some() {
            record.assistance_type = self.assistance_type;
        }
        if self.financial_amount.is_some() {
            record.financial_amount = self.financial_amount;
        }
        if self.date_of_assistance.is_some() {
            record.date_of_assistance = self.date_of_assistance;
        }
        if self.assisted_by.is_some() {
            record.assisted_by = self.assisted_by;
        }
        if self.sector.is_some() {
            record.sector = self.sector;
        }
        if self.program.is_some() {
            record.program = self.program;
        }
        if self.project.is_some() {
            record.project = self.project;
        }
        if self.give_to.is_some() {
            record.give_to = self.give_to;
        }
        if self.starting_date.is_some() {
            record.starting_date = self.starting_date;
        }
        if self.end_date.is_some() {
            record.end_date = self.end_date;
        }
        if self.frequency.is_some() {
            record.frequency = self.frequency;
        }
        if let Some(is_recurring) = self.is_recurring {
            record.is_recurring = is_recurring;
        }
        if self.center_id.is_some() {
            record.center_id = self.center_id;
        }
    }
}

/// Body of the "create recurring assistance" request.
///
/// Dates are kept as strings so that validation can report them precisely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecurringRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub file_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub assistance_type: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub financial_amount: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub date_of_assistance: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub assisted_by: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub sector: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub program: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub project: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub give_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub starting_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub frequency: Option<String>,
}

/// Audit trail entry written for every generated occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringInvoiceLog {
    pub id: i64,
    pub applicant_id: i64,
    pub financial_aid_id: i64,
    pub source_financial_aid_id: i64,
    pub next_run_date: Option<NaiveDate>,
    pub frequency: String,
    pub created_by_system: bool,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}
