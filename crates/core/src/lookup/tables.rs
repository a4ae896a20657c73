use crate::access::Role;

use super::LookupError;

/// An allowlisted lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTable {
    pub name: &'static str,
    /// Listings are sorted by `name` when set, by id otherwise.
    pub order_by_name: bool,
    /// Only AppAdmin and HQ may create, update or delete rows.
    pub restricted: bool,
}

impl LookupTable {
    const fn ordered(name: &'static str) -> Self {
        Self {
            name,
            order_by_name: true,
            restricted: false,
        }
    }

    const fn unordered(name: &'static str) -> Self {
        Self {
            name,
            order_by_name: false,
            restricted: false,
        }
    }

    const fn restricted(self) -> Self {
        Self {
            restricted: true,
            ..self
        }
    }
}

/// Every lookup table reachable through `/api/lookup/{table}`.
pub static LOOKUP_TABLES: &[LookupTable] = &[
    LookupTable::ordered("Supplier_Category"),
    LookupTable::ordered("Suburb"),
    LookupTable::ordered("Nationality"),
    LookupTable::ordered("Health_Conditions"),
    LookupTable::ordered("Skills"),
    LookupTable::ordered("Relationship_Types"),
    LookupTable::ordered("Tasks_Status"),
    LookupTable::ordered("Assistance_Types"),
    LookupTable::ordered("File_Status"),
    LookupTable::ordered("File_Condition"),
    LookupTable::ordered("Dwelling_Status"),
    LookupTable::ordered("Race"),
    LookupTable::ordered("Dwelling_Type"),
    LookupTable::ordered("Marital_Status"),
    LookupTable::ordered("Education_Level"),
    LookupTable::ordered("Employment_Status"),
    LookupTable::ordered("Gender"),
    LookupTable::ordered("Training_Outcome"),
    LookupTable::ordered("Training_Level"),
    LookupTable::ordered("Blood_Type"),
    LookupTable::ordered("Rating"),
    LookupTable::ordered("User_Types"),
    LookupTable::ordered("Policy_Procedure_Type"),
    LookupTable::ordered("Policy_Procedure_Field"),
    LookupTable::unordered("Policy_and_Procedure"),
    LookupTable::ordered("Income_Type"),
    LookupTable::ordered("Expense_Type"),
    LookupTable::ordered("Hampers"),
    LookupTable::ordered("Born_Religion"),
    LookupTable::ordered("Period_As_Muslim"),
    LookupTable::unordered("Hadith").restricted(),
    LookupTable::ordered("Training_Courses"),
    LookupTable::ordered("Means_of_communication"),
    LookupTable::ordered("Departments"),
    LookupTable::ordered("Title_Lookup"),
    LookupTable::ordered("Madhab"),
    LookupTable::ordered("Status"),
    LookupTable::ordered("Yes_No"),
    LookupTable::ordered("Resource_Type"),
    LookupTable::ordered("Medical_Visit_Type"),
    LookupTable::ordered("Medical_Service_Provider"),
    LookupTable::ordered("Community_Engagement_Type"),
    LookupTable::ordered("Language"),
    LookupTable::ordered("Currency"),
    LookupTable::ordered("Country"),
    LookupTable::ordered("Province"),
    LookupTable::ordered("Borehole_Location"),
    LookupTable::ordered("Water_Source"),
    LookupTable::ordered("Water_Usage_Purpose"),
    LookupTable::ordered("Request_For_Lookup"),
    LookupTable::ordered("Classification_Lookup"),
    LookupTable::ordered("Course_Type_Lookup"),
    LookupTable::ordered("Course_Duration_Lookup"),
    LookupTable::ordered("Study_Method_Lookup"),
    LookupTable::ordered("Attendance_Frequency_Lookup"),
    LookupTable::ordered("Semesters_Per_Year_Lookup"),
    LookupTable::ordered("Borehole_Construction_Tasks_Lookup"),
    LookupTable::ordered("Supplier_Lookup"),
];

/// Resolves a table name from the allowlist. Names are case-sensitive.
pub fn find_table(name: &str) -> Result<&'static LookupTable, LookupError> {
    LOOKUP_TABLES
        .iter()
        .find(|table| table.name == name)
        .ok_or_else(|| LookupError::UnknownTable(name.to_string()))
}

/// Checks that `role` may write to `table`.
pub fn can_mutate_lookup(table: &LookupTable, role: Option<Role>) -> Result<(), LookupError> {
    if table.restricted && !role.is_some_and(Role::is_privileged) {
        return Err(LookupError::Restricted {
            table: table.name,
            role,
        });
    }
    Ok(())
}
