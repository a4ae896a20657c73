use serde::{Deserialize, Serialize};

/// User roles, identified on the wire by the numeric `user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    AppAdmin,
    Hq,
    OrgAdmin,
    OrgExecutive,
    OrgCaseworker,
    ImamUser,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::AppAdmin,
        Role::Hq,
        Role::OrgAdmin,
        Role::OrgExecutive,
        Role::OrgCaseworker,
        Role::ImamUser,
    ];

    /// Resolves a numeric role id (`user_type`).
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::AppAdmin),
            2 => Some(Self::Hq),
            3 => Some(Self::OrgAdmin),
            4 => Some(Self::OrgExecutive),
            5 => Some(Self::OrgCaseworker),
            6 => Some(Self::ImamUser),
            _ => None,
        }
    }

    /// Resolves a role key such as `"OrgAdmin"`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }

    pub fn id(self) -> i64 {
        match self {
            Self::AppAdmin => 1,
            Self::Hq => 2,
            Self::OrgAdmin => 3,
            Self::OrgExecutive => 4,
            Self::OrgCaseworker => 5,
            Self::ImamUser => 6,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::AppAdmin => "AppAdmin",
            Self::Hq => "HQ",
            Self::OrgAdmin => "OrgAdmin",
            Self::OrgExecutive => "OrgExecutive",
            Self::OrgCaseworker => "OrgCaseworker",
            Self::ImamUser => "ImamUser",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AppAdmin => "App Admin",
            Self::Hq => "HQ",
            Self::OrgAdmin => "Org Admin",
            Self::OrgExecutive => "Org Executive",
            Self::OrgCaseworker => "Org Caseworker",
            Self::ImamUser => "Imam User",
        }
    }

    /// AppAdmin and HQ see every center and may edit restricted content.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::AppAdmin | Self::Hq)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Functional areas of the API that permissions are granted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Default,
    Auth,
    Dashboard,
    Programs,
    FinancialAssessment,
    Employee,
    Training,
    Hseq,
    Policy,
    Lookup,
    Reports,
    FileManager,
    Chat,
    PersonalFiles,
    ImamProfiles,
}

impl Module {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Auth => "auth",
            Self::Dashboard => "dashboard",
            Self::Programs => "programs",
            Self::FinancialAssessment => "financialAssessment",
            Self::Employee => "employee",
            Self::Training => "training",
            Self::Hseq => "hseq",
            Self::Policy => "policy",
            Self::Lookup => "lookup",
            Self::Reports => "reports",
            Self::FileManager => "fileManager",
            Self::Chat => "chat",
            Self::PersonalFiles => "personalFiles",
            Self::ImamProfiles => "imamProfiles",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which report rows a role may aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportScope {
    All,
    Own,
}

/// Input to [`authorize`](super::authorize).
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Raw `user_type` from the token, if any.
    pub role_id: Option<i64>,
    /// Full request path, including the `/api` prefix.
    pub path: &'a str,
    pub method: &'a str,
    /// Explicit role allowlist for the route. Empty means "any known role".
    pub allowed_roles: &'a [Role],
}

/// The resolved permissions for an authorized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessScope {
    pub role: Role,
    pub module: Module,
    pub report_scope: ReportScope,
    pub enforce_center_filter: bool,
}

impl AccessScope {
    /// The center rows must be restricted to, if any.
    ///
    /// A center-scoped user without a center is left unfiltered.
    pub fn center_filter(&self, user_center: Option<i64>) -> Option<i64> {
        if self.enforce_center_filter {
            user_center
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
            assert_eq!(Role::from_key(role.key()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(7), None);
        assert_eq!(Role::from_key("Admin"), None);
    }

    #[test]
    fn only_app_admin_and_hq_are_privileged() {
        let privileged: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.is_privileged())
            .collect();
        assert_eq!(privileged, vec![Role::AppAdmin, Role::Hq]);
    }

    #[test]
    fn center_filter_applies_only_when_enforced() {
        let scoped = AccessScope {
            role: Role::OrgAdmin,
            module: Module::Default,
            report_scope: ReportScope::Own,
            enforce_center_filter: true,
        };
        assert_eq!(scoped.center_filter(Some(4)), Some(4));
        assert_eq!(scoped.center_filter(None), None);

        let global = AccessScope {
            role: Role::Hq,
            enforce_center_filter: false,
            report_scope: ReportScope::All,
            ..scoped
        };
        assert_eq!(global.center_filter(Some(4)), None);
    }
}
