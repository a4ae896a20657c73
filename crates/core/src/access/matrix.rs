//! Static role-permission table.
//!
//! Pure data, evaluated by the functions in [`super::functions`].

use super::{Module, ReportScope, Role};

pub const READ_ONLY: &[&str] = &["GET", "HEAD", "OPTIONS"];
pub const FULL: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Route prefixes per module. Matched in order against the lowercased path.
pub(crate) const ROUTE_MAP: &[(Module, &[&str])] = &[
    (Module::Auth, &["/api/auth"]),
    (Module::Dashboard, &["/api/dashboard"]),
    (Module::Programs, &["/api/programs"]),
    (
        Module::Employee,
        &[
            "/api/employee",
            "/api/employeeappraisal",
            "/api/employeeinitiative",
            "/api/employeeskills",
        ],
    ),
    (
        Module::Training,
        &["/api/traininginstitutions", "/api/trainingcourses"],
    ),
    (Module::Policy, &["/api/policyandprocedure"]),
    (Module::Lookup, &["/api/lookup"]),
    (Module::Reports, &["/api/reports"]),
    (Module::FileManager, &["/api/folders", "/api/personalfiles"]),
    (Module::PersonalFiles, &["/api/personalfiles"]),
    (
        Module::Chat,
        &[
            "/api/messages",
            "/api/conversations",
            "/api/conversationparticipants",
        ],
    ),
    (
        Module::ImamProfiles,
        &[
            "/api/imamprofiles",
            "/api/pearlsofwisdom",
            "/api/jumuahkhutbahtopic",
            "/api/medicalreimbursement",
            "/api/communityengagement",
            "/api/nikahbonus",
            "/api/jumuahaudiokhutbah",
            "/api/newmuslimbonus",
            "/api/newbabybonus",
            "/api/imamrelationships",
            "/api/borehole",
            "/api/imamfinancialassistance",
            "/api/educationaldevelopment",
            "/api/treeplanting",
            "/api/waqfloan",
            "/api/hardshiprelief",
            "/api/highereducationrequest",
            "/api/boreholeconstructiontasks",
            "/api/boreholerepairsmatrix",
            "/api/tickets",
        ],
    ),
];

pub(crate) enum ModuleAllow {
    All,
    Only(&'static [Module]),
}

pub(crate) struct RoleRule {
    pub center_scoped: bool,
    pub report_scope: ReportScope,
    pub allow: ModuleAllow,
    pub deny: &'static [Module],
    pub default_methods: &'static [&'static str],
    pub overrides: &'static [(Module, &'static [&'static str])],
}

static APP_ADMIN: RoleRule = RoleRule {
    center_scoped: false,
    report_scope: ReportScope::All,
    allow: ModuleAllow::All,
    deny: &[],
    default_methods: FULL,
    overrides: &[],
};

static HQ: RoleRule = RoleRule {
    center_scoped: false,
    report_scope: ReportScope::All,
    allow: ModuleAllow::All,
    deny: &[],
    default_methods: FULL,
    overrides: &[],
};

static ORG_ADMIN: RoleRule = RoleRule {
    center_scoped: true,
    report_scope: ReportScope::Own,
    allow: ModuleAllow::All,
    deny: &[],
    default_methods: FULL,
    overrides: &[(Module::Policy, READ_ONLY)],
};

static ORG_EXECUTIVE: RoleRule = RoleRule {
    center_scoped: true,
    report_scope: ReportScope::Own,
    allow: ModuleAllow::All,
    deny: &[Module::FileManager, Module::PersonalFiles, Module::Chat],
    default_methods: READ_ONLY,
    overrides: &[(Module::Auth, FULL)],
};

static ORG_CASEWORKER: RoleRule = RoleRule {
    center_scoped: true,
    report_scope: ReportScope::Own,
    allow: ModuleAllow::Only(&[
        Module::Dashboard,
        Module::Programs,
        Module::FileManager,
        Module::Chat,
        Module::Policy,
        Module::Reports,
        Module::PersonalFiles,
        Module::Training,
        Module::Employee,
        Module::Lookup,
        Module::Auth,
    ]),
    deny: &[],
    default_methods: FULL,
    overrides: &[
        (Module::Policy, READ_ONLY),
        (Module::Reports, READ_ONLY),
        (Module::Lookup, READ_ONLY),
        (Module::Training, READ_ONLY),
        (Module::Employee, READ_ONLY),
    ],
};

static IMAM_USER: RoleRule = RoleRule {
    center_scoped: false,
    report_scope: ReportScope::Own,
    allow: ModuleAllow::Only(&[
        Module::Dashboard,
        Module::ImamProfiles,
        Module::Auth,
        Module::Employee,
        Module::Chat,
    ]),
    deny: &[
        Module::Programs,
        Module::FileManager,
        Module::Policy,
        Module::Reports,
        Module::PersonalFiles,
        Module::Training,
        Module::Lookup,
    ],
    default_methods: FULL,
    overrides: &[(Module::ImamProfiles, FULL), (Module::Employee, READ_ONLY)],
};

pub(crate) fn rule_for(role: Role) -> &'static RoleRule {
    match role {
        Role::AppAdmin => &APP_ADMIN,
        Role::Hq => &HQ,
        Role::OrgAdmin => &ORG_ADMIN,
        Role::OrgExecutive => &ORG_EXECUTIVE,
        Role::OrgCaseworker => &ORG_CASEWORKER,
        Role::ImamUser => &IMAM_USER,
    }
}
