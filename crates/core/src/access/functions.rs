//! Pure functions evaluating the RBAC matrix.

use super::matrix::{rule_for, ModuleAllow, READ_ONLY, ROUTE_MAP};
use super::{AccessDenied, AccessRequest, AccessScope, Module, ReportScope, Role};

/// Resolves the module a request path belongs to.
///
/// Paths are compared case-insensitively by prefix; the first matching
/// entry wins and unmatched paths fall into [`Module::Default`].
pub fn module_for_path(path: &str) -> Module {
    let normalized = path.to_lowercase();
    ROUTE_MAP
        .iter()
        .find(|(_, prefixes)| prefixes.iter().any(|p| normalized.starts_with(p)))
        .map(|(module, _)| *module)
        .unwrap_or(Module::Default)
}

/// Whether a role may use a module at all. Deny entries win over allow entries.
pub fn is_module_allowed(role: Role, module: Module) -> bool {
    let rule = rule_for(role);
    if rule.deny.contains(&module) {
        return false;
    }
    match rule.allow {
        ModuleAllow::All => true,
        ModuleAllow::Only(modules) => modules.contains(&module),
    }
}

/// HTTP methods a role may use on a module.
pub fn allowed_methods(role: Role, module: Module) -> &'static [&'static str] {
    let rule = rule_for(role);
    rule.overrides
        .iter()
        .find(|(m, _)| *m == module)
        .map(|(_, methods)| *methods)
        .unwrap_or(rule.default_methods)
}

/// Whether a role may reach a path. Lookups are reachable by every role.
pub fn can_access_route(role: Role, path: &str) -> bool {
    let module = module_for_path(path);
    if module == Module::Lookup {
        return true;
    }
    is_module_allowed(role, module)
}

pub fn can_perform_method(role: Role, method: &str, module: Module) -> bool {
    let method = method.to_uppercase();
    allowed_methods(role, module).contains(&method.as_str())
}

/// Whether queries must be restricted to the user's center.
///
/// Unknown roles are always restricted.
pub fn needs_center_restriction(role: Option<Role>) -> bool {
    role.is_none_or(|r| rule_for(r).center_scoped)
}

pub fn report_scope(role: Role) -> ReportScope {
    rule_for(role).report_scope
}

/// Only AppAdmin and HQ may change Policy & Procedure records.
pub fn can_mutate_policy(role: Role) -> bool {
    role.is_privileged()
}

pub fn is_read_only_method(method: &str) -> bool {
    let method = method.to_uppercase();
    READ_ONLY.contains(&method.as_str())
}

/// Evaluates a request against the matrix.
///
/// Checks run in a fixed order: role resolution, route allowlist, module
/// access, method access, then the policy mutation rule.
pub fn authorize(request: &AccessRequest<'_>) -> Result<AccessScope, AccessDenied> {
    let role = request
        .role_id
        .and_then(Role::from_id)
        .ok_or(AccessDenied::UnknownRole)?;

    if !request.allowed_roles.is_empty() && !request.allowed_roles.contains(&role) {
        return Err(AccessDenied::RoleNotPermitted {
            role,
            allowed_roles: request.allowed_roles.to_vec(),
        });
    }

    let module = module_for_path(request.path);

    if !can_access_route(role, request.path) {
        return Err(AccessDenied::ModuleDenied {
            role,
            module,
            path: request.path.to_string(),
        });
    }

    if !can_perform_method(role, request.method, module) {
        return Err(AccessDenied::MethodNotAllowed {
            role,
            module,
            method: request.method.to_uppercase(),
        });
    }

    if module == Module::Policy && !can_mutate_policy(role) && !is_read_only_method(request.method)
    {
        return Err(AccessDenied::PolicyMutation {
            role,
            method: request.method.to_uppercase(),
        });
    }

    Ok(AccessScope {
        role,
        module,
        report_scope: report_scope(role),
        enforce_center_filter: needs_center_restriction(Some(role)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(role_id: i64, path: &'a str, method: &'a str) -> AccessRequest<'a> {
        AccessRequest {
            role_id: Some(role_id),
            path,
            method,
            allowed_roles: &[],
        }
    }

    #[test]
    fn module_resolution_is_case_insensitive_prefix_match() {
        assert_eq!(module_for_path("/api/Employee/12"), Module::Employee);
        assert_eq!(module_for_path("/api/employeeSkills"), Module::Employee);
        assert_eq!(module_for_path("/api/messages/3"), Module::Chat);
        assert_eq!(
            module_for_path("/api/conversationParticipants"),
            Module::Chat
        );
        assert_eq!(module_for_path("/api/borehole?x=1"), Module::ImamProfiles);
        assert_eq!(module_for_path("/api/tickets/9"), Module::ImamProfiles);
        assert_eq!(module_for_path("/api/lookup/Gender"), Module::Lookup);
        assert_eq!(
            module_for_path("/api/financialAssistance"),
            Module::Default
        );
        assert_eq!(module_for_path("/health"), Module::Default);
    }

    #[test]
    fn personal_files_resolve_to_file_manager_first() {
        assert_eq!(module_for_path("/api/personalFiles/1"), Module::FileManager);
    }

    #[test]
    fn deny_list_wins_over_allow_all() {
        assert!(!is_module_allowed(Role::OrgExecutive, Module::Chat));
        assert!(!is_module_allowed(Role::OrgExecutive, Module::FileManager));
        assert!(is_module_allowed(Role::OrgExecutive, Module::Employee));
    }

    #[test]
    fn caseworker_is_limited_to_its_allow_list() {
        assert!(is_module_allowed(Role::OrgCaseworker, Module::Chat));
        assert!(is_module_allowed(Role::OrgCaseworker, Module::Employee));
        assert!(!is_module_allowed(Role::OrgCaseworker, Module::Default));
        assert!(!is_module_allowed(Role::OrgCaseworker, Module::ImamProfiles));
    }

    #[test]
    fn method_overrides_replace_the_default() {
        assert_eq!(allowed_methods(Role::OrgAdmin, Module::Policy), READ_ONLY);
        assert_eq!(
            allowed_methods(Role::OrgExecutive, Module::Auth),
            super::super::FULL
        );
        assert_eq!(
            allowed_methods(Role::OrgExecutive, Module::Employee),
            READ_ONLY
        );
        assert!(can_perform_method(Role::ImamUser, "get", Module::Employee));
        assert!(!can_perform_method(Role::ImamUser, "PUT", Module::Employee));
        assert!(can_perform_method(Role::ImamUser, "DELETE", Module::ImamProfiles));
    }

    #[test]
    fn lookups_are_always_route_accessible() {
        assert!(!is_module_allowed(Role::ImamUser, Module::Lookup));
        assert!(can_access_route(Role::ImamUser, "/api/lookup/Gender"));
    }

    #[test]
    fn center_restriction_by_role() {
        assert!(!needs_center_restriction(Some(Role::AppAdmin)));
        assert!(!needs_center_restriction(Some(Role::Hq)));
        assert!(needs_center_restriction(Some(Role::OrgAdmin)));
        assert!(needs_center_restriction(Some(Role::OrgExecutive)));
        assert!(needs_center_restriction(Some(Role::OrgCaseworker)));
        assert!(!needs_center_restriction(Some(Role::ImamUser)));
        assert!(needs_center_restriction(None));
    }

    #[test]
    fn report_scope_is_all_only_for_privileged_roles() {
        assert_eq!(report_scope(Role::AppAdmin), ReportScope::All);
        assert_eq!(report_scope(Role::Hq), ReportScope::All);
        assert_eq!(report_scope(Role::OrgAdmin), ReportScope::Own);
        assert_eq!(report_scope(Role::ImamUser), ReportScope::Own);
    }

    #[test]
    fn authorize_rejects_unknown_role() {
        let req = AccessRequest {
            role_id: Some(42),
            path: "/api/employee",
            method: "GET",
            allowed_roles: &[],
        };
        assert_eq!(authorize(&req), Err(AccessDenied::UnknownRole));

        let req = AccessRequest {
            role_id: None,
            ..req
        };
        assert_eq!(authorize(&req), Err(AccessDenied::UnknownRole));
    }

    #[test]
    fn authorize_checks_route_allowlist_first() {
        let req = AccessRequest {
            role_id: Some(5),
            path: "/api/financialAssistance/recurring",
            method: "POST",
            allowed_roles: &[Role::AppAdmin, Role::Hq, Role::OrgAdmin],
        };
        assert!(matches!(
            authorize(&req),
            Err(AccessDenied::RoleNotPermitted {
                role: Role::OrgCaseworker,
                ..
            })
        ));
    }

    #[test]
    fn authorize_denies_module() {
        let result = authorize(&request(4, "/api/messages", "GET"));
        assert!(matches!(
            result,
            Err(AccessDenied::ModuleDenied {
                module: Module::Chat,
                ..
            })
        ));
    }

    #[test]
    fn authorize_denies_method() {
        let result = authorize(&request(4, "/api/employee", "POST"));
        assert!(matches!(
            result,
            Err(AccessDenied::MethodNotAllowed {
                role: Role::OrgExecutive,
                module: Module::Employee,
                ..
            })
        ));
    }

    #[test]
    fn authorize_blocks_policy_mutation_by_org_admin() {
        // OrgAdmin policy methods are already READ_ONLY, so the method rule fires first.
        assert!(matches!(
            authorize(&request(3, "/api/policyAndProcedure", "POST")),
            Err(AccessDenied::MethodNotAllowed { .. })
        ));
        assert!(authorize(&request(3, "/api/policyAndProcedure", "GET")).is_ok());
        assert!(authorize(&request(2, "/api/policyAndProcedure", "DELETE")).is_ok());
    }

    #[test]
    fn authorize_returns_scope() {
        let scope = authorize(&request(3, "/api/borehole/1", "put")).unwrap();
        assert_eq!(scope.role, Role::OrgAdmin);
        assert_eq!(scope.module, Module::ImamProfiles);
        assert_eq!(scope.report_scope, ReportScope::Own);
        assert!(scope.enforce_center_filter);

        let scope = authorize(&request(1, "/api/borehole/1", "DELETE")).unwrap();
        assert!(!scope.enforce_center_filter);
        assert_eq!(scope.report_scope, ReportScope::All);
    }

    #[test]
    fn matrix_table() {
        // (role, path, method, allowed)
        let cases = [
            (1, "/api/financialAssistance", "POST", true),
            (2, "/api/messages", "DELETE", true),
            (3, "/api/employee/1", "PUT", true),
            (4, "/api/auth/me", "POST", true),
            (4, "/api/applicantDetails", "GET", true),
            (4, "/api/applicantDetails", "POST", false),
            (5, "/api/conversations", "POST", true),
            (5, "/api/lookup/Gender", "POST", false),
            (5, "/api/lookup/Gender", "GET", true),
            (5, "/api/tickets", "GET", false),
            (6, "/api/borehole", "POST", true),
            (6, "/api/tickets/3", "DELETE", true),
            (6, "/api/programs", "GET", false),
            (6, "/api/applicantDetails", "GET", false),
            (6, "/api/lookup/Water_Source", "GET", true),
        ];
        for (role, path, method, allowed) in cases {
            assert_eq!(
                authorize(&request(role, path, method)).is_ok(),
                allowed,
                "role {role} {method} {path}"
            );
        }
    }
}
