use thiserror::Error;

use super::{Module, Role};

/// Reasons the RBAC matrix rejects a request. All of them map to 403.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Forbidden: unknown or missing role")]
    UnknownRole,
    #[error("Forbidden: role not permitted for this resource")]
    RoleNotPermitted {
        role: Role,
        allowed_roles: Vec<Role>,
    },
    #[error("Forbidden: module access denied by RBAC rules")]
    ModuleDenied {
        role: Role,
        module: Module,
        path: String,
    },
    #[error("Forbidden: HTTP method not allowed for this role")]
    MethodNotAllowed {
        role: Role,
        module: Module,
        method: String,
    },
    #[error("Forbidden: only AppAdmin and HQ can modify Policy & Procedure records")]
    PolicyMutation { role: Role, method: String },
}

impl AccessDenied {
    /// The role that was denied, when it could be resolved.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::UnknownRole => None,
            Self::RoleNotPermitted { role, .. }
            | Self::ModuleDenied { role, .. }
            | Self::MethodNotAllowed { role, .. }
            | Self::PolicyMutation { role, .. } => Some(*role),
        }
    }
}
