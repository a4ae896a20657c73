//! Authorization for API handlers.
//!
//! [`Access`] authenticates the bearer token and evaluates the RBAC matrix
//! for the request path and method before the handler runs. Denials map to
//! 403 Forbidden with the reason and its context in the body.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use welfare_auth::{AuthError, AuthState, CurrentUser};
use welfare_core::access::{authorize, AccessDenied, AccessRequest, AccessScope, Role};
use welfare_core::auth::AuthUser;
use welfare_core::storage::{inject_center, CenterFilter};

/// Rejection for [`Access`].
#[derive(Debug)]
pub enum AuthzError {
    /// No valid bearer token. Rendered by `welfare_auth` as 401.
    Unauthenticated(AuthError),
    /// The RBAC matrix rejected the request.
    Denied(AccessDenied),
}

fn role_list(roles: &[Role]) -> Vec<&'static str> {
    roles.iter().map(|r| r.key()).collect()
}

fn denial_body(denied: &AccessDenied) -> Value {
    let message = denied.to_string();
    match denied {
        AccessDenied::UnknownRole => json!({ "message": message }),
        AccessDenied::RoleNotPermitted {
            role,
            allowed_roles,
        } => json!({
            "message": message,
            "role": role.key(),
            "allowedRoles": role_list(allowed_roles),
        }),
        AccessDenied::ModuleDenied { role, module, path } => json!({
            "message": message,
            "role": role.key(),
            "module": module.as_str(),
            "path": path,
        }),
        AccessDenied::MethodNotAllowed {
            role,
            module,
            method,
        } => json!({
            "message": message,
            "role": role.key(),
            "module": module.as_str(),
            "method": method,
        }),
        AccessDenied::PolicyMutation { role, method } => json!({
            "message": message,
            "role": role.key(),
            "method": method,
        }),
    }
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(err) => err.into_response(),
            Self::Denied(denied) => {
                tracing::warn!(
                    role = ?denied.role().map(Role::key),
                    reason = %denied,
                    "Authorization denied"
                );
                (StatusCode::FORBIDDEN, Json(denial_body(&denied))).into_response()
            }
        }
    }
}

/// An authenticated user whose request passed the RBAC matrix.
pub struct Access {
    pub user: AuthUser,
    pub scope: AccessScope,
}

impl Access {
    /// Center filter for reads, updates and deletes.
    pub fn center(&self) -> CenterFilter {
        self.scope.center_filter(self.user.center_id)
    }

    /// Center a new row is stored under.
    pub fn center_for_new(&self, requested: Option<i64>) -> Option<i64> {
        inject_center(self.center(), requested)
    }

    /// Actor name for audit fields.
    pub fn actor(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> Role {
        self.scope.role
    }

    /// Restricts a route to an explicit set of roles.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AuthzError> {
        if allowed.contains(&self.scope.role) {
            return Ok(());
        }
        Err(AuthzError::Denied(AccessDenied::RoleNotPermitted {
            role: self.scope.role,
            allowed_roles: allowed.to_vec(),
        }))
    }
}

impl<S> FromRequestParts<S> for Access
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthzError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(AuthzError::Unauthenticated)?;

        // Nested routers see a stripped URI; the matrix is keyed on the full path.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let scope = authorize(&AccessRequest {
            role_id: Some(user.user_type),
            path: &path,
            method: parts.method.as_str(),
            allowed_roles: &[],
        })
        .map_err(AuthzError::Denied)?;

        Ok(Access { user, scope })
    }
}
