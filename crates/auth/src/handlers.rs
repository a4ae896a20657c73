//! HTTP handlers for auth routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use welfare_core::access::Role;
use welfare_core::audit::Audit;
use welfare_core::auth::{
    auth_user_from_employee, validate_registration, AuthError as CoreError, AuthUser,
    LoginRequest, RegisterRequest, UserInfo,
};
use welfare_core::people::Employee;
use welfare_core::storage::RepositoryError;

use crate::{
    error::AuthError,
    extractors::CurrentUser,
    password::{hash_password, verify_password},
    tokens::issue_token,
    AuthState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
    pub user_info: UserInfo,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /login` - Exchange credentials for a bearer token
/// - `POST /register` - Self-register as an imam user
/// - `GET /me` - Get the authenticated user
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let employee = state
        .employees
        .get_employee_by_username(&request.username)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password(&request.password, &employee.password_hash) {
        tracing::info!(username = %request.username, "Login failed");
        return Err(CoreError::InvalidCredentials.into());
    }

    let user = auth_user_from_employee(&employee);
    let token = issue_token(user.clone(), &state.config, Utc::now())?;
    tracing::info!(user_id = employee.id, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        user,
        user_info: UserInfo {
            id: employee.id,
            name: employee.name,
            surname: employee.surname,
            username: employee.username,
            user_type: employee.user_type,
            center_id: employee.center_id,
        },
    }))
}

async fn register(
    State(state): State<AuthState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AuthError> {
    validate_registration(&request)?;

    let RegisterRequest {
        name: Some(name),
        surname: Some(surname),
        username: Some(username),
        password: Some(password),
        email,
        contact_number,
        center_id,
        ..
    } = request
    else {
        return Err(CoreError::MissingFields.into());
    };

    if state
        .employees
        .get_employee_by_username(&username)
        .await?
        .is_some()
    {
        return Err(CoreError::UsernameTaken.into());
    }

    let employee = Employee {
        id: 0,
        center_id,
        name,
        surname,
        password_hash: hash_password(&password, state.config.bcrypt_cost)?,
        user_type: Role::ImamUser.id(),
        email,
        contact_number,
        department: None,
        audit: Audit::new(username.clone(), Utc::now()),
        username,
    };

    let created = match state.employees.create_employee(&employee).await {
        Ok(created) => created,
        Err(RepositoryError::AlreadyExists { .. }) => {
            return Err(CoreError::UsernameTaken.into())
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = created.id, "Registered imam user");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "User registered successfully",
            "user": {
                "id": created.id,
                "name": created.name,
                "surname": created.surname,
                "username": created.username,
            },
        })),
    ))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(user)
}
