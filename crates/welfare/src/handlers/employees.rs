//! Employee CRUD handlers.
//!
//! Passwords are hashed before storage and the hash is never serialized.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use welfare_auth::hash_password;
use welfare_core::audit::Audit;
use welfare_core::people::{
    validate_employee, validate_password, Employee, EmployeeInput, PeopleError,
};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

fn hash_new_password(state: &AppState, password: &str) -> Result<String, AppError> {
    validate_password(password)?;
    Ok(hash_password(password, state.auth.config.bcrypt_cost)?)
}

/// List employees (GET /api/employee).
pub async fn list_employees(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employees.list_employees(access.center()).await?;
    Ok(Json(employees))
}

/// Get one employee (GET /api/employee/{id}).
pub async fn get_employee(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, AppError> {
    state
        .employees
        .get_employee(id, access.center())
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// Create an employee (POST /api/employee).
pub async fn create_employee(
    access: Access,
    State(state): State<AppState>,
    Payload { body, .. }: Payload<EmployeeInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut input: EmployeeInput = body;
    let password = input
        .password
        .take()
        .ok_or(PeopleError::MissingField("password"))?;
    let password_hash = hash_new_password(&state, &password)?;

    input.center_id = access.center_for_new(input.center_id);
    let employee = input.into_employee(password_hash, Audit::new(access.actor(), Utc::now()))?;
    validate_employee(&employee)?;

    let created = state.employees.create_employee(&employee).await?;
    tracing::info!(employee_id = created.id, username = %created.username, "Created employee");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an employee (PUT /api/employee/{id}).
///
/// A present `password` is re-hashed. Center-scoped callers cannot move
/// an employee to another center.
pub async fn update_employee(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Payload { body, .. }: Payload<EmployeeInput>,
) -> Result<Json<Employee>, AppError> {
    let mut input: EmployeeInput = body;
    let mut employee = state
        .employees
        .get_employee(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;

    if let Some(password) = input.password.take() {
        employee.password_hash = hash_new_password(&state, &password)?;
    }
    input.apply_to(&mut employee);
    if let Some(center) = access.center() {
        employee.center_id = Some(center);
    }
    employee.audit.touch(access.actor(), Utc::now());
    validate_employee(&employee)?;

    state.employees.update_employee(&employee).await?;
    tracing::info!(employee_id = id, "Updated employee");

    Ok(Json(employee))
}

/// Delete an employee (DELETE /api/employee/{id}).
pub async fn delete_employee(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.employees.delete_employee(id, access.center()).await?;
    tracing::info!(employee_id = id, "Deleted employee");
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use welfare_core::access::Role;

    use crate::test_support::{login_as, send, test_app, test_state};

    #[tokio::test]
    async fn test_create_hashes_password_and_hides_it() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "admin", Role::AppAdmin, None).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employee",
            Some(&token),
            Some(json!({
                "name": "Bilal",
                "surname": "Khan",
                "username": "bilal",
                "password": "secret99",
                "user_type": "5",
                "center_id": 2
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "bilal");
        assert_eq!(body["created_by"], "admin");
        assert!(body.get("password_hash").is_none());
        assert!(body.get("password").is_none());

        let stored = state
            .employees
            .get_employee_by_username("bilal")
            .await
            .unwrap()
            .unwrap();
        assert!(welfare_auth::verify_password("secret99", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password_and_duplicates() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "admin", Role::AppAdmin, None).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employee",
            Some(&token),
            Some(json!({
                "name": "A",
                "surname": "B",
                "username": "ab",
                "password": "123",
                "user_type": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 6 characters");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/employee",
            Some(&token),
            Some(json!({
                "name": "A",
                "surname": "B",
                "username": "admin",
                "password": "123456",
                "user_type": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_center_scoping() {
        let state = test_state();
        let app = test_app(&state);
        let (_, admin) = login_as(&state, "admin", Role::AppAdmin, None).await;
        let (other, _) = login_as(&state, "far", Role::OrgCaseworker, Some(9)).await;
        let (_, org_admin) = login_as(&state, "local", Role::OrgAdmin, Some(1)).await;

        // Org admins only see their own center.
        let (status, body) = send(&app, Method::GET, "/api/employee", Some(&org_admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let usernames: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["username"].as_str().unwrap())
            .collect();
        assert_eq!(usernames, vec!["local"]);

        let uri = format!("/api/employee/{}", other.id);
        let (status, body) = send(&app, Method::GET, &uri, Some(&org_admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not found"}));

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&org_admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // App admins see everything.
        let (status, body) = send(&app, Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "far");

        // The caller's center overrides the body on create.
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employee",
            Some(&org_admin),
            Some(json!({
                "name": "N",
                "surname": "S",
                "username": "new",
                "password": "secret1",
                "user_type": 5,
                "center_id": 9
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["center_id"], 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "admin", Role::AppAdmin, None).await;
        let (target, _) = login_as(&state, "target", Role::OrgCaseworker, Some(3)).await;
        let uri = format!("/api/employee/{}", target.id);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"email": "t@example.org", "password": "newsecret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "t@example.org");
        assert_eq!(body["updated_by"], "admin");
        assert_eq!(body["created_by"], "test");

        let stored = state.employees.get_employee(target.id, None).await.unwrap().unwrap();
        assert!(welfare_auth::verify_password("newsecret", &stored.password_hash));

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Deleted successfully"}));

        let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requires_token_and_role() {
        let state = test_state();
        let app = test_app(&state);

        let (status, body) = send(&app, Method::GET, "/api/employee", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "No token, authorization denied");

        // Imam users have read-only access to employees.
        let (_, imam) = login_as(&state, "imam", Role::ImamUser, None).await;
        let (status, _) = send(&app, Method::GET, "/api/employee", Some(&imam), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employee",
            Some(&imam),
            Some(json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["method"], "POST");
        assert_eq!(body["role"], "ImamUser");
    }
}
