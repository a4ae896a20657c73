//! Shared helpers for handler tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use welfare_auth::{hash_password, issue_token, AuthConfig};
use welfare_core::access::Role;
use welfare_core::audit::Audit;
use welfare_core::auth::auth_user_from_employee;
use welfare_core::people::Employee;

use crate::{app::create_app, state::AppState, storage::InMemoryRepository};

/// An empty in-memory state with a fixed token secret.
pub fn test_state() -> AppState {
    let config = AuthConfig::new("test-secret", chrono::Duration::hours(1)).with_bcrypt_cost(4);
    AppState::from_storage(Arc::new(InMemoryRepository::new()), config)
}

pub fn test_app(state: &AppState) -> Router {
    create_app(state.clone())
}

/// Stores an employee with `role` and returns it with a bearer header value.
pub async fn login_as(
    state: &AppState,
    username: &str,
    role: Role,
    center_id: Option<i64>,
) -> (Employee, String) {
    let employee = Employee {
        id: 0,
        center_id,
        name: username.to_string(),
        surname: "Tester".to_string(),
        username: username.to_string(),
        password_hash: hash_password("secret1", 4).unwrap(),
        user_type: role.id(),
        email: None,
        contact_number: None,
        department: None,
        audit: Audit::new("test", Utc::now()),
    };
    let employee = state.employees.create_employee(&employee).await.unwrap();
    let token = issue_token(
        auth_user_from_employee(&employee),
        &state.auth.config,
        Utc::now(),
    )
    .unwrap();
    (employee, format!("Bearer {token}"))
}

/// Sends a request and returns the raw response.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Sends a request and returns the status with the body parsed as JSON.
///
/// Empty bodies read as `Null`, non-JSON bodies as a string.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, token, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Builds a multipart body from text fields and `(field, filename, bytes)` files.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "TESTBOUNDARY";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Sends a multipart request and returns the status with the JSON body.
pub async fn send_multipart(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(fields, files);
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
