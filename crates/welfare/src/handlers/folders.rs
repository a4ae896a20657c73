//! File manager folder handlers. Every folder is private to its creator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use welfare_core::audit::Audit;
use welfare_core::files::{check_parent, Folder, FolderInput};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

pub async fn list_folders(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<Folder>>, AppError> {
    Ok(Json(state.folders.list_folders(access.actor()).await?))
}

pub async fn get_folder(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Folder>, AppError> {
    state
        .folders
        .get_folder(id, access.actor())
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

pub async fn create_folder(
    access: Access,
    State(state): State<AppState>,
    payload: Payload<FolderInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut input = payload.body;
    if let Some(parent_id) = input.parent_id {
        let owned = state.folders.list_folders(access.actor()).await?;
        check_parent(&owned, None, parent_id)?;
    }
    input.center_id = access.user.center_id.or(input.center_id);

    let folder = input.into_folder(Audit::new(access.actor(), Utc::now()))?;
    let created = state.folders.create_folder(&folder).await?;
    tracing::info!(folder_id = created.id, parent_id = ?created.parent_id, "Created folder");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_folder(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Payload<FolderInput>,
) -> Result<Json<Folder>, AppError> {
    let mut folder = state
        .folders
        .get_folder(id, access.actor())
        .await?
        .ok_or_else(AppError::not_found)?;

    let input = payload.body;
    if let Some(parent_id) = input.parent_id {
        let owned = state.folders.list_folders(access.actor()).await?;
        check_parent(&owned, Some(id), parent_id)?;
    }
    input.apply_to(&mut folder);
    if let Some(center) = access.user.center_id {
        folder.center_id = Some(center);
    }
    folder.audit.touch(access.actor(), Utc::now());

    state.folders.update_folder(&folder).await?;
    tracing::info!(folder_id = id, "Updated folder");

    Ok(Json(folder))
}

pub async fn delete_folder(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.folders.delete_folder(id, access.actor()).await?;
    tracing::info!(folder_id = id, "Deleted folder");
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use welfare_core::access::Role;

    use crate::test_support::{login_as, send, test_app, test_state};

    #[tokio::test]
    async fn test_folders_are_private_to_their_creator() {
        let state = test_state();
        let app = test_app(&state);
        let (_, zaid) = login_as(&state, "zaid", Role::OrgCaseworker, Some(2)).await;
        let (_, admin) = login_as(&state, "admin", Role::AppAdmin, None).await;

        let (status, hr) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&zaid),
            Some(json!({"name": "HR", "parent_id": "", "center_id": 9})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(hr["parent_id"], json!(null));
        assert_eq!(hr["center_id"], 2);
        assert_eq!(hr["created_by"], "zaid");

        let (status, payslips) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&zaid),
            Some(json!({"name": "Payslips", "parent_id": hr["id"].to_string()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payslips["parent_id"], hr["id"]);

        let (status, body) = send(&app, Method::GET, "/api/folders", Some(&zaid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Payslips");
        assert_eq!(body[1]["name"], "HR");

        // Even an AppAdmin only sees their own folders.
        let (status, body) = send(&app, Method::GET, "/api/folders", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        let uri = format!("/api/folders/{}", hr["id"]);
        let (status, body) = send(&app, Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({"name": "Taken"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&zaid),
            Some(json!({"name": "Human resources"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Human resources");
        assert_eq!(body["updated_by"], "zaid");

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&zaid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deleted successfully");

        let uri = format!("/api/folders/{}", payslips["id"]);
        let (_, body) = send(&app, Method::GET, &uri, Some(&zaid), None).await;
        assert_eq!(body["parent_id"], json!(null));
    }

    #[tokio::test]
    async fn test_folder_parent_rules() {
        let state = test_state();
        let app = test_app(&state);
        let (_, zaid) = login_as(&state, "zaid", Role::OrgAdmin, Some(1)).await;
        let (_, amina) = login_as(&state, "amina", Role::OrgAdmin, Some(1)).await;

        let (status, body) =
            send(&app, Method::POST, "/api/folders", Some(&zaid), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");

        let (_, outer) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&zaid),
            Some(json!({"name": "Outer"})),
        )
        .await;
        let (_, inner) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&zaid),
            Some(json!({"name": "Inner", "parent_id": outer["id"]})),
        )
        .await;

        // Someone else's folder cannot be used as a parent.
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&amina),
            Some(json!({"name": "Sneaky", "parent_id": outer["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("Folder {} does not exist", outer["id"]));

        let uri = format!("/api/folders/{}", outer["id"]);
        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&zaid),
            Some(json!({"parent_id": inner["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "A folder cannot be moved inside itself");
    }

    #[tokio::test]
    async fn test_file_manager_is_closed_to_executives_and_imams() {
        let state = test_state();
        let app = test_app(&state);
        let (_, executive) = login_as(&state, "exec", Role::OrgExecutive, Some(1)).await;
        let (_, imam) = login_as(&state, "imam", Role::ImamUser, None).await;

        for token in [&executive, &imam] {
            let (status, body) = send(&app, Method::GET, "/api/folders", Some(token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["module"], "fileManager");
        }

        let (status, _) = send(&app, Method::GET, "/api/folders", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
