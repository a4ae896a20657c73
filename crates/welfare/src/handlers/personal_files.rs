//! File manager uploads and their downloads.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use welfare_auth::OptionalUser;
use welfare_core::attachment::content_disposition;
use welfare_core::audit::Audit;
use welfare_core::files::{file_download_name, FilesError, PersonalFile, PersonalFileInput};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// Fails unless `folder_id` is one of `owner`'s folders.
async fn ensure_own_folder(
    state: &AppState,
    folder_id: i64,
    owner: &str,
) -> Result<(), AppError> {
    match state.folders.get_folder(folder_id, owner).await? {
        Some(_) => Ok(()),
        None => Err(FilesError::UnknownFolder(folder_id).into()),
    }
}

pub async fn list_personal_files(
    access: Access,
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonalFile>>, AppError> {
    Ok(Json(state.personal_files.list_personal_files(access.actor()).await?))
}

pub async fn get_personal_file(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonalFile>, AppError> {
    state
        .personal_files
        .get_personal_file(id, Some(access.actor()))
        .await?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

pub async fn create_personal_file(
    access: Access,
    State(state): State<AppState>,
    mut payload: Payload<PersonalFileInput>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let file = payload.attachment(FILE_FIELD, now);
    let mut input = payload.body;
    if let Some(folder_id) = input.folder_id {
        ensure_own_folder(&state, folder_id, access.actor()).await?;
    }
    input.center_id = access.user.center_id.or(input.center_id);

    let record = input.into_personal_file(file, Audit::new(access.actor(), now))?;
    let created = state.personal_files.create_personal_file(&record).await?;
    tracing::info!(
        file_id = created.id,
        size = ?created.file.as_ref().and_then(|f| f.size),
        "Stored personal file"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_personal_file(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut payload: Payload<PersonalFileInput>,
) -> Result<Json<PersonalFile>, AppError> {
    let now = Utc::now();
    let mut record = state
        .personal_files
        .get_personal_file(id, Some(access.actor()))
        .await?
        .ok_or_else(AppError::not_found)?;

    if let Some(file) = payload.attachment(FILE_FIELD, now) {
        record.file = Some(file);
    }
    if let Some(folder_id) = payload.body.folder_id {
        ensure_own_folder(&state, folder_id, access.actor()).await?;
    }
    payload.body.apply_to(&mut record);
    if let Some(center) = access.user.center_id {
        record.center_id = Some(center);
    }
    record.audit.touch(access.actor(), now);

    state.personal_files.update_personal_file(&record).await?;
    tracing::info!(file_id = id, "Updated personal file");

    Ok(Json(record))
}

pub async fn delete_personal_file(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.personal_files.delete_personal_file(id, access.actor()).await?;
    tracing::info!(file_id = id, "Deleted personal file");
    Ok(deleted())
}

async fn file_response(
    state: &AppState,
    owner: Option<&str>,
    id: i64,
    inline: bool,
) -> Result<Response, AppError> {
    let record = state
        .personal_files
        .get_personal_file(id, owner)
        .await?
        .ok_or_else(|| AppError::missing("Record not found"))?;

    let file = record
        .file
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| AppError::missing("No file found"))?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(file_download_name(&file), inline),
        ),
        (header::CONTENT_LENGTH, file.data.len().to_string()),
    ];
    Ok((headers, file.data).into_response())
}

/// Serve a stored file inline (GET /api/personalFiles/{id}/view-file).
///
/// A token is optional here; when one is sent only the caller's own files
/// are served.
pub async fn view_file(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let owner = user.as_ref().map(|u| u.username.as_str());
    file_response(&state, owner, id, true).await
}

/// Serve a stored file as a download (GET /api/personalFiles/{id}/download-file).
pub async fn download_file(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    file_response(&state, Some(access.actor()), id, false).await
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use welfare_core::access::Role;

    use crate::test_support::{login_as, send, send_multipart, send_raw, test_app, test_state};

    #[tokio::test]
    async fn test_upload_list_update_and_delete() {
        let state = test_state();
        let app = test_app(&state);
        let (_, zaid) = login_as(&state, "zaid", Role::OrgCaseworker, Some(3)).await;
        let (_, amina) = login_as(&state, "amina", Role::OrgCaseworker, Some(3)).await;

        let (_, folder) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&zaid),
            Some(json!({"name": "Contracts"})),
        )
        .await;
        let folder_id = folder["id"].to_string();

        let (status, created) = send_multipart(
            &app,
            Method::POST,
            "/api/personalFiles",
            &zaid,
            &[("folder_id", &folder_id), ("employee_id", "null")],
            &[("file", "lease.pdf", b"%PDF-1.4 lease")],
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "lease.pdf");
        assert_eq!(created["folder_id"], folder["id"]);
        assert_eq!(created["employee_id"], json!(null));
        assert_eq!(created["center_id"], 3);
        assert_eq!(created["file"]["content"], "exists");
        assert_eq!(created["file"]["size"], 14);

        let (status, body) = send(&app, Method::GET, "/api/personalFiles", Some(&zaid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = send(&app, Method::GET, "/api/personalFiles", Some(&amina), None).await;
        assert_eq!(body, json!([]));

        let uri = format!("/api/personalFiles/{}", created["id"]);
        let (status, body) = send(&app, Method::GET, &uri, Some(&amina), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, updated) = send_multipart(
            &app,
            Method::PUT,
            &uri,
            &zaid,
            &[("name", "Lease 2025")],
            &[("file", "lease-v2.pdf", b"%PDF-1.7")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Lease 2025");
        assert_eq!(updated["file"]["filename"], "lease-v2.pdf");
        assert_eq!(updated["folder_id"], folder["id"]);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&amina), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&zaid), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deleted successfully");
    }

    #[tokio::test]
    async fn test_files_only_go_into_own_folders() {
        let state = test_state();
        let app = test_app(&state);
        let (_, zaid) = login_as(&state, "zaid", Role::OrgAdmin, Some(1)).await;
        let (_, amina) = login_as(&state, "amina", Role::OrgAdmin, Some(1)).await;

        let (_, folder) = send(
            &app,
            Method::POST,
            "/api/folders",
            Some(&amina),
            Some(json!({"name": "Private"})),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/personalFiles",
            Some(&zaid),
            Some(json!({"name": "notes.txt", "folder_id": folder["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("Folder {} does not exist", folder["id"]));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/personalFiles",
            Some(&zaid),
            Some(json!({"folder_id": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn test_view_and_download_file() {
        let state = test_state();
        let app = test_app(&state);
        let (_, zaid) = login_as(&state, "zaid", Role::OrgCaseworker, Some(1)).await;
        let (_, amina) = login_as(&state, "amina", Role::OrgCaseworker, Some(1)).await;

        let (_, stored) = send_multipart(
            &app,
            Method::POST,
            "/api/personalFiles",
            &zaid,
            &[("name", "ID copy")],
            &[("file", "id.png", b"\x89PNG")],
        )
        .await;

        // No token: served inline without an owner check.
        let view = format!("/api/personalFiles/{}/view-file", stored["id"]);
        let response = send_raw(&app, Method::GET, &view, None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "inline; filename=\"id.png\"");
        assert_eq!(headers[header::CONTENT_LENGTH], "4");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"\x89PNG");

        // With a token only the owner's files are served.
        let (status, body) = send(&app, Method::GET, &view, Some(&amina), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");

        let download = format!("/api/personalFiles/{}/download-file", stored["id"]);
        let response = send_raw(&app, Method::GET, &download, Some(&zaid), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"id.png\""
        );
        let (status, _) = send(&app, Method::GET, &download, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, empty) = send(
            &app,
            Method::POST,
            "/api/personalFiles",
            Some(&zaid),
            Some(json!({"name": "Placeholder"})),
        )
        .await;
        let uri = format!("/api/personalFiles/{}/download-file", empty["id"]);
        let (status, body) = send(&app, Method::GET, &uri, Some(&zaid), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No file found");

        let (status, body) =
            send(&app, Method::GET, "/api/personalFiles/999/view-file", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Record not found");
    }
}
