//! File lifecycle and listing handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use opsdash_core::error::AppError;
use opsdash_core::types::id::{DepartmentId, FileId};
use opsdash_service::lifecycle::{EditParams, UploadParams};

use crate::dto::request::FileActionRequest;
use crate::dto::response::FileMutationResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// One file part pulled out of a multipart body.
struct UploadedFile {
    display_name: String,
    mime_type: Option<String>,
    data: Bytes,
}

/// Read the `file` part (and optional `target_department_id`) from a
/// multipart body, enforcing the configured MIME allow-list.
async fn read_multipart(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<(UploadedFile, Option<DepartmentId>), ApiError> {
    let mut target_department: Option<DepartmentId> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "target_department_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let uuid = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::validation("Invalid target_department_id"))?;
                target_department = Some(DepartmentId::from_uuid(uuid));
            }
            "file" => {
                let display_name = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::validation("File part has no filename"))?;
                let mime_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                file = Some(UploadedFile {
                    display_name,
                    mime_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::validation("No file uploaded"))?;

    if let Some(mime) = &file.mime_type {
        let allowed = &state.config.storage.allowed_mime_types;
        if !allowed.iter().any(|m| m == mime) {
            return Err(AppError::validation("Only CSV and XLSX files are allowed").into());
        }
    }

    Ok((file, target_department))
}

/// POST /api/files/upload — multipart upload of a new file.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<FileMutationResponse>, ApiError> {
    let (file, target_department_id) = read_multipart(&state, multipart).await?;

    let record = state
        .lifecycle
        .upload(
            &auth,
            UploadParams {
                target_department_id,
                display_name: file.display_name,
                mime_type: file.mime_type,
                data: file.data,
            },
        )
        .await?;

    Ok(Json(FileMutationResponse {
        success: true,
        message: "File uploaded successfully".into(),
        file_id: record.id,
        pending_file_id: None,
    }))
}

/// PUT /api/files/{id} — multipart edit submission against an active file.
pub async fn submit_edit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<FileMutationResponse>, ApiError> {
    let (file, _) = read_multipart(&state, multipart).await?;

    let pending = state
        .lifecycle
        .submit_edit(
            &auth,
            FileId::from_uuid(id),
            EditParams {
                display_name: file.display_name,
                mime_type: file.mime_type,
                data: file.data,
            },
        )
        .await?;

    Ok(Json(FileMutationResponse {
        success: true,
        message: "File edit submitted for approval".into(),
        file_id: FileId::from_uuid(id),
        pending_file_id: Some(pending.id),
    }))
}

/// POST /api/files/{id}/action — accept or reject the pending edit.
pub async fn file_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FileActionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let file_id = FileId::from_uuid(id);
    let message = match req.action.as_str() {
        "accept" => {
            state.lifecycle.accept(&auth, file_id, req.notes).await?;
            "File changes accepted and applied"
        }
        "reject" => {
            state.lifecycle.reject(&auth, file_id, req.notes).await?;
            "File changes rejected. Original file remains active"
        }
        _ => {
            return Err(AppError::validation(
                "Invalid action specified. Must be \"accept\" or \"reject\".",
            )
            .into());
        }
    };

    Ok(Json(serde_json::json!({ "success": true, "message": message })))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.lifecycle.delete(&auth, FileId::from_uuid(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "File deleted" }),
    ))
}

/// GET /api/files — files visible to the principal, newest-first.
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let files = state.queries.list_files(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "files": files })))
}

/// GET /api/files/activity-log?limit=N
pub async fn activity_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.get("limit").and_then(|v| v.parse::<i64>().ok());
    let entries = state.queries.activity_log(&auth, limit).await?;
    Ok(Json(serde_json::json!({ "success": true, "entries": entries })))
}

/// GET /api/files/{id}/content — stored bytes with attachment semantics.
pub async fn read_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let content = state
        .lifecycle
        .read_content(&auth, FileId::from_uuid(id))
        .await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", content.display_name),
        )
        .header(header::CONTENT_LENGTH, content.data.len())
        .body(Body::from(content.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
